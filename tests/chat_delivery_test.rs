//! 실시간 채팅 전달 테스트
//!
//! 테스트 대상:
//! - ChatDelivery::join / send
//! - ChatSession (WebSocket 커넥션 상태)

mod common;

use std::time::Duration;

use common::*;
use homerev_server::domain::chat::dto::{
    ClientEvent, DeliveryEvent, ServerEvent, StatusEvent,
};
use homerev_server::domain::chat::session::ChatSession;
use homerev_server::domain::chat::{ChatDelivery, ChatService};
use homerev_server::state::AppState;
use homerev_server::utils::error::AppError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::timeout;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

async fn state_with_room() -> AppState {
    let state = seeded_state().await;
    ChatService::resolve_or_create(&state.db, PROJECT_ID, BUYER_ID, UPLOADER_ID)
        .await
        .unwrap();
    state
}

async fn next_broadcast(rx: &mut broadcast::Receiver<ServerEvent>) -> ServerEvent {
    timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap()
}

async fn next_outbound(rx: &mut mpsc::Receiver<ServerEvent>) -> ServerEvent {
    timeout(RECV_TIMEOUT, rx.recv()).await.unwrap().unwrap()
}

mod delivery {
    use super::*;

    #[tokio::test]
    async fn should_persist_and_broadcast_message() {
        // Arrange
        let state = state_with_room().await;
        let mut rx = ChatDelivery::join(&state.hub, "3_9", "u3").await;
        assert_eq!(
            next_broadcast(&mut rx).await,
            ServerEvent::Status(StatusEvent::joined("u3"))
        );

        // Act
        let event = ChatDelivery::send(&state.db, &state.hub, "3_9", "u3", "hi")
            .await
            .unwrap();

        // Assert
        match next_broadcast(&mut rx).await {
            ServerEvent::ReceiveMessage(DeliveryEvent {
                username, message, ..
            }) => {
                assert_eq!(username, "u3");
                assert_eq!(message, "hi");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(event.message, "hi");

        let room = ChatService::find_by_pair(&state.db, 3, 9)
            .await
            .unwrap()
            .unwrap();
        let stored = ChatService::list_for_room(&state.db, room.chat_room_id)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].sender_id, BUYER_ID);
        assert_eq!(stored[0].content, "hi");
    }

    #[tokio::test]
    async fn should_reject_channel_aliases_without_persisting() {
        // Arrange
        let state = state_with_room().await;
        let mut buyer = ChatDelivery::join(&state.hub, "3_9", "u3").await;
        let _ = next_broadcast(&mut buyer).await;

        // Act
        let results = [
            ChatDelivery::send(&state.db, &state.hub, "9_3", "u9", "reversed").await,
            ChatDelivery::send(&state.db, &state.hub, "+3_9", "u9", "plus").await,
            ChatDelivery::send(&state.db, &state.hub, "03_9", "u9", "zero").await,
        ];

        // Assert
        for result in results {
            assert!(matches!(result, Err(AppError::MalformedChannel(_))));
        }
        assert!(buyer.try_recv().is_err());
        let room = ChatService::find_by_pair(&state.db, 3, 9)
            .await
            .unwrap()
            .unwrap();
        assert!(ChatService::list_for_room(&state.db, room.chat_room_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn should_deliver_uploader_reply_to_buyer_subscription() {
        // Arrange
        let state = state_with_room().await;
        let mut buyer = ChatDelivery::join(&state.hub, "3_9", "u3").await;
        let _ = next_broadcast(&mut buyer).await;

        // Act
        ChatDelivery::send(&state.db, &state.hub, "3_9", "u9", "hello")
            .await
            .unwrap();

        // Assert
        match next_broadcast(&mut buyer).await {
            ServerEvent::ReceiveMessage(event) => {
                assert_eq!(event.username, "u9");
                assert_eq!(event.message, "hello");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_deliver_to_every_subscriber_in_order() {
        // Arrange
        let state = state_with_room().await;
        let mut buyer = ChatDelivery::join(&state.hub, "3_9", "u3").await;
        let _ = next_broadcast(&mut buyer).await;
        let mut uploader = ChatDelivery::join(&state.hub, "3_9", "u9").await;
        let _ = next_broadcast(&mut uploader).await;
        let _ = next_broadcast(&mut buyer).await;

        // Act
        ChatDelivery::send(&state.db, &state.hub, "3_9", "u3", "one")
            .await
            .unwrap();
        ChatDelivery::send(&state.db, &state.hub, "3_9", "u9", "two")
            .await
            .unwrap();

        // Assert
        for rx in [&mut buyer, &mut uploader] {
            let mut received = Vec::new();
            for _ in 0..2 {
                if let ServerEvent::ReceiveMessage(event) = next_broadcast(rx).await {
                    received.push(event.message);
                }
            }
            assert_eq!(received, vec!["one", "two"]);
        }
    }

    #[tokio::test]
    async fn should_reject_malformed_channel_without_persisting() {
        // Arrange
        let state = state_with_room().await;

        // Act
        let result = ChatDelivery::send(&state.db, &state.hub, "abc_9", "u3", "hi").await;

        // Assert
        assert!(matches!(result, Err(AppError::MalformedChannel(_))));
        let room = ChatService::find_by_pair(&state.db, 3, 9)
            .await
            .unwrap()
            .unwrap();
        assert!(ChatService::list_for_room(&state.db, room.chat_room_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn should_reject_unknown_sender() {
        // Arrange
        let state = state_with_room().await;

        // Act
        let result = ChatDelivery::send(&state.db, &state.hub, "3_9", "ghost", "hi").await;

        // Assert
        assert!(matches!(result, Err(AppError::UnknownSender(_))));
    }

    #[tokio::test]
    async fn should_return_not_found_when_pair_has_no_room() {
        // Arrange
        let state = state_with_room().await;

        // Act
        let result = ChatDelivery::send(&state.db, &state.hub, "3_5", "u3", "hi").await;

        // Assert
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn should_forbid_sender_outside_pair() {
        // Arrange
        let state = state_with_room().await;

        // Act
        let result = ChatDelivery::send(&state.db, &state.hub, "3_9", "u5", "hi").await;

        // Assert
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn should_reject_blank_message_without_broadcast() {
        // Arrange
        let state = state_with_room().await;
        let mut rx = ChatDelivery::join(&state.hub, "3_9", "u3").await;
        let _ = next_broadcast(&mut rx).await;

        // Act
        let result = ChatDelivery::send(&state.db, &state.hub, "3_9", "u3", "   ").await;

        // Assert
        assert!(matches!(result, Err(AppError::EmptyContent(_))));
        assert!(rx.try_recv().is_err());
    }
}

mod session {
    use super::*;

    fn open_session(
        state: &AppState,
        user_id: i64,
        username: &str,
    ) -> (ChatSession, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(32);
        (
            ChatSession::new(state.clone(), user_id, username.to_string(), tx),
            rx,
        )
    }

    #[tokio::test]
    async fn should_receive_join_status_and_messages() {
        // Arrange
        let state = state_with_room().await;
        let (mut session, mut rx) = open_session(&state, BUYER_ID, "u3");

        // Act
        session
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        let joined = next_outbound(&mut rx).await;
        session
            .handle(ClientEvent::SendMessage {
                room: "3_9".to_string(),
                message: "hi".to_string(),
            })
            .await;
        let delivered = next_outbound(&mut rx).await;

        // Assert
        assert_eq!(joined, ServerEvent::Status(StatusEvent::joined("u3")));
        match delivered {
            ServerEvent::ReceiveMessage(event) => {
                assert_eq!(event.username, "u3");
                assert_eq!(event.message, "hi");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_notify_counterpart_session() {
        // Arrange
        let state = state_with_room().await;
        let (mut buyer, mut buyer_rx) = open_session(&state, BUYER_ID, "u3");
        let (mut uploader, mut uploader_rx) = open_session(&state, UPLOADER_ID, "u9");
        buyer
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        let _ = next_outbound(&mut buyer_rx).await;
        uploader
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        let _ = next_outbound(&mut uploader_rx).await;

        // Act
        buyer
            .handle(ClientEvent::SendMessage {
                room: "3_9".to_string(),
                message: "is it still available?".to_string(),
            })
            .await;

        // Assert
        match next_outbound(&mut uploader_rx).await {
            ServerEvent::ReceiveMessage(event) => {
                assert_eq!(event.username, "u3");
                assert_eq!(event.message, "is it still available?");
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn should_reject_join_from_non_participant() {
        // Arrange
        let state = state_with_room().await;
        let (mut session, mut rx) = open_session(&state, OUTSIDER_ID, "u5");

        // Act
        session
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;

        // Assert
        match next_outbound(&mut rx).await {
            ServerEvent::DeliveryFailed(failure) => assert_eq!(failure.code, "COMMON403"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(session.joined_channels().count(), 0);
    }

    #[tokio::test]
    async fn should_reject_join_on_channel_alias() {
        // Arrange
        let state = state_with_room().await;
        let (mut session, mut rx) = open_session(&state, UPLOADER_ID, "u9");

        // Act
        session
            .handle(ClientEvent::Join {
                room: "9_3".to_string(),
            })
            .await;

        // Assert
        match next_outbound(&mut rx).await {
            ServerEvent::DeliveryFailed(failure) => assert_eq!(failure.code, "CHAT4002"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_eq!(session.joined_channels().count(), 0);
        assert_eq!(state.hub.channel_count().await, 0);
    }

    #[tokio::test]
    async fn should_report_failure_only_to_sender() {
        // Arrange
        let state = state_with_room().await;
        let (mut buyer, mut buyer_rx) = open_session(&state, BUYER_ID, "u3");
        let (mut uploader, mut uploader_rx) = open_session(&state, UPLOADER_ID, "u9");
        uploader
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        let _ = next_outbound(&mut uploader_rx).await;

        // Act
        buyer
            .handle(ClientEvent::SendMessage {
                room: "abc_9".to_string(),
                message: "hi".to_string(),
            })
            .await;

        // Assert
        match next_outbound(&mut buyer_rx).await {
            ServerEvent::DeliveryFailed(failure) => assert_eq!(failure.code, "CHAT4002"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(uploader_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn should_ignore_duplicate_join() {
        // Arrange
        let state = state_with_room().await;
        let (mut session, mut rx) = open_session(&state, BUYER_ID, "u3");
        let join = ClientEvent::Join {
            room: "3_9".to_string(),
        };

        // Act
        session.handle(join.clone()).await;
        session.handle(join).await;
        let _ = next_outbound(&mut rx).await;

        // Assert
        assert_eq!(session.joined_channels().count(), 1);
        assert_eq!(state.hub.subscriber_count("3_9").await, 1);
    }

    #[tokio::test]
    async fn should_release_channel_on_leave_and_close() {
        // Arrange
        let state = state_with_room().await;
        let (mut session, mut rx) = open_session(&state, BUYER_ID, "u3");
        session
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        let _ = next_outbound(&mut rx).await;

        // Act
        session
            .handle(ClientEvent::Leave {
                room: "3_9".to_string(),
            })
            .await;
        let after_leave = state.hub.subscriber_count("3_9").await;

        session
            .handle(ClientEvent::Join {
                room: "3_9".to_string(),
            })
            .await;
        session.close().await;

        // Assert
        assert_eq!(after_leave, 0);
        assert_eq!(state.hub.channel_count().await, 0);
    }
}
