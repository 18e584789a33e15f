use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::delivery::{parse_channel, ChatDelivery};
use super::dto::{ClientEvent, DeliveryFailure, ServerEvent};
use crate::state::AppState;
use crate::utils::error::AppError;

/// WebSocket 커넥션 하나의 채팅 상태
///
/// 입장한 채널마다 broadcast 수신 태스크를 두고, 모든 이벤트는 `outbound`로 모아 소켓에 쓴다.
pub struct ChatSession {
    state: AppState,
    user_id: i64,
    username: String,
    outbound: mpsc::Sender<ServerEvent>,
    subscriptions: HashMap<String, JoinHandle<()>>,
}

impl ChatSession {
    pub fn new(
        state: AppState,
        user_id: i64,
        username: String,
        outbound: mpsc::Sender<ServerEvent>,
    ) -> Self {
        Self {
            state,
            user_id,
            username,
            outbound,
            subscriptions: HashMap::new(),
        }
    }

    pub async fn handle(&mut self, event: ClientEvent) {
        let result = match event {
            ClientEvent::Join { room } => self.join(&room).await,
            ClientEvent::SendMessage { room, message } => ChatDelivery::send(
                &self.state.db,
                &self.state.hub,
                &room,
                &self.username,
                &message,
            )
            .await
            .map(|_| ()),
            ClientEvent::Leave { room } => {
                self.leave(&room).await;
                Ok(())
            }
        };

        if let Err(e) = result {
            self.reject(e).await;
        }
    }

    async fn join(&mut self, channel: &str) -> Result<(), AppError> {
        let (a, b) = parse_channel(channel)?;
        if a != self.user_id && b != self.user_id {
            return Err(AppError::Forbidden(
                "채팅방 참여자만 입장할 수 있습니다.".to_string(),
            ));
        }

        if self.subscriptions.contains_key(channel) {
            return Ok(());
        }

        let rx = ChatDelivery::join(&self.state.hub, channel, &self.username).await;
        let handle = tokio::spawn(forward(rx, self.outbound.clone(), channel.to_string()));
        self.subscriptions.insert(channel.to_string(), handle);

        Ok(())
    }

    async fn leave(&mut self, channel: &str) {
        if let Some(handle) = self.subscriptions.remove(channel) {
            handle.abort();
            // 취소된 태스크가 Receiver를 놓을 때까지 대기
            let _ = handle.await;
            self.state.hub.prune(channel).await;
        }
    }

    /// 실패 사유를 이 커넥션에만 전달
    pub async fn reject(&self, error: AppError) {
        let reason = match &error {
            AppError::InternalError(_) => "메시지를 처리하지 못했습니다.".to_string(),
            _ => error.message(),
        };
        let failure = ServerEvent::DeliveryFailed(DeliveryFailure {
            code: error.error_code(),
            reason,
        });

        if self.outbound.send(failure).await.is_err() {
            debug!(user_id = self.user_id, "connection closed before rejection was sent");
        }
    }

    pub fn joined_channels(&self) -> impl Iterator<Item = &str> {
        self.subscriptions.keys().map(String::as_str)
    }

    /// 모든 채널에서 나가고 세션 종료
    pub async fn close(mut self) {
        let channels: Vec<String> = self.subscriptions.keys().cloned().collect();
        for channel in channels {
            self.leave(&channel).await;
        }
    }
}

async fn forward(
    mut rx: broadcast::Receiver<ServerEvent>,
    outbound: mpsc::Sender<ServerEvent>,
    channel: String,
) {
    loop {
        match rx.recv().await {
            Ok(event) => {
                if outbound.send(event).await.is_err() {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(channel = %channel, skipped, "chat subscriber lagged, events dropped");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
