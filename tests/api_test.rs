//! HTTP API 통합 테스트
//!
//! 라우터 전체를 인메모리 SQLite 위에서 `oneshot`으로 호출한다.

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use common::*;
use homerev_server::app;
use homerev_server::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

// ===== Helper Functions =====

fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("Authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

async fn call(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, parse_response_body(response.into_body()).await)
}

async fn setup() -> (AppState, Router) {
    let state = seeded_state().await;
    let router = app(state.clone());
    (state, router)
}

// ===== Health Check Tests =====

mod health {
    use super::*;

    #[tokio::test]
    async fn should_report_healthy_database() {
        let (_, router) = setup().await;

        let (status, body) = call(&router, empty_request("GET", "/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"]["reachable"], true);
        assert_eq!(body["chat"]["activeChannels"], 0);
    }

    #[tokio::test]
    async fn should_echo_request_id_header() {
        let (_, router) = setup().await;
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let response = router.oneshot(request).await.unwrap();

        assert_eq!(response.headers()["x-request-id"], "req-123");
    }
}

// ===== Auth Tests =====

mod auth {
    use super::*;

    #[tokio::test]
    async fn should_register_and_login() {
        let (_, router) = setup().await;

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "alice", "email": "alice@homerev.test", "password": "password123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isSuccess"], true);
        assert_eq!(body["result"]["username"], "alice");

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"username": "alice", "password": "password123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["result"]["accessToken"].as_str().unwrap().to_string();

        let (status, body) = call(
            &router,
            empty_request(
                "GET",
                "/api/v1/members/me",
                Some(&format!("Bearer {}", token)),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["email"], "alice@homerev.test");
    }

    #[tokio::test]
    async fn should_return_409_for_duplicate_username() {
        let (_, router) = setup().await;
        let (status, _) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "dave", "email": "dave@homerev.test", "password": "password123"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "dave", "email": "other@homerev.test", "password": "password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "COMMON409");
    }

    #[tokio::test]
    async fn should_return_409_for_duplicate_email() {
        let (_, router) = setup().await;

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "erin", "email": "u3@homerev.test", "password": "password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "COMMON409");
    }

    #[tokio::test]
    async fn should_return_400_for_invalid_email() {
        let (_, router) = setup().await;

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "bob", "email": "not-an-email", "password": "password123"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMMON400");
    }

    #[tokio::test]
    async fn should_return_400_for_malformed_json() {
        let (_, router) = setup().await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from("{\"username\": "))
            .unwrap();

        let (status, body) = call(&router, request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "COMMON400");
    }

    #[tokio::test]
    async fn should_return_401_for_wrong_password() {
        let (_, router) = setup().await;
        call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "carol", "email": "carol@homerev.test", "password": "password123"}),
            ),
        )
        .await;

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"username": "carol", "password": "wrong-password"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTH4001");
    }

    #[tokio::test]
    async fn should_return_401_without_token() {
        let (_, router) = setup().await;

        let (status, body) = call(&router, empty_request("GET", "/api/v1/members/me", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["isSuccess"], false);
    }
}

// ===== Member Tests =====

mod member {
    use super::*;

    #[tokio::test]
    async fn should_update_bio_and_show_public_profile() {
        let (state, router) = setup().await;
        let auth = bearer(&state, UPLOADER_ID);

        let (status, _) = call(
            &router,
            json_request(
                "PATCH",
                "/api/v1/members/me/bio",
                Some(&auth),
                json!({"bio": "Kitchen specialist"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            call(&router, empty_request("GET", "/api/v1/members/9", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["bio"], "Kitchen specialist");
        assert_eq!(body["result"]["projects"][0]["projectId"], PROJECT_ID);
    }
}

// ===== Project Tests =====

mod project {
    use super::*;

    #[tokio::test]
    async fn should_create_and_filter_by_room_type() {
        let (state, router) = setup().await;
        let auth = bearer(&state, UPLOADER_ID);

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/projects",
                Some(&auth),
                json!({"name": "Loft bedroom", "price": 800.0, "roomType": "Bedroom"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["roomType"], "Bedroom");

        let (status, body) = call(
            &router,
            empty_request("GET", "/api/v1/projects?roomTypes=Bedroom", Some(&auth)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let items = body["result"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["name"], "Loft bedroom");

        let (_, body) = call(&router, empty_request("GET", "/api/v1/projects", Some(&auth))).await;
        assert_eq!(body["result"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn should_cap_discover_feed_at_ten() {
        let (state, router) = setup().await;
        for id in 100..115 {
            seed_project(&state.db, id, UPLOADER_ID, "Bathroom").await;
        }
        let auth = bearer(&state, BUYER_ID);

        let (status, body) = call(
            &router,
            empty_request("GET", "/api/v1/projects/discover?roomTypes=Bathroom", Some(&auth)),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let items = body["result"].as_array().unwrap();
        assert_eq!(items.len(), 10);
        assert!(items.iter().all(|item| item["roomType"] == "Bathroom"));
    }

    #[tokio::test]
    async fn should_show_chat_rooms_only_to_owner() {
        let (state, router) = setup().await;
        let buyer = bearer(&state, BUYER_ID);
        let uploader = bearer(&state, UPLOADER_ID);
        call(&router, empty_request("POST", "/api/v1/projects/7/chat", Some(&buyer))).await;

        let (_, owner_view) =
            call(&router, empty_request("GET", "/api/v1/projects/7", Some(&uploader))).await;
        let (_, buyer_view) =
            call(&router, empty_request("GET", "/api/v1/projects/7", Some(&buyer))).await;

        assert_eq!(owner_view["result"]["isOwner"], true);
        assert_eq!(owner_view["result"]["chatRooms"].as_array().unwrap().len(), 1);
        assert_eq!(buyer_view["result"]["isOwner"], false);
        assert!(buyer_view["result"]["chatRooms"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_forbid_deleting_others_project() {
        let (state, router) = setup().await;
        let auth = bearer(&state, BUYER_ID);

        let (status, body) =
            call(&router, empty_request("DELETE", "/api/v1/projects/7", Some(&auth))).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "COMMON403");
    }

    #[tokio::test]
    async fn should_delete_own_project() {
        let (state, router) = setup().await;
        let auth = bearer(&state, UPLOADER_ID);

        let (status, body) =
            call(&router, empty_request("DELETE", "/api/v1/projects/7", Some(&auth))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["projectId"], PROJECT_ID);

        let (status, _) =
            call(&router, empty_request("GET", "/api/v1/projects/7", Some(&auth))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

mod project_deletion {
    use super::*;
    use homerev_server::domain::chat::dto::SYSTEM_DISPLAY_NAME;
    use homerev_server::domain::chat::ChatService;

    #[tokio::test]
    async fn should_post_system_notice_to_open_rooms() {
        let (state, router) = setup().await;
        let room = ChatService::resolve_or_create(&state.db, PROJECT_ID, BUYER_ID, UPLOADER_ID)
            .await
            .unwrap();
        ChatService::append(&state.db, room.chat_room_id, BUYER_ID, "hi")
            .await
            .unwrap();
        let uploader = bearer(&state, UPLOADER_ID);
        let buyer = bearer(&state, BUYER_ID);

        let (status, _) =
            call(&router, empty_request("DELETE", "/api/v1/projects/7", Some(&uploader))).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            &router,
            empty_request(
                "GET",
                &format!("/api/v1/chat-rooms/{}/messages", room.chat_room_id),
                Some(&buyer),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let messages = body["result"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1]["isSystemMessage"], true);
        assert_eq!(messages[1]["senderDisplayName"], SYSTEM_DISPLAY_NAME);
        assert_eq!(messages[1]["read"], false);
    }
}

// ===== Review Tests =====

mod review {
    use super::*;

    #[tokio::test]
    async fn should_submit_and_list_reviews() {
        let (state, router) = setup().await;
        let auth = bearer(&state, BUYER_ID);

        let (status, _) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/projects/7/reviews",
                Some(&auth),
                json!({"content": "Great craftsmanship"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) =
            call(&router, empty_request("GET", "/api/v1/projects/7/reviews", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"][0]["content"], "Great craftsmanship");
        assert_eq!(body["result"][0]["authorUsername"], "u3");
    }

    #[tokio::test]
    async fn should_reject_blank_review() {
        let (state, router) = setup().await;
        let auth = bearer(&state, BUYER_ID);

        let (status, body) = call(
            &router,
            json_request(
                "POST",
                "/api/v1/projects/7/reviews",
                Some(&auth),
                json!({"content": "   "}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CONTENT4001");
    }
}

// ===== Chat Tests =====

mod chat {
    use super::*;
    use homerev_server::domain::chat::ChatService;

    #[tokio::test]
    async fn should_open_same_room_on_repeated_contact() {
        let (state, router) = setup().await;
        let auth = bearer(&state, BUYER_ID);

        let (status, first) =
            call(&router, empty_request("POST", "/api/v1/projects/7/chat", Some(&auth))).await;
        let (_, second) =
            call(&router, empty_request("POST", "/api/v1/projects/7/chat", Some(&auth))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(first["result"]["room"]["channelName"], "3_9");
        assert_eq!(
            first["result"]["room"]["chatRoomId"],
            second["result"]["room"]["chatRoomId"]
        );
        assert_eq!(count_rooms(&state.db).await, 1);
    }

    #[tokio::test]
    async fn should_reject_uploader_chatting_with_self() {
        let (state, router) = setup().await;
        let auth = bearer(&state, UPLOADER_ID);

        let (status, body) =
            call(&router, empty_request("POST", "/api/v1/projects/7/chat", Some(&auth))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "CHAT4001");
    }

    #[tokio::test]
    async fn should_let_uploader_enter_room_with_history() {
        let (state, router) = setup().await;
        let room = ChatService::resolve_or_create(&state.db, PROJECT_ID, BUYER_ID, UPLOADER_ID)
            .await
            .unwrap();
        ChatService::append(&state.db, room.chat_room_id, BUYER_ID, "hi")
            .await
            .unwrap();
        let auth = bearer(&state, UPLOADER_ID);

        let (status, body) = call(
            &router,
            empty_request(
                "GET",
                &format!("/api/v1/projects/7/chat-rooms/{}", room.chat_room_id),
                Some(&auth),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["messages"][0]["content"], "hi");
        assert_eq!(body["result"]["messages"][0]["senderDisplayName"], "u3");
    }

    #[tokio::test]
    async fn should_forbid_outsider_reading_messages() {
        let (state, router) = setup().await;
        let room = ChatService::resolve_or_create(&state.db, PROJECT_ID, BUYER_ID, UPLOADER_ID)
            .await
            .unwrap();
        let auth = bearer(&state, OUTSIDER_ID);

        let (status, _) = call(
            &router,
            empty_request(
                "GET",
                &format!("/api/v1/chat-rooms/{}/messages", room.chat_room_id),
                Some(&auth),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn should_mark_counterpart_messages_read() {
        let (state, router) = setup().await;
        let room = ChatService::resolve_or_create(&state.db, PROJECT_ID, BUYER_ID, UPLOADER_ID)
            .await
            .unwrap();
        ChatService::append(&state.db, room.chat_room_id, BUYER_ID, "hi")
            .await
            .unwrap();
        let auth = bearer(&state, UPLOADER_ID);

        let (status, body) = call(
            &router,
            empty_request(
                "POST",
                &format!("/api/v1/chat-rooms/{}/read", room.chat_room_id),
                Some(&auth),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["updatedCount"], 1);
    }
}
