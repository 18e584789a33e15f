//! 통합 테스트 공통 헬퍼
//!
//! 인메모리 SQLite에 스키마를 만들고 고정 id의 사용자/프로젝트를 넣는다.

#![allow(dead_code)]

use axum::body::Body;
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde_json::Value;

use homerev_server::config::{create_tables, establish_connection, AppConfig};
use homerev_server::domain::chat::entity::chat_room;
use homerev_server::domain::project::entity::project;
use homerev_server::domain::user::entity::user;
use homerev_server::state::AppState;
use homerev_server::utils::jwt::encode_token;

pub const BUYER_ID: i64 = 3;
pub const UPLOADER_ID: i64 = 9;
pub const OUTSIDER_ID: i64 = 5;
pub const PROJECT_ID: i64 = 7;

pub async fn setup_db() -> DatabaseConnection {
    let db = establish_connection("sqlite::memory:").await.unwrap();
    create_tables(&db).await.unwrap();
    db
}

pub async fn seed_user(db: &DatabaseConnection, user_id: i64, username: &str) -> user::Model {
    let now = Utc::now().naive_utc();
    user::ActiveModel {
        user_id: Set(user_id),
        username: Set(username.to_string()),
        email: Set(format!("{}@homerev.test", username)),
        password_hash: Set("not-a-real-hash".to_string()),
        bio: Set(None),
        rating: Set(None),
        is_admin: Set(false),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .unwrap()
}

pub async fn seed_project(
    db: &DatabaseConnection,
    project_id: i64,
    owner_id: i64,
    room_type: &str,
) -> project::Model {
    project::ActiveModel {
        project_id: Set(project_id),
        name: Set(format!("{} remodel", room_type)),
        description: Set(Some("full renovation".to_string())),
        price: Set(1200.0),
        image_path: Set(None),
        room_type: Set(room_type.to_string()),
        owner_id: Set(owner_id),
        created_at: Set(Utc::now().naive_utc()),
    }
    .insert(db)
    .await
    .unwrap()
}

/// 사용자 3(u3), 9(u9), 5(u5)와 사용자 9가 올린 프로젝트 7
pub async fn seed_marketplace(db: &DatabaseConnection) {
    seed_user(db, BUYER_ID, "u3").await;
    seed_user(db, UPLOADER_ID, "u9").await;
    seed_user(db, OUTSIDER_ID, "u5").await;
    seed_project(db, PROJECT_ID, UPLOADER_ID, "Kitchen").await;
}

pub async fn seeded_state() -> AppState {
    let db = setup_db().await;
    seed_marketplace(&db).await;
    AppState::new(db, AppConfig::default())
}

pub async fn count_rooms(db: &DatabaseConnection) -> usize {
    use sea_orm::EntityTrait;
    chat_room::Entity::find().all(db).await.unwrap().len()
}

pub fn bearer(state: &AppState, user_id: i64) -> String {
    let token = encode_token(user_id, &state.config.jwt_secret, 3600).unwrap();
    format!("Bearer {}", token)
}

pub async fn parse_response_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
