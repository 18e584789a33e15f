use std::time::Instant;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::domain::chat::ChatHub;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: AppConfig,
    /// 실시간 채팅 채널 레지스트리
    pub hub: ChatHub,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let hub = ChatHub::new(config.chat_channel_capacity);
        Self {
            db,
            config,
            hub,
            started_at: Instant::now(),
        }
    }
}
