use std::env;

/// 기본 채팅 채널 버퍼 크기
const DEFAULT_CHAT_CHANNEL_CAPACITY: usize = 200;

/// 애플리케이션 설정
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: i64,

    // Chat
    pub chat_channel_capacity: usize,
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            tracing::warn!(
                "DATABASE_URL 환경변수가 설정되지 않았습니다. 로컬 SQLite 파일을 사용합니다."
            );
            "sqlite://homerev.db?mode=rwc".to_string()
        });

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!(
                "JWT_SECRET 환경변수가 설정되지 않았습니다. 프로덕션 환경에서는 반드시 설정하세요."
            );
            "secret".to_string()
        });

        let jwt_expiration = env::var("JWT_EXPIRATION")
            .unwrap_or_else(|_| "86400".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidExpiration)?;

        let chat_channel_capacity = env::var("CHAT_CHANNEL_CAPACITY")
            .unwrap_or_else(|_| DEFAULT_CHAT_CHANNEL_CAPACITY.to_string())
            .parse::<usize>()
            .ok()
            .filter(|capacity| *capacity > 0)
            .ok_or(ConfigError::InvalidChannelCapacity)?;

        Ok(Self {
            server_port,
            database_url,
            jwt_secret,
            jwt_expiration,
            chat_channel_capacity,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 8080,
            database_url: "sqlite::memory:".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration: 86400,
            chat_channel_capacity: DEFAULT_CHAT_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,
    #[error("Invalid expiration time")]
    InvalidExpiration,
    #[error("CHAT_CHANNEL_CAPACITY must be a positive integer")]
    InvalidChannelCapacity,
}
