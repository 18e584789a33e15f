use serde::Serialize;
use utoipa::ToSchema;

/// `GET /health` 응답
#[derive(Serialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthStatus {
    pub status: HealthState,
    #[schema(example = "0.1.0")]
    pub version: &'static str,
    #[schema(example = 3600)]
    pub uptime_secs: u64,
    pub database: DatabaseCheck,
    pub chat: ChatCheck,
}

#[derive(Serialize, Debug, PartialEq, Eq, Clone, Copy, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    /// DB 응답이 느림
    Degraded,
    /// DB 연결 불가
    Unhealthy,
}

/// DB 핑 결과
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseCheck {
    pub reachable: bool,
    #[schema(example = 3)]
    pub latency_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatabaseCheck {
    pub fn reachable(latency_ms: u64) -> Self {
        Self {
            reachable: true,
            latency_ms,
            error: None,
        }
    }

    pub fn unreachable(latency_ms: u64, error: impl Into<String>) -> Self {
        Self {
            reachable: false,
            latency_ms,
            error: Some(error.into()),
        }
    }
}

/// 실시간 채팅 허브 상태
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatCheck {
    /// 구독자가 있는 채널 수
    pub active_channels: usize,
}
