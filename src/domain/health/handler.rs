use axum::{extract::State, http::StatusCode, Json};

use super::dto::{HealthState, HealthStatus};
use super::service::check_health;
use crate::state::AppState;

/// 헬스체크 API
///
/// DB에 연결할 수 없으면 503을 반환합니다.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "정상 또는 응답 지연", body = HealthStatus),
        (status = 503, description = "DB 연결 불가", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let status = check_health(&state).await;
    let code = match status.status {
        HealthState::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthState::Healthy | HealthState::Degraded => StatusCode::OK,
    };
    (code, Json(status))
}
