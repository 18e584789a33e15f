use std::time::{Duration, Instant};

use sea_orm::DatabaseConnection;
use tokio::time::timeout;

use super::dto::{ChatCheck, DatabaseCheck, HealthState, HealthStatus};
use crate::state::AppState;

const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// 이 이상 걸리면 Degraded
const SLOW_PING: Duration = Duration::from_secs(1);

pub async fn check_health(state: &AppState) -> HealthStatus {
    let database = ping_database(&state.db).await;

    HealthStatus {
        status: classify(&database),
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started_at.elapsed().as_secs(),
        database,
        chat: ChatCheck {
            active_channels: state.hub.channel_count().await,
        },
    }
}

async fn ping_database(db: &DatabaseConnection) -> DatabaseCheck {
    let start = Instant::now();
    let result = timeout(PING_TIMEOUT, db.ping()).await;
    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => DatabaseCheck::reachable(latency_ms),
        Ok(Err(e)) => DatabaseCheck::unreachable(latency_ms, e.to_string()),
        Err(_) => DatabaseCheck::unreachable(latency_ms, "Timeout"),
    }
}

fn classify(database: &DatabaseCheck) -> HealthState {
    if !database.reachable {
        HealthState::Unhealthy
    } else if database.latency_ms >= SLOW_PING.as_millis() as u64 {
        HealthState::Degraded
    } else {
        HealthState::Healthy
    }
}
