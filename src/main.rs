use std::net::SocketAddr;

use homerev_server::config::{establish_connection, AppConfig};
use homerev_server::shutdown::shutdown_signal;
use homerev_server::state::AppState;
use homerev_server::utils::logging::init_logging;
use homerev_server::app;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화 (guard는 main이 끝날 때까지 유지)
    let _log_guard = init_logging();

    if let Err(e) = run().await {
        error!("Server terminated with error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    // 3. 설정 로드
    let config = AppConfig::from_env()?;

    // 4. DB 연결
    let db = establish_connection(&config.database_url).await?;

    // 5. 라우터 설정
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = app(AppState::new(db, config));

    // 6. 서버 실행
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);
    info!("Swagger UI: http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}
