//! 출입 통제 API 서버.
//!
//! 설정을 로드하고 Axum 기반 REST API 서버를 시작합니다.

use std::sync::Arc;

use access_core::{init_logging, AppConfig, LogConfig};
use anyhow::Context;
use tracing::{error, info};

use access_api::server::{create_router, seed_bootstrap_admin, shutdown_signal};
use access_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    // 설정 로드. 시크릿 누락 등은 여기서 즉시 종료
    let config = match AppConfig::load_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("설정 로드 실패: {}", e);
            if e.is_startup_fatal() {
                std::process::exit(1);
            }
            return Err(e.into());
        }
    };

    let log_config = LogConfig::from_settings(&config.logging, config.environment);
    init_logging(&log_config)?;

    info!(
        environment = config.environment.as_str(),
        algorithm = %config.auth.algorithm,
        expire_minutes = config.auth.access_token_expire_minutes,
        "Starting access control API server..."
    );

    let state = AppState::new(&config.auth, config.environment)
        .context("토큰 서비스 초기화 실패")?;

    if let Err(e) = seed_bootstrap_admin(&state, &config).await {
        error!(error = %e, "Bootstrap admin seeding failed");
        return Err(e.into());
    }

    let state = Arc::new(state);
    info!(version = %state.version, "Application state initialized");

    let app = create_router(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("소켓 바인딩 실패: {}", addr))?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}
