//! 서버 조립.
//!
//! 라우터에 공통 미들웨어(CORS, 타임아웃, 트레이싱)를 적용하고,
//! 시작 시 부트스트랩 관리자 계정을 등록합니다.

use std::sync::Arc;
use std::time::Duration;

use access_core::AppConfig;
use axum::{http::StatusCode, Router};
use secrecy::ExposeSecret;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::auth::{validate_password_strength, PasswordError, Role};
use crate::repository::{new_user_record, UserDirectoryError};
use crate::routes::create_api_router;
use crate::state::AppState;

/// 전역 요청 타임아웃.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// 부트스트랩 에러.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("부트스트랩 관리자 비밀번호 정책 위반: {0}")]
    WeakPassword(PasswordError),
    #[error("부트스트랩 관리자 비밀번호 해싱 실패: {0}")]
    Hashing(String),
    #[error("부트스트랩 관리자 등록 실패: {0}")]
    Directory(#[from] UserDirectoryError),
}

/// CORS 레이어 생성.
///
/// 출입 통제 대시보드가 여러 호스트에서 접근하므로 모든 origin을 허용합니다.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        // preflight 요청 캐시 시간
        .max_age(Duration::from_secs(3600))
}

/// 전체 라우터 생성.
pub fn create_router(state: Arc<AppState>) -> Router {
    create_api_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors_layer())
}

/// 설정에 부트스트랩 관리자가 있으면 사용자 디렉터리에 등록.
///
/// 운영 환경에서는 비밀번호 정책을 통과해야 하며, 개발 환경에서는 경고만 남깁니다.
/// 이미 같은 사용자명이 있으면 건너뜁니다.
pub async fn seed_bootstrap_admin(
    state: &AppState,
    config: &AppConfig,
) -> Result<(), BootstrapError> {
    let Some((username, password)) = config.bootstrap.admin() else {
        return Ok(());
    };
    let password = password.expose_secret();

    if let Err(e) = validate_password_strength(password) {
        if config.environment.is_production() {
            return Err(BootstrapError::WeakPassword(e));
        }
        warn!(username, error = %e, "Bootstrap admin password is weak");
    }

    if state.users.find_by_username(username).await?.is_some() {
        info!(username, "Bootstrap admin already present");
        return Ok(());
    }

    let hasher = state.hasher.clone();
    let owned = password.to_string();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&owned))
        .await
        .map_err(|e| BootstrapError::Hashing(e.to_string()))?
        .map_err(|e| BootstrapError::Hashing(e.to_string()))?;

    let admin = new_user_record(username, password_hash, username, &Role::Admin.to_string());
    let admin = state.users.insert(admin).await?;
    info!(user_id = admin.id, username, "Bootstrap admin created");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
