//! API 라우트.
//!
//! 모든 REST API 엔드포인트를 정의하고 라우터를 구성합니다.
//!
//! # 라우트 구조
//!
//! - `/` - 서비스 상태
//! - `/health` - 헬스 체크 (liveness)
//! - `/api/auth/login` - 로그인 (토큰 발급)
//! - `/api/auth/me` - 현재 사용자 정보
//! - `/api/users` - 사용자 등록 (Admin) / 조회 (Manager)
//! - `/api/system/info` - 시스템 정보

pub mod auth;
pub mod health;
pub mod users;

pub use auth::{auth_router, LoginRequest, RequestError};
pub use health::{health_router, system_router, HealthResponse, RootResponse, SystemInfoResponse};
pub use users::{users_router, CreateUserRequest};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합하여 하나의 라우터로 반환합니다.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(health::root))
        .nest("/health", health_router())
        .nest("/api/auth", auth_router())
        .nest("/api/users", users_router())
        .nest("/api/system", system_router())
}
