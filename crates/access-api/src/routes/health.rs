//! 헬스 체크 및 시스템 정보 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템(Kubernetes 등)에서 사용됩니다.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::auth::OptionalAuthUser;
use crate::state::AppState;

/// 루트 상태 응답.
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    /// 항상 "running"
    pub status: String,
}

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 서비스 상태 ("healthy")
    pub status: String,
    /// API 버전
    pub version: String,
    /// 서버 업타임(초)
    pub uptime_secs: i64,
    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
}

/// 시스템 정보 응답.
///
/// 서명 시크릿은 포함하지 않습니다.
#[derive(Debug, Serialize, Deserialize)]
pub struct SystemInfoResponse {
    pub version: String,
    /// 실행 환경 ("development" | "production")
    pub environment: String,
    pub uptime_secs: i64,
    /// 토큰 서명 알고리즘
    pub token_algorithm: String,
    /// 토큰 기본 만료 시간 (분)
    pub token_expire_minutes: i64,
    /// 요청자 subject (인증된 경우)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principal: Option<String>,
}

/// 서비스 이름과 실행 상태.
///
/// GET /
pub async fn root(State(state): State<Arc<AppState>>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "Smart Access Control API".to_string(),
        version: state.version.clone(),
        status: "running".to_string(),
    })
}

/// 헬스 체크 (liveness probe용).
///
/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

/// 시스템 정보.
///
/// GET /api/system/info
pub async fn system_info(
    State(state): State<Arc<AppState>>,
    OptionalAuthUser(claims): OptionalAuthUser,
) -> Json<SystemInfoResponse> {
    Json(SystemInfoResponse {
        version: state.version.clone(),
        environment: state.environment.as_str().to_string(),
        uptime_secs: state.uptime_secs(),
        token_algorithm: format!("{:?}", state.tokens.algorithm()),
        token_expire_minutes: state.tokens.default_ttl().num_minutes(),
        principal: claims.map(|c| c.sub),
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}

/// 시스템 정보 라우터 생성.
pub fn system_router() -> Router<Arc<AppState>> {
    Router::new().route("/info", get(system_info))
}
