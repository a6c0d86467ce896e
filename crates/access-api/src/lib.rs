//! 출입 통제 백엔드의 인증 코어 및 REST 경계.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - 자격증명 해싱/검증 (Argon2id)
//! - 서명 토큰 발급/검증
//! - 역할 기반 권한 판정
//! - Axum 기반 로그인/사용자 조회 API
//!
//! # 모듈 구성
//!
//! - [`auth`]: 해셔, 토큰 서비스, 역할, 인증 추출기
//! - [`audit`]: 경계 감사 로깅 래퍼
//! - [`state`]: 애플리케이션 공유 상태 (AppState)
//! - [`repository`]: 사용자 디렉터리
//! - [`routes`]: REST API 엔드포인트
//! - [`server`]: 라우터 조립, 부트스트랩, 종료 시그널

pub mod audit;
pub mod auth;
pub mod error;
pub mod repository;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{
    authorize, Claims, CredentialHasher, Permission, Role, TokenRejection, TokenService,
};
pub use error::{ApiErrorResponse, ApiResult};
pub use routes::create_api_router;
pub use server::create_router;
pub use state::AppState;

#[cfg(any(test, feature = "test-utils"))]
pub use state::create_test_state;
