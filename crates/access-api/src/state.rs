//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 시작 시 한 번 구성되며 이후 읽기 전용입니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유됩니다.

use std::sync::Arc;

use access_core::{AuthConfig, Environment};

use crate::auth::{CredentialHasher, TokenError, TokenService};
use crate::repository::{InMemoryUserDirectory, UserDirectory};

/// 애플리케이션 공유 상태.
///
/// Axum의 State extractor를 통해 핸들러에 주입됩니다.
/// 서명 시크릿은 [`TokenService`] 안에만 존재하며 전역 상태로 노출되지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// 토큰 발급/검증기
    pub tokens: TokenService,

    /// 자격증명 해셔
    pub hasher: CredentialHasher,

    /// 사용자 디렉터리
    pub users: Arc<dyn UserDirectory>,

    /// 실행 환경
    pub environment: Environment,

    /// 서버 시작 시간 (업타임 계산용)
    pub started_at: chrono::DateTime<chrono::Utc>,

    /// API 버전
    pub version: String,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("tokens", &self.tokens)
            .field("hasher", &self.hasher)
            .field("environment", &self.environment)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// 인증 설정으로 AppState 생성.
    ///
    /// 사용자 디렉터리는 빈 메모리 저장소로 시작합니다.
    pub fn new(auth: &AuthConfig, environment: Environment) -> Result<Self, TokenError> {
        Ok(Self {
            tokens: TokenService::new(auth)?,
            hasher: CredentialHasher::default(),
            users: Arc::new(InMemoryUserDirectory::new()),
            environment,
            started_at: chrono::Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// 사용자 디렉터리 설정.
    pub fn with_users(mut self, users: Arc<dyn UserDirectory>) -> Self {
        self.users = users;
        self
    }

    /// 자격증명 해셔 설정.
    pub fn with_hasher(mut self, hasher: CredentialHasher) -> Self {
        self.hasher = hasher;
        self
    }

    /// 서버 업타임 (초).
    pub fn uptime_secs(&self) -> i64 {
        (chrono::Utc::now() - self.started_at).num_seconds()
    }
}

/// 테스트용 서명 시크릿.
#[cfg(any(test, feature = "test-utils"))]
pub const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

/// 테스트용 AppState 생성.
///
/// 빠른 해싱 파라미터와 고정 시크릿을 사용합니다.
#[cfg(any(test, feature = "test-utils"))]
pub fn create_test_state() -> AppState {
    use crate::auth::Argon2Params;

    let hasher = CredentialHasher::with_params(Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid test params");

    AppState::new(&AuthConfig::new(TEST_SECRET), Environment::Development)
        .expect("valid test auth config")
        .with_hasher(hasher)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_test_state() {
        let state = create_test_state();
        assert_eq!(state.environment, Environment::Development);
        assert_eq!(state.tokens.default_ttl(), chrono::Duration::minutes(30));
        assert!(state.uptime_secs() >= 0);
        assert!(!state.version.is_empty());
    }

    #[test]
    fn test_new_without_secret_fails() {
        let mut auth = AuthConfig::new(TEST_SECRET);
        auth.secret_key = None;
        assert!(AppState::new(&auth, Environment::Development).is_err());
    }

    #[test]
    fn test_debug_omits_secret() {
        let debug = format!("{:?}", create_test_state());
        assert!(!debug.contains(TEST_SECRET));
    }
}
