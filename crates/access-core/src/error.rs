//! 출입 통제 시스템의 에러 타입.
//!
//! 이 모듈은 시스템 전반에서 사용되는 에러 타입을 정의합니다.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum AccessError {
    /// 설정 값 검증 에러
    #[error("설정 에러: {0}")]
    Config(String),

    /// 설정 소스 로드 에러
    #[error("설정 로드 실패: {0}")]
    ConfigSource(#[from] config::ConfigError),

    /// 로깅 초기화 에러
    #[error("로깅 초기화 실패: {0}")]
    Logging(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// 시작 시 치명적인 에러인지 확인합니다.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, AccessError::Config(_) | AccessError::ConfigSource(_))
    }
}
