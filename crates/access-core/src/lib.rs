//! # Access Core
//!
//! 출입 통제 백엔드의 공통 기반을 제공합니다:
//! - 설정 관리 (서명 시크릿, 토큰 만료 시간, 서버 주소)
//! - 로깅 인프라
//! - 에러 타입
//! - 사용자 도메인 레코드

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use crate::config::{AppConfig, AuthConfig, Environment};
pub use domain::*;
pub use error::*;
pub use logging::*;
