//! 출입 통제 운영을 위한 도메인 모델.

mod user;

pub use user::*;
