//! 저장소 계층.
//!
//! 사용자 조회 로직을 라우트 핸들러에서 분리하여 관리합니다.

pub mod users;

pub use users::{
    active_only, new_user_record, InMemoryUserDirectory, UserDirectory, UserDirectoryError,
};
