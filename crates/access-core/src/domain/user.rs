//! 사용자 레코드.
//!
//! 이 모듈은 출입 통제 시스템의 사용자 관련 타입을 정의합니다:
//! - `UserStatus` - 계정 상태
//! - `User` - 비밀번호 해시를 포함한 내부 레코드
//! - `UserProfile` - 외부로 노출되는 공개 뷰

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 신규 사용자 기본 역할.
pub const DEFAULT_USER_ROLE: &str = "user";

/// 사용자 계정 상태.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// 활성 - 로그인 가능
    #[default]
    Active,
    /// 비활성 - 관리자가 사용 중지
    Inactive,
    /// 잠김 - 보안 사유로 차단
    Locked,
}

impl UserStatus {
    /// 로그인 가능한 상태인지 확인합니다.
    pub fn can_login(&self) -> bool {
        matches!(self, UserStatus::Active)
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
            UserStatus::Locked => "locked",
        };
        write!(f, "{}", s)
    }
}

/// 사용자 레코드.
///
/// `password_hash`는 저장용 해시 문자열이며 평문 비밀번호는 절대 보관하지 않습니다.
/// 직렬화 시 해시는 제외됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// 사용자 ID
    pub id: i64,
    /// 로그인 이름 (고유)
    pub username: String,
    /// 저장된 비밀번호 해시
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// 표시 이름
    pub name: String,
    /// 이메일
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 전화번호
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// 역할 레이블 (guest, user, manager, admin)
    pub role: String,
    /// 계정 상태
    pub status: UserStatus,
    /// 생성 시간
    pub created_at: DateTime<Utc>,
    /// 수정 시간
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 새 사용자 생성.
    ///
    /// # Arguments
    ///
    /// * `id` - 사용자 ID
    /// * `username` - 로그인 이름
    /// * `password_hash` - 이미 해싱된 비밀번호
    /// * `name` - 표시 이름
    pub fn new(
        id: i64,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: username.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            email: None,
            phone: None,
            role: DEFAULT_USER_ROLE.to_string(),
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// 역할 지정.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// 상태 지정.
    pub fn with_status(mut self, status: UserStatus) -> Self {
        self.status = status;
        self
    }

    /// 이메일 지정.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// 토큰 subject로 사용하는 ID 문자열.
    pub fn subject(&self) -> String {
        self.id.to_string()
    }

    /// 비밀번호 해시 교체 (자격증명 변경).
    pub fn rotate_password_hash(&mut self, password_hash: impl Into<String>) {
        self.password_hash = password_hash.into();
        self.updated_at = Utc::now();
    }

    /// 외부 노출용 공개 뷰.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            status: self.status,
        }
    }
}

/// 사용자 공개 뷰.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: String,
    pub status: UserStatus,
}
