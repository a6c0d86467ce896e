//! 사용자 조회 저장소.
//!
//! 로그인과 토큰 주체 조회에 필요한 최소한의 사용자 디렉터리를 정의합니다.

use std::collections::HashMap;

use access_core::User;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// 사용자 저장소 에러.
#[derive(Debug, thiserror::Error)]
pub enum UserDirectoryError {
    #[error("이미 존재하는 사용자명: {0}")]
    DuplicateUsername(String),
    #[error("사용자를 찾을 수 없습니다: {0}")]
    NotFound(i64),
}

/// 사용자 디렉터리 trait.
///
/// 저장소 구현(DB, LDAP 등)이 이 trait을 구현하여 인증 계층에 사용자 정보를 제공합니다.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// 사용자명으로 조회.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserDirectoryError>;

    /// ID로 조회.
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserDirectoryError>;

    /// 새 사용자 등록. `user.id`는 무시되고 새로 할당된 ID의 레코드가 반환됩니다.
    async fn insert(&self, user: User) -> Result<User, UserDirectoryError>;

    /// 비밀번호 해시 교체 (재해싱 등).
    async fn update_password_hash(
        &self,
        id: i64,
        password_hash: String,
    ) -> Result<(), UserDirectoryError>;
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<i64, User>,
    next_id: i64,
}

/// 메모리 기반 사용자 디렉터리.
///
/// 단일 노드 배포와 테스트에 사용합니다.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    inner: RwLock<Inner>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// 미리 준비된 사용자로 생성 (ID 유지).
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users: HashMap<i64, User> = users.into_iter().map(|u| (u.id, u)).collect();
        let next_id = users.keys().copied().max().unwrap_or(0);

        Self {
            inner: RwLock::new(Inner { users, next_id }),
        }
    }

    /// 등록된 사용자 수.
    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserDirectoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, UserDirectoryError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, mut user: User) -> Result<User, UserDirectoryError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| u.username == user.username) {
            return Err(UserDirectoryError::DuplicateUsername(user.username));
        }

        inner.next_id += 1;
        user.id = inner.next_id;
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update_password_hash(
        &self,
        id: i64,
        password_hash: String,
    ) -> Result<(), UserDirectoryError> {
        let mut inner = self.inner.write().await;
        match inner.users.get_mut(&id) {
            Some(user) => {
                user.rotate_password_hash(password_hash);
                Ok(())
            }
            None => Err(UserDirectoryError::NotFound(id)),
        }
    }
}

/// 로그인 가능한 사용자만 남기는 헬퍼.
pub fn active_only(user: Option<User>) -> Option<User> {
    user.filter(|u| u.status.can_login())
}

/// 등록 전 사용자 레코드 생성. ID는 [`UserDirectory::insert`]에서 할당됩니다.
pub fn new_user_record(username: &str, password_hash: String, name: &str, role: &str) -> User {
    User::new(0, username, password_hash, name).with_role(role)
}
