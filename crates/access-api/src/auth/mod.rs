//! 인증 및 권한 부여.
//!
//! 토큰 기반 인증 및 역할 기반 접근 제어(RBAC)를 제공합니다.
//!
//! # 구성 요소
//!
//! - [`CredentialHasher`]: 비밀번호 해싱/검증 (Argon2id)
//! - [`TokenService`]: 서명 토큰 발급/검증
//! - [`Role`], [`authorize`]: 역할 등급 비교
//! - [`AuthUser`]: Axum 핸들러용 인증 추출기
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! async fn protected_handler(AuthUser(claims): AuthUser) -> impl IntoResponse {
//!     format!("Hello, {}!", claims.sub)
//! }
//! ```

mod middleware;
mod password;
mod roles;
mod token;

pub use middleware::{
    require_permission, require_role, AdminAuth, AuthError, AuthUser, ManagerAuth,
    OptionalAuthUser,
};
pub use password::{validate_password_strength, Argon2Params, CredentialHasher, PasswordError};
pub use roles::{authorize, rank_of, Permission, Role};
pub use token::{
    Claims, TokenError, TokenRejection, TokenResponse, TokenService, VerifiedToken,
    RESERVED_CLAIMS,
};
