//! Axum용 토큰 인증 추출기.
//!
//! `Authorization: Bearer <token>` 헤더를 [`TokenService`](super::TokenService)로 검증합니다.
//! 검증 실패 사유(형식 오류, 위조, 만료)는 로그에만 남기고 응답은 동일하게 401입니다.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, warn};

use super::{Claims, Permission, Role};
use crate::error::ApiErrorResponse;
use crate::state::AppState;

/// 인증 추출기.
///
/// Axum 핸들러에서 인증된 사용자 클레임을 추출합니다.
///
/// ```rust,ignore
/// async fn protected_handler(AuthUser(claims): AuthUser) -> impl IntoResponse {
///     format!("Authenticated user: {}", claims.sub)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

/// 인증 에러.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("인증 토큰이 필요합니다")]
    MissingToken,
    #[error("잘못된 Authorization 헤더 형식")]
    InvalidAuthHeader,
    #[error("유효하지 않은 토큰")]
    InvalidToken,
    #[error("사용자명 또는 비밀번호가 올바르지 않습니다")]
    InvalidCredentials,
    #[error("권한이 부족합니다")]
    InsufficientPermission,
    #[error("내부 서버 오류")]
    Internal,
}

impl AuthError {
    /// HTTP 상태 코드와 에러 코드.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AuthError::MissingToken => (StatusCode::UNAUTHORIZED, "MISSING_TOKEN"),
            AuthError::InvalidAuthHeader => (StatusCode::UNAUTHORIZED, "INVALID_AUTH_HEADER"),
            AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "INVALID_TOKEN"),
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AuthError::InsufficientPermission => {
                (StatusCode::FORBIDDEN, "INSUFFICIENT_PERMISSION")
            }
            AuthError::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let mut response = (status, Json(ApiErrorResponse::new(code, self.to_string()))).into_response();

        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }

        response
    }
}

/// Authorization 헤더에서 Bearer 토큰 추출.
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    let (scheme, token) = auth_header
        .split_once(' ')
        .ok_or(AuthError::InvalidAuthHeader)?;

    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidAuthHeader);
    }

    Ok(token.trim())
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = Arc::<AppState>::from_ref(state);
        let token = bearer_token(parts)?;

        let claims = state.tokens.validate(token).map_err(|rejection| {
            warn!(
                reason = rejection.reason(),
                path = %parts.uri.path(),
                "Token rejected"
            );
            AuthError::InvalidToken
        })?;

        debug!(subject = %claims.sub, role = %claims.role(), "Token accepted");
        Ok(AuthUser(claims))
    }
}

/// 특정 역할 이상의 권한 요구.
///
/// 권한이 충분하면 `Ok(())`, 부족하면 [`AuthError::InsufficientPermission`].
pub fn require_role(required_role: Role, claims: &Claims) -> Result<(), AuthError> {
    if claims.has_role(required_role) {
        Ok(())
    } else {
        warn!(
            subject = %claims.sub,
            actual = %claims.role(),
            required = %required_role,
            "Insufficient role"
        );
        Err(AuthError::InsufficientPermission)
    }
}

/// 특정 권한 요구.
pub fn require_permission(permission: Permission, claims: &Claims) -> Result<(), AuthError> {
    if claims.has_permission(permission) {
        Ok(())
    } else {
        warn!(
            subject = %claims.sub,
            actual = %claims.role(),
            permission = permission.description(),
            "Permission denied"
        );
        Err(AuthError::InsufficientPermission)
    }
}

/// 선택적 인증 추출기.
///
/// 유효한 토큰이 있으면 클레임을, 없거나 무효하면 `None`을 반환합니다.
#[derive(Debug, Clone)]
pub struct OptionalAuthUser(pub Option<Claims>);

impl<S> FromRequestParts<S> for OptionalAuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(claims)) => Ok(OptionalAuthUser(Some(claims))),
            Err(_) => Ok(OptionalAuthUser(None)),
        }
    }
}

/// Admin 권한을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl<S> FromRequestParts<S> for AdminAuth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_role(Role::Admin, &claims)?;
        Ok(AdminAuth(claims))
    }
}

/// Manager 이상 권한을 요구하는 추출기.
#[derive(Debug, Clone)]
pub struct ManagerAuth(pub Claims);

impl<S> FromRequestParts<S> for ManagerAuth
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        require_role(Role::Manager, &claims)?;
        Ok(ManagerAuth(claims))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::create_test_state;
    use axum::http::Request;

    fn parts_with_header(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/auth/me");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_require_role() {
        let admin = Claims::new("1").with_role("admin");
        let manager = Claims::new("2").with_role("manager");
        let guest = Claims::new("3");

        assert!(require_role(Role::Admin, &admin).is_ok());
        assert!(require_role(Role::User, &admin).is_ok());

        assert!(require_role(Role::Admin, &manager).is_err());
        assert!(require_role(Role::Manager, &manager).is_ok());

        assert!(require_role(Role::User, &guest).is_err());
        assert!(require_role(Role::Guest, &guest).is_ok());
    }

    #[test]
    fn test_require_permission() {
        let user = Claims::new("1").with_role("user");
        assert!(require_permission(Permission::ViewOwnProfile, &user).is_ok());
        assert!(matches!(
            require_permission(Permission::ManageUsers, &user),
            Err(AuthError::InsufficientPermission)
        ));
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert!(matches!(
            bearer_token(&parts_with_header(None)),
            Err(AuthError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&parts_with_header(Some("Basic abc"))),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert!(matches!(
            bearer_token(&parts_with_header(Some("Bearer"))),
            Err(AuthError::InvalidAuthHeader)
        ));
        assert_eq!(bearer_token(&parts_with_header(Some("Bearer abc"))).unwrap(), "abc");
        assert_eq!(bearer_token(&parts_with_header(Some("bearer abc"))).unwrap(), "abc");
    }

    #[tokio::test]
    async fn test_auth_user_extractor() {
        let state = Arc::new(create_test_state());
        let claims = Claims::new("42").with_role("manager");
        let token = state.tokens.issue(&claims).unwrap();

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        let AuthUser(extracted) = AuthUser::from_request_parts(&mut parts, &state).await.unwrap();
        assert_eq!(extracted, claims);

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        assert!(ManagerAuth::from_request_parts(&mut parts, &state).await.is_ok());

        let mut parts = parts_with_header(Some(&format!("Bearer {}", token)));
        assert!(matches!(
            AdminAuth::from_request_parts(&mut parts, &state).await,
            Err(AuthError::InsufficientPermission)
        ));
    }

    #[tokio::test]
    async fn test_invalid_token_rejected() {
        let state = Arc::new(create_test_state());

        let mut parts = parts_with_header(Some("Bearer invalid.token.here"));
        assert!(matches!(
            AuthUser::from_request_parts(&mut parts, &state).await,
            Err(AuthError::InvalidToken)
        ));

        let mut parts = parts_with_header(Some("Bearer invalid.token.here"));
        let OptionalAuthUser(claims) = OptionalAuthUser::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert!(claims.is_none());
    }

    #[test]
    fn test_auth_error_responses() {
        let cases = [
            (AuthError::MissingToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidAuthHeader, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::InsufficientPermission, StatusCode::FORBIDDEN),
            (AuthError::Internal, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, expected) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), expected);
            assert_eq!(
                response.headers().contains_key(axum::http::header::WWW_AUTHENTICATE),
                expected == StatusCode::UNAUTHORIZED
            );
        }
    }
}
