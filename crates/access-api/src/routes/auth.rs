//! 로그인 및 현재 사용자 조회 endpoint.
//!
//! 로그인 실패 시 사용자 없음, 비활성 사용자, 비밀번호 불일치를 구분하지 않고
//! 동일한 401 응답을 반환합니다.

use std::sync::Arc;

use access_core::{User, UserProfile};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{debug, error, info, warn, Instrument};
use validator::Validate;

use crate::audit::audited;
use crate::auth::{AuthError, AuthUser, Claims, CredentialHasher, TokenResponse};
use crate::error::ApiErrorResponse;
use crate::repository::active_only;
use crate::state::AppState;

/// 로그인 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 64, message = "사용자명은 1-64자여야 합니다"))]
    pub username: String,
    #[validate(length(min = 1, max = 256, message = "비밀번호는 1-256자여야 합니다"))]
    pub password: String,
}

/// 요청 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::Validation(message) => (
                StatusCode::BAD_REQUEST,
                Json(ApiErrorResponse::new("VALIDATION_ERROR", message)),
            )
                .into_response(),
            RequestError::Auth(e) => e.into_response(),
        }
    }
}

/// validator 에러를 사람이 읽을 수 있는 메시지로 변환.
pub(crate) fn validation_message(errors: &validator::ValidationErrors) -> String {
    errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{}: 유효하지 않은 값", field))
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// CPU 비용이 큰 해시 검증을 blocking thread pool에서 실행.
///
/// 저장된 해시가 없으면 더미 해시로 같은 비용을 치르고 `false`를 반환합니다.
async fn verify_blocking(
    hasher: CredentialHasher,
    password: String,
    stored_hash: Option<String>,
) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || hasher.verify_optional(&password, stored_hash.as_deref()))
        .await
        .map_err(|e| {
            error!(error = %e, "Password verification task failed");
            AuthError::Internal
        })
}

/// CPU 비용이 큰 해싱을 blocking thread pool에서 실행.
pub(crate) async fn hash_blocking(
    hasher: CredentialHasher,
    password: String,
) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| {
            error!(error = %e, "Password hashing task failed");
            AuthError::Internal
        })?
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            AuthError::Internal
        })
}

/// 사용자명/비밀번호 검증.
///
/// 사용자 없음, 비활성 사용자, 비밀번호 불일치 모두 해시 검증을 한 번 거친 뒤
/// 같은 에러를 반환합니다.
async fn authenticate(state: &AppState, request: LoginRequest) -> Result<User, AuthError> {
    let candidate = state
        .users
        .find_by_username(&request.username)
        .await
        .map_err(|e| {
            error!(error = %e, "User lookup failed");
            AuthError::Internal
        })?;

    let verified = verify_blocking(
        state.hasher.clone(),
        request.password.clone(),
        candidate.as_ref().map(|u| u.password_hash.clone()),
    )
    .await?;

    let user = match candidate {
        None => {
            debug!(username = %request.username, "Unknown user");
            return Err(AuthError::InvalidCredentials);
        }
        Some(user) if !user.status.can_login() => {
            debug!(user_id = user.id, status = %user.status, "Inactive user");
            return Err(AuthError::InvalidCredentials);
        }
        Some(user) if !verified => {
            debug!(user_id = user.id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }
        Some(user) => user,
    };

    if state.hasher.needs_rehash(&user.password_hash) {
        rehash(state, &user, request.password).await;
    }

    Ok(user)
}

/// 현재 파라미터로 비밀번호 재해싱. 실패해도 로그인은 계속됩니다.
async fn rehash(state: &AppState, user: &User, password: String) {
    let new_hash = match hash_blocking(state.hasher.clone(), password).await {
        Ok(hash) => hash,
        Err(_) => return,
    };

    match state.users.update_password_hash(user.id, new_hash).await {
        Ok(()) => info!(user_id = user.id, "Password hash upgraded"),
        Err(e) => warn!(user_id = user.id, error = %e, "Password rehash failed"),
    }
}

/// 자격증명 검증 후 토큰 발급.
async fn issue_token(state: &AppState, request: LoginRequest) -> Result<TokenResponse, AuthError> {
    let user = authenticate(state, request).await?;

    state.tokens.issue_for(&user).map_err(|e| {
        error!(error = %e, "Token issuance failed");
        AuthError::Internal
    })
}

/// 토큰 subject의 활성 사용자 프로필 조회.
async fn load_profile(state: &AppState, claims: &Claims) -> Result<UserProfile, AuthError> {
    let id: i64 = claims.sub.parse().map_err(|_| AuthError::InvalidToken)?;

    let user = state.users.find_by_id(id).await.map_err(|e| {
        error!(error = %e, "User lookup failed");
        AuthError::Internal
    })?;

    active_only(user)
        .map(|u| u.profile())
        .ok_or(AuthError::InvalidToken)
}

/// 로그인.
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, RequestError> {
    if let Err(errors) = request.validate() {
        return Err(RequestError::Validation(validation_message(&errors)));
    }

    let span = access_core::auth_span!("login", request.username);

    let response = audited("login", issue_token(&state, request))
        .instrument(span)
        .await?;

    Ok(Json(response))
}

/// 현재 사용자 정보.
///
/// GET /api/auth/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<Json<UserProfile>, RequestError> {
    let span = access_core::auth_span!("me", claims.sub, claims.role());

    let profile = audited("me", load_profile(&state, &claims))
        .instrument(span)
        .await?;

    Ok(Json(profile))
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}
