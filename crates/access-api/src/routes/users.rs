//! 사용자 관리 endpoint.
//!
//! 등록은 Admin, 조회는 Manager 이상만 가능합니다.

use std::sync::Arc;

use access_core::{UserProfile, DEFAULT_USER_ROLE};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{error, info, Instrument};
use validator::Validate;

use super::auth::{hash_blocking, validation_message, RequestError};
use crate::audit::audited;
use crate::auth::{validate_password_strength, AdminAuth, AuthError, ManagerAuth, Role};
use crate::error::{ApiErrorResponse, ApiResult};
use crate::repository::{new_user_record, UserDirectoryError};
use crate::state::AppState;

/// 사용자 등록 요청.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 64, message = "사용자명은 3-64자여야 합니다"))]
    pub username: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "이름은 1-100자여야 합니다"))]
    pub name: String,
    #[validate(email(message = "이메일 형식이 올바르지 않습니다"))]
    pub email: Option<String>,
    /// 역할 (기본 "user")
    pub role: Option<String>,
}

/// 해싱 후 디렉터리에 등록.
async fn register(
    state: &AppState,
    request: CreateUserRequest,
    role: String,
) -> Result<UserProfile, RequestError> {
    let password_hash = hash_blocking(state.hasher.clone(), request.password).await?;

    let mut record = new_user_record(&request.username, password_hash, &request.name, &role);
    record.email = request.email;

    match state.users.insert(record).await {
        Ok(user) => {
            info!(user_id = user.id, role = %user.role, "User created");
            Ok(user.profile())
        }
        Err(UserDirectoryError::DuplicateUsername(name)) => Err(RequestError::Validation(
            format!("이미 존재하는 사용자명: {}", name),
        )),
        Err(e) => {
            error!(error = %e, "User insert failed");
            Err(AuthError::Internal.into())
        }
    }
}

/// 사용자 등록.
///
/// POST /api/users
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AdminAuth(claims): AdminAuth,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserProfile>), RequestError> {
    if let Err(errors) = request.validate() {
        return Err(RequestError::Validation(validation_message(&errors)));
    }
    validate_password_strength(&request.password)
        .map_err(|e| RequestError::Validation(e.to_string()))?;

    let role = match request.role.as_deref() {
        None => DEFAULT_USER_ROLE.to_string(),
        Some(label) => Role::parse(label)
            .ok_or_else(|| RequestError::Validation(format!("알 수 없는 역할: {}", label)))?
            .to_string(),
    };

    let span = access_core::auth_span!("create_user", claims.sub, claims.role());

    let profile = audited("create_user", register(&state, request, role))
        .instrument(span)
        .await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// 사용자 조회.
///
/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ManagerAuth(_claims): ManagerAuth,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserProfile>> {
    match state.users.find_by_id(id).await {
        Ok(Some(user)) => Ok(Json(user.profile())),
        Ok(None) => Err(ApiErrorResponse::new(
            "USER_NOT_FOUND",
            format!("사용자를 찾을 수 없습니다: {}", id),
        )
        .with_status(StatusCode::NOT_FOUND)),
        Err(e) => {
            error!(error = %e, "User lookup failed");
            Err(ApiErrorResponse::new("INTERNAL_ERROR", "내부 서버 오류")
                .with_status(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }
}

/// 사용자 관리 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user))
        .route("/{id}", get(get_user))
}
