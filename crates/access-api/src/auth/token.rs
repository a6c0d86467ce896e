//! 서명 토큰 발급 및 검증.
//!
//! JWS compact 형식(`header.claims.signature`, base64url)의 HMAC 서명 토큰을 사용합니다.
//! 서버에 토큰을 저장하지 않으며, 서명 시크릿만 있으면 외부 검증기도 검증할 수 있습니다.
//!
//! 토큰 상태는 발급 → 유효 → 만료(종료) 또는 무효(종료)로만 전이합니다.

use std::fmt;
use std::str::FromStr;

use access_core::{AuthConfig, User};
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Role;

/// 발급 시 자동으로 채워지거나 전용 필드가 있는 클레임 이름.
pub const RESERVED_CLAIMS: &[&str] = &["sub", "name", "role", "iat", "exp", "jti"];

/// 토큰 클레임.
///
/// `sub`는 필수이며 `name`, `role`과 임의의 추가 클레임을 가질 수 있습니다.
/// 만료 시간 등 발급 시점 정보는 [`VerifiedToken`]에 따로 보관됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID
    pub sub: String,
    /// 표시 이름
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 역할 레이블
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// 추가 클레임
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// subject만 가진 클레임 생성.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            sub: subject.into(),
            name: None,
            role: None,
            extra: Map::new(),
        }
    }

    /// 사용자 레코드에서 클레임 생성 (`sub`, `name`, `role`).
    pub fn for_user(user: &User) -> Self {
        Self::new(user.subject())
            .with_name(user.name.clone())
            .with_role(user.role.clone())
    }

    /// 표시 이름 지정.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// 역할 지정.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// 추가 클레임 지정.
    pub fn with_claim(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// 클레임의 역할. 없거나 알 수 없으면 [`Role::Guest`].
    pub fn role(&self) -> Role {
        self.role.as_deref().map(Role::from_label).unwrap_or(Role::Guest)
    }

    /// 특정 역할 이상인지 확인.
    pub fn has_role(&self, required_role: Role) -> bool {
        self.role().satisfies(required_role)
    }

    /// 특정 권한을 가지는지 확인.
    pub fn has_permission(&self, permission: super::Permission) -> bool {
        self.role().has_permission(permission)
    }
}

/// 서명 대상 페이로드 (발급용).
#[derive(Serialize)]
struct OutgoingPayload<'a> {
    #[serde(flatten)]
    claims: &'a Claims,
    iat: i64,
    exp: i64,
    jti: String,
}

/// 서명 검증된 페이로드 (검증용).
#[derive(Deserialize)]
struct IncomingPayload {
    #[serde(flatten)]
    claims: Claims,
    iat: i64,
    exp: i64,
    jti: String,
}

/// 검증을 통과한 토큰.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedToken {
    /// 토큰 클레임
    pub claims: Claims,
    /// 발급 시간
    pub issued_at: DateTime<Utc>,
    /// 만료 시간
    pub expires_at: DateTime<Utc>,
    /// 토큰 고유 식별자
    pub token_id: String,
}

/// 로그인 응답 본문.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    /// Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료까지 남은 시간 (초)
    pub expires_in: i64,
}

/// 토큰 발급/설정 에러.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("서명 시크릿이 설정되지 않았습니다")]
    MissingSecret,
    #[error("지원하지 않는 서명 알고리즘: {0}")]
    UnsupportedAlgorithm(String),
    #[error("예약된 클레임 이름은 추가 클레임으로 사용할 수 없습니다: {0}")]
    ReservedClaim(String),
    #[error("표현할 수 없는 만료 시간: {0}")]
    InvalidLifetime(String),
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// 토큰 검증 실패 사유.
///
/// HTTP 계층은 모든 사유를 동일하게 "인증 실패"로 응답하고,
/// 사유는 감사 로그에만 사용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenRejection {
    #[error("잘못된 토큰 형식")]
    Malformed,
    #[error("토큰 서명이 유효하지 않습니다")]
    Tampered,
    #[error("토큰이 만료되었습니다")]
    Expired,
}

impl TokenRejection {
    /// 로그용 사유 문자열.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenRejection::Malformed => "malformed",
            TokenRejection::Tampered => "tampered",
            TokenRejection::Expired => "expired",
        }
    }

    fn from_jwt_error(err: &jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenRejection::Expired,
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenRejection::Tampered,
            _ => TokenRejection::Malformed,
        }
    }
}

/// 토큰 발급기/검증기.
///
/// 시작 시 한 번 생성되며 이후 읽기 전용으로 공유됩니다.
/// 서명 시크릿은 키 객체로만 보관되고 `Debug` 출력에 포함되지 않습니다.
#[derive(Clone)]
pub struct TokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// 인증 설정으로 생성.
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        let secret = config
            .secret_key
            .as_ref()
            .map(|s| s.expose_secret())
            .filter(|s| !s.is_empty())
            .ok_or(TokenError::MissingSecret)?;

        let algorithm = Algorithm::from_str(&config.algorithm.to_uppercase())
            .map_err(|_| TokenError::UnsupportedAlgorithm(config.algorithm.clone()))?;
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::UnsupportedAlgorithm(config.algorithm.clone()));
        }

        let minutes = config.access_token_expire_minutes;
        let default_ttl = Duration::try_minutes(minutes)
            .ok_or_else(|| TokenError::InvalidLifetime(format!("{}분", minutes)))?;

        let mut validation = Validation::new(algorithm);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.validate_aud = false;

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            default_ttl,
        })
    }

    /// 기본 만료 시간.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// 서명 알고리즘.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// 기본 만료 시간으로 토큰 발급.
    pub fn issue(&self, claims: &Claims) -> Result<String, TokenError> {
        self.issue_with_ttl(claims, self.default_ttl)
    }

    /// 지정한 만료 시간으로 토큰 발급.
    ///
    /// `exp = now + ttl`이 찍히며, 음수 ttl이면 이미 만료된 토큰이 발급됩니다.
    /// 만료 시각이 표현 범위를 넘으면 [`TokenError::InvalidLifetime`].
    pub fn issue_with_ttl(&self, claims: &Claims, ttl: Duration) -> Result<String, TokenError> {
        if let Some(key) = claims
            .extra
            .keys()
            .find(|key| RESERVED_CLAIMS.contains(&key.as_str()))
        {
            return Err(TokenError::ReservedClaim(key.clone()));
        }

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::InvalidLifetime(format!("{}초", ttl.num_seconds())))?;

        let payload = OutgoingPayload {
            claims,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::new(self.algorithm), &payload, &self.encoding_key).map_err(TokenError::from)
    }

    /// 사용자용 토큰 발급 및 로그인 응답 생성.
    pub fn issue_for(&self, user: &User) -> Result<TokenResponse, TokenError> {
        let access_token = self.issue(&Claims::for_user(user))?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.default_ttl.num_seconds(),
        })
    }

    /// 토큰 검증 후 클레임 반환.
    ///
    /// 서명이 맞지 않으면 `Tampered`, 서명은 맞지만 만료되었으면 `Expired`,
    /// 해석할 수 없으면 `Malformed`를 반환합니다. 패닉하지 않습니다.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenRejection> {
        self.verify(token).map(|verified| verified.claims)
    }

    /// 토큰 검증 후 발급 정보까지 반환.
    pub fn verify(&self, token: &str) -> Result<VerifiedToken, TokenRejection> {
        let data = decode::<IncomingPayload>(token, &self.decoding_key, &self.validation)
            .map_err(|e| TokenRejection::from_jwt_error(&e))?;
        let payload = data.claims;

        let issued_at = Utc
            .timestamp_opt(payload.iat, 0)
            .single()
            .ok_or(TokenRejection::Malformed)?;
        let expires_at = Utc
            .timestamp_opt(payload.exp, 0)
            .single()
            .ok_or(TokenRejection::Malformed)?;

        Ok(VerifiedToken {
            claims: payload.claims,
            issued_at,
            expires_at,
            token_id: payload.jti,
        })
    }

    /// 토큰의 subject(사용자 ID). 검증 실패 시 사유와 무관하게 `None`.
    pub fn subject_of(&self, token: &str) -> Option<String> {
        self.validate(token).ok().map(|claims| claims.sub)
    }
}
