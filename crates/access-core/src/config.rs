//! 설정 관리.
//!
//! 이 모듈은 애플리케이션 설정을 정의하고 관리합니다.
//! 설정은 프로세스 시작 시 한 번만 로드되며 이후 변경되지 않습니다.

use std::path::Path;

use config::builder::DefaultState;
use config::ConfigBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

use crate::error::{AccessError, AccessResult};

/// 기본 서명 알고리즘.
pub const DEFAULT_ALGORITHM: &str = "HS256";

/// 기본 Access Token 만료 시간 (분).
pub const DEFAULT_TOKEN_EXPIRE_MINUTES: i64 = 30;

/// Access Token 만료 시간 상한 (분, 1년).
pub const MAX_TOKEN_EXPIRE_MINUTES: i64 = 365 * 24 * 60;

/// 운영 환경에서 요구하는 최소 시크릿 길이 (바이트).
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

/// 허용되는 HMAC 서명 알고리즘.
const SUPPORTED_ALGORITHMS: &[&str] = &["HS256", "HS384", "HS512"];

/// 예제/개발용으로 알려진 시크릿 값. 운영 환경에서는 거부됩니다.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your-secret-key-here",
    "dev-secret-key-change-in-production",
    "development-secret-key-change-in-production",
    "changeme",
    "secret",
];

/// 접두사 없는 환경 변수 → 설정 키 매핑.
const FLAT_ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SECRET_KEY", "auth.secret_key"),
    ("ALGORITHM", "auth.algorithm"),
    ("ACCESS_TOKEN_EXPIRE_MINUTES", "auth.access_token_expire_minutes"),
    ("APP_ENV", "environment"),
    ("API_HOST", "server.host"),
    ("API_PORT", "server.port"),
    ("LOG_FORMAT", "logging.format"),
];

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 실행 환경
    pub environment: Environment,
    /// 서버 설정
    pub server: ServerConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 초기 관리자 계정 설정
    #[serde(default)]
    pub bootstrap: BootstrapConfig,
}

/// 실행 환경.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// 개발 환경 - 약한 시크릿은 경고만 출력
    #[default]
    #[serde(alias = "dev")]
    Development,
    /// 운영 환경 - 약한 시크릿이면 시작 실패
    #[serde(alias = "prod")]
    Production,
}

impl Environment {
    /// 운영 환경 여부.
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    /// 환경 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 인증 설정.
///
/// 서명 시크릿은 [`SecretString`]으로 보관되어 `Debug` 출력에 노출되지 않습니다.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// 토큰 서명 시크릿
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub secret_key: Option<SecretString>,
    /// 서명 알고리즘 식별자 (HS256, HS384, HS512)
    pub algorithm: String,
    /// Access Token 기본 만료 시간 (분)
    pub access_token_expire_minutes: i64,
}

impl AuthConfig {
    /// 주어진 시크릿과 기본값으로 설정 생성.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret_key: Some(SecretString::from(secret.into())),
            algorithm: DEFAULT_ALGORITHM.to_string(),
            access_token_expire_minutes: DEFAULT_TOKEN_EXPIRE_MINUTES,
        }
    }

    /// 만료 시간을 설정합니다.
    pub fn with_expire_minutes(mut self, minutes: i64) -> Self {
        self.access_token_expire_minutes = minutes;
        self
    }

    /// 서명 알고리즘을 설정합니다.
    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// 인증 설정 검증.
    ///
    /// 시크릿이 없거나 비어 있으면 환경과 무관하게 실패합니다.
    /// 운영 환경에서는 알려진 예제 시크릿이나 짧은 시크릿도 거부합니다.
    pub fn validate(&self, environment: Environment) -> AccessResult<()> {
        let secret = self
            .secret_key
            .as_ref()
            .map(|s| s.expose_secret())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                AccessError::Config("SECRET_KEY가 설정되지 않았습니다".to_string())
            })?;

        let is_placeholder = PLACEHOLDER_SECRETS.contains(&secret);
        if environment.is_production() {
            if is_placeholder {
                return Err(AccessError::Config(
                    "운영 환경에서 기본 SECRET_KEY를 사용할 수 없습니다".to_string(),
                ));
            }
            if secret.len() < MIN_PRODUCTION_SECRET_LEN {
                return Err(AccessError::Config(format!(
                    "운영 환경의 SECRET_KEY는 최소 {}바이트 이상이어야 합니다",
                    MIN_PRODUCTION_SECRET_LEN
                )));
            }
        } else if is_placeholder {
            tracing::warn!("SECRET_KEY is a well-known placeholder (INSECURE for development only)");
        }

        let algorithm = self.algorithm.to_uppercase();
        if !SUPPORTED_ALGORITHMS.contains(&algorithm.as_str()) {
            return Err(AccessError::Config(format!(
                "지원하지 않는 서명 알고리즘: {}",
                self.algorithm
            )));
        }

        if !(1..=MAX_TOKEN_EXPIRE_MINUTES).contains(&self.access_token_expire_minutes) {
            return Err(AccessError::Config(format!(
                "ACCESS_TOKEN_EXPIRE_MINUTES는 1-{} 범위여야 합니다",
                MAX_TOKEN_EXPIRE_MINUTES
            )));
        }

        Ok(())
    }
}

/// 초기 관리자 계정 설정.
///
/// 둘 다 지정된 경우에만 시작 시 관리자 계정을 생성합니다.
#[derive(Debug, Default, Deserialize)]
pub struct BootstrapConfig {
    /// 관리자 사용자 이름
    #[serde(default)]
    pub admin_username: Option<String>,
    /// 관리자 비밀번호
    #[serde(default, deserialize_with = "deserialize_secret")]
    pub admin_password: Option<SecretString>,
}

impl BootstrapConfig {
    /// 관리자 자격증명 쌍 반환.
    pub fn admin(&self) -> Option<(&str, &SecretString)> {
        match (&self.admin_username, &self.admin_password) {
            (Some(username), Some(password)) if !username.is_empty() => {
                Some((username.as_str(), password))
            }
            _ => None,
        }
    }
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(SecretString::from))
}

/// `ACCESS__SECTION__KEY` 환경 변수 소스.
///
/// 값은 문자열 그대로 두고 숫자 필드는 역직렬화 시 변환됩니다.
/// 숫자로만 된 시크릿이 float로 바뀌지 않도록 `try_parsing`을 켜지 않습니다.
fn env_source() -> config::Environment {
    config::Environment::with_prefix("ACCESS").separator("__")
}

impl AppConfig {
    /// 기본값이 채워진 설정 빌더.
    pub fn defaults() -> AccessResult<ConfigBuilder<DefaultState>> {
        let builder = config::Config::builder()
            .set_default("environment", "development")?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("auth.algorithm", DEFAULT_ALGORITHM)?
            .set_default("auth.access_token_expire_minutes", DEFAULT_TOKEN_EXPIRE_MINUTES)?;
        Ok(builder)
    }

    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 우선순위: 기본값 < 설정 파일 < `ACCESS__*` 환경 변수 < 접두사 없는 환경 변수.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> AccessResult<Self> {
        let mut builder = Self::defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path.as_ref()).required(false));
        }

        builder = builder.add_source(env_source());

        for (var, key) in FLAT_ENV_OVERRIDES {
            if let Ok(value) = std::env::var(var) {
                builder = builder.set_override(*key, value)?;
            }
        }

        Self::from_builder(builder)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> AccessResult<Self> {
        Self::load(Some("config/default.toml"))
    }

    /// 빌더에서 설정을 만들고 검증합니다.
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> AccessResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.auth.validate(config.environment)?;
        Ok(config)
    }
}
