//! 로깅 초기화.
//!
//! `LoggingConfig`(레벨, 형식)와 실행 환경으로 구독자를 한 번 구성합니다.
//! `RUST_LOG`가 설정되어 있으면 설정 파일의 레벨보다 우선합니다.
//!
//! 인증 작업 로그에는 사용자 식별자와 역할만 남기며, 비밀번호나 토큰 원문은
//! 어떤 필드에도 넣지 않습니다.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::{Environment, LoggingConfig};
use crate::error::{AccessError, AccessResult};

/// 요청 단위 로그에 묻히지 않도록 낮추는 의존성 로그.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "tower=warn", "h2=warn"];

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// 개발용 여러 줄 출력
    #[default]
    Pretty,
    /// 로그 수집기용 JSON
    Json,
    /// 한 줄 출력
    Compact,
}

impl LogFormat {
    /// 설정 문자열 해석 (대소문자 무시). 알 수 없는 값이면 `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Some(Self::Pretty),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// 구독자 구성 값.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// 기본 필터 (예: "info", "access_api=debug")
    pub level: String,
    pub format: LogFormat,
    /// span 종료 시 소요 시간 출력
    pub span_timings: bool,
    /// 파일명과 줄 번호 출력
    pub source_location: bool,
}

impl LogConfig {
    /// 설정과 실행 환경에서 구성.
    ///
    /// 개발 환경에서는 span 소요 시간과 소스 위치를 함께 출력합니다.
    /// 알 수 없는 형식은 pretty로 대체합니다.
    pub fn from_settings(settings: &LoggingConfig, environment: Environment) -> Self {
        let development = !environment.is_production();

        Self {
            level: settings.level.clone(),
            format: LogFormat::parse(&settings.format).unwrap_or_default(),
            span_timings: development,
            source_location: development,
        }
    }

    fn env_filter(&self) -> AccessResult<EnvFilter> {
        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.level)
                .map_err(|e| AccessError::Logging(format!("{}: {}", self.level, e)))?,
        };

        QUIET_DEPENDENCIES.iter().try_fold(filter, |filter, directive| {
            directive
                .parse()
                .map(|d| filter.add_directive(d))
                .map_err(|e| AccessError::Logging(e.to_string()))
        })
    }

    fn fmt_layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let span_events = if self.span_timings {
            FmtSpan::CLOSE
        } else {
            FmtSpan::NONE
        };

        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_span_events(span_events);

        match self.format {
            LogFormat::Pretty => layer.pretty().boxed(),
            LogFormat::Json => layer.json().boxed(),
            LogFormat::Compact => layer.compact().boxed(),
        }
    }
}

/// 전역 로깅 초기화. 프로세스당 한 번만 호출합니다.
///
/// ```no_run
/// use access_core::config::{Environment, LoggingConfig};
/// use access_core::logging::{init_logging, LogConfig};
///
/// let config = LogConfig::from_settings(&LoggingConfig::default(), Environment::Production);
/// init_logging(&config).unwrap();
/// ```
pub fn init_logging(config: &LogConfig) -> AccessResult<()> {
    let filter = config.env_filter()?;

    tracing_subscriber::registry()
        .with(config.fmt_layer())
        .with(filter)
        .try_init()
        .map_err(|e| AccessError::Logging(e.to_string()))?;

    tracing::info!(format = ?config.format, level = %config.level, "Logging initialized");

    Ok(())
}

/// 인증 작업 span 생성.
///
/// 사용자 식별자(`principal`)와 역할만 기록합니다.
#[macro_export]
macro_rules! auth_span {
    ($name:expr) => {
        tracing::info_span!($name)
    };
    ($name:expr, $principal:expr) => {
        tracing::info_span!($name, principal = %$principal)
    };
    ($name:expr, $principal:expr, $role:expr) => {
        tracing::info_span!($name, principal = %$principal, role = %$role)
    };
}
