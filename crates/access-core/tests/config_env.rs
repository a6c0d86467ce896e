//! 환경 변수 기반 설정 로드 통합 테스트
//!
//! 환경 변수는 프로세스 전역이므로 하나의 테스트에서 순서대로 검증합니다.

use access_core::{AccessError, AppConfig, Environment};
use secrecy::ExposeSecret;

#[test]
fn test_load_from_flat_environment_variables() {
    // 시크릿 없음 → 시작 실패
    std::env::remove_var("SECRET_KEY");
    std::env::remove_var("ACCESS__AUTH__SECRET_KEY");
    let result = AppConfig::load(None::<&str>);
    assert!(matches!(result, Err(AccessError::Config(_))));

    // 접두사 없는 변수 적용
    std::env::set_var("SECRET_KEY", "integration-test-secret");
    std::env::set_var("ALGORITHM", "HS384");
    std::env::set_var("ACCESS_TOKEN_EXPIRE_MINUTES", "45");
    std::env::set_var("API_PORT", "9100");

    let config = AppConfig::load(None::<&str>).unwrap();
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.auth.algorithm, "HS384");
    assert_eq!(config.auth.access_token_expire_minutes, 45);
    assert_eq!(config.server.port, 9100);
    assert_eq!(
        config.auth.secret_key.as_ref().unwrap().expose_secret(),
        "integration-test-secret"
    );

    // 운영 환경에서는 짧은 시크릿 거부
    std::env::set_var("APP_ENV", "production");
    let result = AppConfig::load(None::<&str>);
    assert!(matches!(result, Err(AccessError::Config(_))));

    // 숫자로만 된 시크릿도 문자열 그대로 유지
    std::env::remove_var("SECRET_KEY");
    let numeric = "12345678901234567890123456789012345678";
    std::env::set_var("ACCESS__AUTH__SECRET_KEY", numeric);
    let config = AppConfig::load(None::<&str>).unwrap();
    assert!(config.environment.is_production());
    assert_eq!(
        config.auth.secret_key.as_ref().unwrap().expose_secret(),
        numeric
    );
    std::env::remove_var("ACCESS__AUTH__SECRET_KEY");

    for var in [
        "SECRET_KEY",
        "ALGORITHM",
        "ACCESS_TOKEN_EXPIRE_MINUTES",
        "API_PORT",
        "APP_ENV",
    ] {
        std::env::remove_var(var);
    }
}
