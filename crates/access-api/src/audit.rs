//! 인증 작업 감사 로깅.
//!
//! 핸들러 경계에서 작업을 감싸 span, 소요 시간, 성공/실패를 기록합니다.
//! 인증 코어 함수 자체는 로그를 남기지 않습니다.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use tracing::{info, warn, Instrument};

/// 비동기 작업을 감사 span 안에서 실행.
///
/// 작업 이름과 소요 시간(ms)을 기록하며, 실패 시 에러 메시지를 `warn`으로 남깁니다.
/// 인자나 반환값 자체는 기록하지 않으므로 비밀번호나 토큰이 로그에 남지 않습니다.
///
/// ```rust,ignore
/// let response = audited("login", async { issue_token(&state, &request).await }).await?;
/// ```
pub async fn audited<F, T, E>(operation: &'static str, fut: F) -> Result<T, E>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    let span = tracing::info_span!("audit", operation);

    async move {
        let start = Instant::now();
        let result = fut.await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => info!(elapsed_ms, "Operation succeeded"),
            Err(e) => warn!(elapsed_ms, error = %e, "Operation failed"),
        }

        result
    }
    .instrument(span)
    .await
}
