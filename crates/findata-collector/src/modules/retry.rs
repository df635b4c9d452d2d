//! 고정 대기 재시도.

use crate::Result;
use findata_core::DaemonConfig;
use std::future::Future;
use std::time::Duration;

/// 재시도 정책
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// 첫 시도 이후 추가 시도 횟수
    pub retries: u32,
    /// 재시도 전 대기 시간
    pub delay: Duration,
}

impl RetryPolicy {
    /// 재시도 없음
    pub const NONE: Self = Self {
        retries: 0,
        delay: Duration::ZERO,
    };

    /// 최대 시도 횟수 (첫 시도 포함)
    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

impl From<&DaemonConfig> for RetryPolicy {
    fn from(config: &DaemonConfig) -> Self {
        Self {
            retries: config.retries,
            delay: config.retry_delay(),
        }
    }
}

/// 작업을 실행하고 실패하면 정책에 따라 재시도합니다.
///
/// 작업에는 1부터 시작하는 시도 번호가 전달됩니다. 모든 시도가 실패하면
/// 마지막 에러를 반환합니다.
pub async fn run_with_retry<F, Fut, T>(policy: RetryPolicy, mut task: F) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = policy.max_attempts();
    let mut attempt = 1;

    loop {
        match task(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts => {
                tracing::warn!(
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_secs = policy.delay.as_secs(),
                    error = %e,
                    "작업 실패, 재시도 대기"
                );
                tokio::time::sleep(policy.delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
