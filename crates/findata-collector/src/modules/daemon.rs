//! 데몬 모드: 주기적으로 수집 → 저장 실행.

use super::{fetch_and_store, run_with_retry, RetryPolicy};
use crate::DaemonSummary;
use findata_core::{DaemonConfig, StockSymbol};
use findata_data::{PriceSink, PriceSource};
use std::future::Future;
use tokio::time::MissedTickBehavior;

/// 종료 신호가 올 때까지 주기마다 수집을 실행합니다.
///
/// 첫 실행은 즉시 시작합니다. 한 번의 실행이 재시도 후에도 실패하면 에러를
/// 기록하고 다음 주기를 기다립니다. 수집이나 재시도 대기 중에 종료 신호가 오면
/// 진행 중인 실행을 버리고 바로 반환합니다.
pub async fn run_daemon<S, K, F>(
    source: &S,
    sink: &K,
    symbol: &StockSymbol,
    config: &DaemonConfig,
    shutdown: F,
) -> DaemonSummary
where
    S: PriceSource + ?Sized,
    K: PriceSink + ?Sized,
    F: Future<Output = ()>,
{
    let policy = RetryPolicy::from(config);
    let mut summary = DaemonSummary::default();

    tracing::info!(
        "=== 데몬 모드 시작 (주기: {}시간, 재시도: {}회) ===",
        config.interval_hours.max(1),
        config.retries
    );

    let mut interval = tokio::time::interval(config.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("종료 신호 수신, 데몬 종료 중...");
                break;
            }
            _ = interval.tick() => {}
        }

        let run = run_with_retry(policy, |attempt| async move {
            let mut stats = fetch_and_store(source, sink, symbol).await?;
            stats.attempts = attempt;
            Ok(stats)
        });

        // 재시도 대기 중에도 종료 신호에 응답
        let result = tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!("종료 신호 수신, 진행 중인 수집을 중단합니다");
                break;
            }
            result = run => result,
        };

        match result {
            Ok(stats) => {
                stats.log_summary("일별 수집");
                summary.succeeded += 1;
            }
            Err(e) => {
                tracing::error!(
                    symbol = %symbol,
                    error_kind = e.kind(),
                    "일별 수집 실패: {}",
                    e
                );
                summary.failed += 1;
            }
        }

        tracing::info!(
            "=== 실행 완료, 다음 실행: {}시간 후 ===",
            config.interval_hours.max(1)
        );
    }

    summary
}
