//! 수집 통계 구조체.

use findata_core::ClosePoint;
use serde::Serialize;
use std::time::Duration;

/// 1회 수집 작업 통계
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionStats {
    /// 종목 심볼
    pub symbol: String,
    /// 수집된 행 수
    pub rows_fetched: usize,
    /// 저장된 행 수
    pub rows_inserted: u64,
    /// 수집된 데이터 중 가장 최근 거래일의 종가
    pub latest_close: Option<ClosePoint>,
    /// 시도 횟수 (재시도 포함)
    pub attempts: u32,
    /// 소요 시간
    #[serde(skip)]
    pub elapsed: Duration,
}

impl CollectionStats {
    /// 새 통계 객체 생성
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            attempts: 1,
            ..Default::default()
        }
    }

    /// 통계 요약 로그 출력
    pub fn log_summary(&self, operation: &str) {
        tracing::info!(
            operation = operation,
            symbol = %self.symbol,
            rows_fetched = self.rows_fetched,
            rows_inserted = self.rows_inserted,
            attempts = self.attempts,
            elapsed = format!("{:.1}s", self.elapsed.as_secs_f64()),
            "{} 데이터 저장 완료",
            self.symbol
        );
    }
}

/// 데몬 실행 누적 결과
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DaemonSummary {
    /// 성공한 실행 수
    pub succeeded: u32,
    /// 재시도 후에도 실패한 실행 수
    pub failed: u32,
}

impl DaemonSummary {
    /// 총 실행 수
    pub fn runs(&self) -> u32 {
        self.succeeded + self.failed
    }
}
