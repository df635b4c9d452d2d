//! 수집 → 저장 파이프라인.

use crate::{CollectionStats, Result};
use findata_core::{PriceRow, StockSymbol};
use findata_data::{PriceSink, PriceSource};
use std::time::Instant;

/// 한 종목의 일별 시세를 수집해 저장합니다.
///
/// 수집이 실패하면 저장소에 접근하지 않고 에러를 반환합니다.
pub async fn fetch_and_store<S, K>(
    source: &S,
    sink: &K,
    symbol: &StockSymbol,
) -> Result<CollectionStats>
where
    S: PriceSource + ?Sized,
    K: PriceSink + ?Sized,
{
    let start = Instant::now();
    let mut stats = CollectionStats::new(symbol.as_str());

    tracing::info!(
        symbol = %symbol,
        source = source.name(),
        sink = sink.name(),
        "수집 시작"
    );

    let rows = source.fetch_daily(symbol).await?;
    stats.rows_fetched = rows.len();

    // 응답 순서와 무관하게 가장 최근 거래일 기준
    stats.latest_close = rows
        .iter()
        .max_by_key(|row| row.date)
        .map(PriceRow::close_point);

    match &stats.latest_close {
        Some(latest) => tracing::debug!(
            symbol = %symbol,
            date = %latest.date,
            close = %latest.close_price,
            "최근 종가"
        ),
        None => tracing::warn!(symbol = %symbol, "수집된 데이터가 없습니다"),
    }

    stats.rows_inserted = sink.store(&rows).await?;
    stats.elapsed = start.elapsed();

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CollectorError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use findata_core::TableName;
    use findata_data::DataError;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct FixedSource {
        rows: usize,
    }

    #[async_trait]
    impl PriceSource for FixedSource {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn fetch_daily(&self, symbol: &StockSymbol) -> findata_data::Result<Vec<PriceRow>> {
            let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            Ok((0..self.rows)
                .map(|i| PriceRow {
                    date: start + chrono::Days::new(i as u64),
                    open_price: dec!(185.00),
                    high_price: dec!(187.50),
                    low_price: dec!(184.10),
                    close_price: dec!(186.20),
                    volume: 50_000_000,
                    stock_symbol: symbol.clone(),
                })
                .collect())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PriceSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        async fn fetch_daily(&self, _symbol: &StockSymbol) -> findata_data::Result<Vec<PriceRow>> {
            Err(DataError::Network("HTTP 503 Service Unavailable".to_string()))
        }
    }

    /// 중복 제거 없이 행을 누적하는 메모리 저장소
    #[derive(Default)]
    struct MemorySink {
        table: Mutex<Vec<PriceRow>>,
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl PriceSink for MemorySink {
        fn name(&self) -> &str {
            "memory"
        }

        async fn store(&self, rows: &[PriceRow]) -> findata_data::Result<u64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(DataError::Store(format!(
                    "relation \"{}\" does not exist",
                    TableName::default()
                )));
            }
            self.table.lock().unwrap().extend_from_slice(rows);
            Ok(rows.len() as u64)
        }
    }

    fn aapl() -> StockSymbol {
        StockSymbol::new("AAPL").unwrap()
    }

    #[tokio::test]
    async fn test_fetch_and_store_success() {
        let source = FixedSource { rows: 100 };
        let sink = MemorySink::default();

        let stats = fetch_and_store(&source, &sink, &aapl()).await.unwrap();

        assert_eq!(stats.symbol, "AAPL");
        assert_eq!(stats.rows_fetched, 100);
        assert_eq!(stats.rows_inserted, 100);
        let latest = stats.latest_close.unwrap();
        assert_eq!(latest.date, NaiveDate::from_ymd_opt(2024, 4, 9).unwrap());
        assert_eq!(latest.close_price, dec!(186.20));
        assert_eq!(sink.table.lock().unwrap().len(), 100);
        assert!(sink
            .table
            .lock()
            .unwrap()
            .iter()
            .all(|row| row.stock_symbol.as_str() == "AAPL"));
    }

    #[tokio::test]
    async fn test_fetch_error_skips_store() {
        let sink = MemorySink::default();

        let err = fetch_and_store(&FailingSource, &sink, &aapl())
            .await
            .unwrap_err();

        assert!(matches!(err, CollectorError::Data(DataError::Network(_))));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
        assert!(sink.table.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_store_error_propagates() {
        let source = FixedSource { rows: 3 };
        let sink = MemorySink {
            fail: true,
            ..Default::default()
        };

        let err = fetch_and_store(&source, &sink, &aapl()).await.unwrap_err();

        assert!(matches!(err, CollectorError::Data(DataError::Store(_))));
        assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_empty_fetch_stores_nothing() {
        let source = FixedSource { rows: 0 };
        let sink = MemorySink::default();

        let stats = fetch_and_store(&source, &sink, &aapl()).await.unwrap();

        assert_eq!(stats.rows_fetched, 0);
        assert_eq!(stats.rows_inserted, 0);
        assert!(stats.latest_close.is_none());
    }

    #[tokio::test]
    async fn test_rerun_accumulates_duplicates() {
        let source = FixedSource { rows: 5 };
        let sink = MemorySink::default();

        fetch_and_store(&source, &sink, &aapl()).await.unwrap();
        fetch_and_store(&source, &sink, &aapl()).await.unwrap();

        let table = sink.table.lock().unwrap();
        assert_eq!(table.len(), 10);
        assert_eq!(table[0], table[5]);
    }

    #[tokio::test]
    async fn test_trait_objects() {
        let source: Box<dyn PriceSource> = Box::new(FixedSource { rows: 2 });
        let sink: Box<dyn PriceSink> = Box::new(MemorySink::default());

        let stats = fetch_and_store(source.as_ref(), sink.as_ref(), &aapl())
            .await
            .unwrap();
        assert_eq!(stats.rows_inserted, 2);
    }
}
