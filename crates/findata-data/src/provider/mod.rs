//! 시세 데이터 Provider 모듈.
//!
//! ## Alpha Vantage
//! - `AlphaVantageClient`: `TIME_SERIES_DAILY` CSV 엔드포인트 클라이언트 (API 키 필요)

pub mod alpha_vantage;

use crate::Result;
use async_trait::async_trait;
use findata_core::{PriceRow, StockSymbol};

pub use alpha_vantage::AlphaVantageClient;

/// 일별 시세 데이터 소스.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Provider 이름.
    fn name(&self) -> &str;

    /// 한 종목의 일별 시세 조회.
    ///
    /// 반환되는 모든 행의 `stock_symbol`은 `symbol`과 같아야 합니다.
    async fn fetch_daily(&self, symbol: &StockSymbol) -> Result<Vec<PriceRow>>;
}
