//! 저장소 구현.
//!
//! - `database`: 작업 단위 PostgreSQL 연결 팩토리
//! - `stock_data`: 일별 시세 테이블 저장/조회

pub mod database;
pub mod stock_data;

use crate::Result;
use async_trait::async_trait;
use findata_core::PriceRow;

/// 시세 행 저장 대상.
#[async_trait]
pub trait PriceSink: Send + Sync {
    /// 저장소 이름.
    fn name(&self) -> &str;

    /// 행들을 저장하고 저장된 행 수를 반환.
    async fn store(&self, rows: &[PriceRow]) -> Result<u64>;
}
