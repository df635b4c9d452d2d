//! 일별 가격 데이터 구조체.

use crate::types::StockSymbol;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 한 종목의 하루치 OHLCV 레코드.
///
/// `stock_symbol`은 항상 요청 파라미터에서 설정되며, 업스트림 응답 값을 사용하지 않습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRow {
    /// 거래일
    pub date: NaiveDate,
    /// 시가
    pub open_price: Decimal,
    /// 고가
    pub high_price: Decimal,
    /// 저가
    pub low_price: Decimal,
    /// 종가
    pub close_price: Decimal,
    /// 거래량
    pub volume: i64,
    /// 종목 심볼
    pub stock_symbol: StockSymbol,
}

impl PriceRow {
    /// 종가 시계열 포인트로 변환합니다.
    pub fn close_point(&self) -> ClosePoint {
        ClosePoint {
            date: self.date,
            close_price: self.close_price,
        }
    }
}

/// 종가 차트용 (날짜, 종가) 포인트.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosePoint {
    pub date: NaiveDate,
    pub close_price: Decimal,
}

/// 시계열이 날짜 기준 비내림차순인지 확인합니다.
pub fn is_date_ordered(points: &[ClosePoint]) -> bool {
    points.windows(2).all(|w| w[0].date <= w[1].date)
}
