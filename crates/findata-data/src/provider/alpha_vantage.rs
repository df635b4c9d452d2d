//! Alpha Vantage 일별 시세 클라이언트.
//!
//! `TIME_SERIES_DAILY` 엔드포인트를 CSV 형식으로 한 번 호출하고,
//! 응답을 `PriceRow` 목록으로 변환합니다. 페이지네이션/재시도/요청 제한 처리는 없습니다.
//!
//! # 응답 형식
//!
//! ```text
//! timestamp,open,high,low,close,volume
//! 2024-10-01,229.5200,229.6500,223.7400,226.2100,63285048
//! ```
//!
//! 헤더 이름은 사용하지 않고 위치 기준으로
//! `date, open_price, high_price, low_price, close_price, volume`에 대응시킵니다.
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! let client = AlphaVantageClient::new(api_key, DEFAULT_ALPHA_VANTAGE_URL, Duration::from_secs(30))?;
//! let rows = client.fetch_daily(&StockSymbol::new("AAPL")?).await?;
//! ```

use crate::error::{DataError, Result};
use crate::provider::PriceSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use findata_core::{PriceRow, StockSymbol};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// 응답 CSV의 컬럼 수
const EXPECTED_COLUMNS: usize = 6;

/// 에러 메시지에 포함할 응답 본문 최대 길이
const EXCERPT_LEN: usize = 160;

/// Alpha Vantage API 클라이언트.
#[derive(Clone)]
pub struct AlphaVantageClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
}

/// CSV 레코드 (위치 기준 역직렬화).
#[derive(Debug, Deserialize)]
struct DailyBarRecord {
    date: NaiveDate,
    #[serde(with = "rust_decimal::serde::str")]
    open: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    high: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    low: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    close: Decimal,
    volume: i64,
}

impl DailyBarRecord {
    fn into_row(self, symbol: &StockSymbol) -> PriceRow {
        PriceRow {
            date: self.date,
            open_price: self.open,
            high_price: self.high,
            low_price: self.low,
            close_price: self.close,
            volume: self.volume,
            stock_symbol: symbol.clone(),
        }
    }
}

impl AlphaVantageClient {
    /// 새로운 클라이언트 생성.
    ///
    /// # Arguments
    /// * `api_key` - Alpha Vantage API 키
    /// * `base_url` - 엔드포인트 (예: `https://www.alphavantage.co/query`)
    /// * `timeout` - 요청 타임아웃
    pub fn new(
        api_key: SecretString,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::Network(format!("HTTP 클라이언트 생성 실패: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 일별 시세 CSV 원문 조회.
    #[instrument(skip(self, symbol), fields(symbol = %symbol))]
    pub async fn fetch_daily_csv(&self, symbol: &StockSymbol) -> Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.expose_secret()),
                ("datatype", "csv"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::Network(format!(
                "Alpha Vantage 응답 오류 {}: {}",
                status,
                excerpt(&body)
            )));
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Alpha Vantage 응답 수신");

        Ok(body)
    }
}

#[async_trait]
impl PriceSource for AlphaVantageClient {
    fn name(&self) -> &str {
        "AlphaVantage"
    }

    async fn fetch_daily(&self, symbol: &StockSymbol) -> Result<Vec<PriceRow>> {
        let body = self.fetch_daily_csv(symbol).await?;
        parse_daily_csv(&body, symbol)
    }
}

/// `TIME_SERIES_DAILY` CSV 응답을 파싱합니다.
///
/// 행 순서는 응답 순서를 그대로 유지하며(최신 날짜가 먼저), 모든 행에 `symbol`을 설정합니다.
/// Alpha Vantage는 잘못된 요청이나 호출 한도 초과를 HTTP 200 + JSON 본문으로 응답하므로
/// CSV가 아닌 본문은 `Parse` 오류가 됩니다.
pub fn parse_daily_csv(body: &str, symbol: &StockSymbol) -> Result<Vec<PriceRow>> {
    if body.trim_start().starts_with('{') {
        return Err(DataError::Parse(format!(
            "CSV 대신 JSON 응답을 받았습니다: {}",
            excerpt(body)
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let columns = reader.headers()?.len();
    if columns != EXPECTED_COLUMNS {
        return Err(DataError::Parse(format!(
            "컬럼 수가 {}개여야 하지만 {}개입니다: {}",
            EXPECTED_COLUMNS,
            columns,
            excerpt(body)
        )));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let bar: DailyBarRecord = record
            .deserialize(None)
            .map_err(|e| DataError::Parse(format!("{}번째 줄: {}", line, e)))?;
        rows.push(bar.into_row(symbol));
    }

    Ok(rows)
}

/// 로그/에러 메시지용 본문 요약 (한 줄, 최대 `EXCERPT_LEN`자)
fn excerpt(body: &str) -> String {
    let flat: String = body.split_whitespace().collect::<Vec<_>>().join(" ");
    match flat.char_indices().nth(EXCERPT_LEN) {
        Some((idx, _)) => format!("{}...", &flat[..idx]),
        None => flat,
    }
}

// =============================================================================
// 테스트
// =============================================================================
