//! 종목 심볼 정의.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 심볼 최대 길이 (`stock_symbol VARCHAR(16)`)
pub const MAX_SYMBOL_LEN: usize = 16;

/// 검증된 주식 종목 심볼.
///
/// 앞뒤 공백을 제거하고 대문자로 정규화합니다.
/// 허용 문자: 영문, 숫자, `.`, `-` (예: `AAPL`, `BRK.B`, `005930.KS`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockSymbol(String);

impl StockSymbol {
    /// 문자열에서 심볼을 생성합니다.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = raw.as_ref().trim();
        let valid = !trimmed.is_empty()
            && trimmed.len() <= MAX_SYMBOL_LEN
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

        if !valid {
            return Err(DomainError::InvalidSymbol(raw.as_ref().to_string()));
        }

        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for StockSymbol {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for StockSymbol {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<StockSymbol> for String {
    fn from(symbol: StockSymbol) -> Self {
        symbol.0
    }
}

impl AsRef<str> for StockSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
