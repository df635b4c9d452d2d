//! SQL 테이블 이름.

use crate::error::DomainError;
use std::fmt;
use std::str::FromStr;

/// PostgreSQL 식별자 최대 길이
const MAX_IDENT_LEN: usize = 63;

/// 검증된 테이블 이름.
///
/// 쿼리 문자열에 직접 삽입되므로 `[A-Za-z_][A-Za-z0-9_]*` 형식의 식별자만 허용합니다.
/// `schema.table` 형태의 스키마 한정 이름도 허용됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    /// 기본 테이블 이름
    pub const DEFAULT: &'static str = "stock_data";

    /// 문자열에서 테이블 이름을 생성합니다.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let raw = raw.as_ref().trim();
        let parts: Vec<&str> = raw.split('.').collect();

        if parts.len() > 2 || !parts.iter().all(|p| is_identifier(p)) {
            return Err(DomainError::InvalidTableName(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 스키마 한정자를 제외한 테이블 이름 (인덱스 이름 생성용).
    pub fn unqualified(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }
}

impl Default for TableName {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl FromStr for TableName {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_identifier(part: &str) -> bool {
    let mut chars = part.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    part.len() <= MAX_IDENT_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
