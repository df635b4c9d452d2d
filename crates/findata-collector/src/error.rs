//! 에러 타입 정의.

use findata_core::{ConfigError, DomainError};
use findata_data::DataError;
use std::fmt;

/// Collector 에러 타입
#[derive(Debug)]
pub enum CollectorError {
    /// 설정 에러
    Config(ConfigError),
    /// 잘못된 입력 (심볼, 테이블 이름)
    Input(DomainError),
    /// 수집/저장 에러
    Data(DataError),
}

impl CollectorError {
    /// 에러 종류 이름 (로그 필드용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Input(_) => "input",
            Self::Data(e) => e.kind(),
        }
    }
}

impl fmt::Display for CollectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "Configuration error: {}", e),
            Self::Input(e) => write!(f, "Invalid input: {}", e),
            Self::Data(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for CollectorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Data(e) => Some(e),
        }
    }
}

impl From<ConfigError> for CollectorError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<DomainError> for CollectorError {
    fn from(err: DomainError) -> Self {
        Self::Input(err)
    }
}

impl From<DataError> for CollectorError {
    fn from(err: DataError) -> Self {
        Self::Data(err)
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, CollectorError>;
