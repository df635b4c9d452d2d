//! 코어 에러 타입.

use thiserror::Error;

/// 설정 로드 에러.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 필수 환경변수 누락
    #[error("필수 환경변수 누락: {0}")]
    Missing(&'static str),

    /// 환경변수 값이 잘못됨
    #[error("잘못된 설정 값 {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// 도메인 값 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 잘못된 종목 심볼
    #[error("잘못된 종목 심볼 '{0}'")]
    InvalidSymbol(String),

    /// 잘못된 테이블 이름
    #[error("잘못된 테이블 이름 '{0}'")]
    InvalidTableName(String),
}

/// 설정 작업을 위한 Result 타입.
pub type ConfigResult<T> = Result<T, ConfigError>;
