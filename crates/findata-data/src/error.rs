//! 데이터 모듈 오류 타입.

use thiserror::Error;

/// 데이터 수집/저장 오류.
#[derive(Debug, Error)]
pub enum DataError {
    /// 요청 실패, 연결 실패, 2xx 이외의 응답
    #[error("Network error: {0}")]
    Network(String),

    /// 응답 페이로드 파싱 실패
    #[error("Parse error: {0}")]
    Parse(String),

    /// DB 연결, 삽입, 조회 실패
    #[error("Store error: {0}")]
    Store(String),
}

impl DataError {
    /// 오류 종류 이름 (로그 필드용)
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Store(_) => "store",
        }
    }
}

impl From<sqlx::Error> for DataError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DataError::Store(match db_err.code() {
                Some(code) => format!("{} (SQLSTATE {})", db_err.message(), code),
                None => db_err.message().to_string(),
            }),
            _ => DataError::Store(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for DataError {
    fn from(err: reqwest::Error) -> Self {
        // URL에 API 키가 포함되므로 제거
        DataError::Network(err.without_url().to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(err: csv::Error) -> Self {
        DataError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DataError>;
