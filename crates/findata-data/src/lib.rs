//! 가격 데이터 수집 및 저장.
//!
//! 이 crate는 다음을 제공합니다:
//! - Alpha Vantage 일별 시세 클라이언트 (CSV)
//! - PostgreSQL `stock_data` 테이블 저장소 (일괄 삽입, 종가 조회)
//! - 호출 단위로 연결을 열고 닫는 연결 팩토리

pub mod error;
pub mod provider;
pub mod storage;

pub use error::{DataError, Result};

pub use provider::alpha_vantage::{parse_daily_csv, AlphaVantageClient};
pub use provider::PriceSource;

pub use storage::database::ConnectionFactory;
pub use storage::stock_data::StockDataRepository;
pub use storage::PriceSink;
