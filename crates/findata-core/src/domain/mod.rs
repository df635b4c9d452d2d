//! ETL 도메인 모델.

mod price;

pub use price::*;
