//! # Findata Core
//!
//! 일별 주가 ETL의 핵심 도메인 모델과 공통 인프라를 제공합니다:
//! - 가격 행(`PriceRow`)과 종가 시계열 포인트(`ClosePoint`)
//! - 검증된 종목 심볼 / 테이블 이름 타입
//! - 환경변수 기반 설정 (API 키, DB 자격증명, 스케줄)
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod types;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
pub use types::*;
