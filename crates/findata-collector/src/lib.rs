//! Standalone fetch-and-store collector.
//!
//! 이 crate는 한 종목의 일별 시세를 수집해 저장하는 바이너리를 제공합니다:
//! - 1회 실행 (수집 → 저장)
//! - 데몬 모드 (일 단위 주기 실행, 실패 시 1회 재시도)
//! - 테이블 초기화

pub mod error;
pub mod modules;
pub mod stats;

pub use error::{CollectorError, Result};
pub use stats::{CollectionStats, DaemonSummary};
