//! ETL 전반에서 사용되는 공통 값 타입.

mod symbol;
mod table;

pub use symbol::*;
pub use table::*;
