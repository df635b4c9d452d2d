//! 저장된 일별 종가를 터미널 선 그래프로 표시합니다.
//!
//! - `chart`: 종가 시계열 위젯 (ratatui `Chart`)
//! - `terminal`: 터미널 설정/복원과 이벤트 루프

pub mod chart;
pub mod terminal;

pub use chart::PriceChart;
pub use terminal::run_viewer;
