//! 수집 작업 모듈.

pub mod daemon;
pub mod fetch_store;
pub mod retry;

pub use daemon::run_daemon;
pub use fetch_store::fetch_and_store;
pub use retry::{run_with_retry, RetryPolicy};
