//! 저장된 종가 시계열을 터미널 차트로 표시하는 CLI.

use anyhow::Context;
use clap::Parser;
use findata_core::{init_logging, EtlConfig, LogConfig, StockSymbol};
use findata_data::{ConnectionFactory, StockDataRepository};
use findata_viz::{run_viewer, PriceChart};

#[derive(Parser)]
#[command(name = "findata-viz")]
#[command(about = "Plot stored closing prices in the terminal", long_about = None)]
#[command(version)]
struct Cli {
    /// 표시할 종목 (기본값: STOCK_SYMBOL)
    #[arg(long)]
    symbol: Option<String>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(LogConfig::for_crates(
        &["findata_viz", "findata_data", "findata_core"],
        &cli.log_level,
    ))
    .map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {}", e))?;

    let config = EtlConfig::from_env().context("설정 로드 실패")?;
    let symbol = match cli.symbol {
        Some(raw) => StockSymbol::new(raw)?,
        None => config.symbol.clone(),
    };

    let repository =
        StockDataRepository::new(ConnectionFactory::new(&config.database), config.table.clone());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let points = runtime
        .block_on(repository.close_series(&symbol))
        .with_context(|| format!("{} 종가 조회 실패", symbol))?;

    tracing::info!(symbol = %symbol, points = points.len(), "종가 조회 완료");
    if points.is_empty() {
        tracing::warn!(symbol = %symbol, "저장된 데이터가 없습니다");
    }

    run_viewer(|| PriceChart::new(&symbol, &points))
}
