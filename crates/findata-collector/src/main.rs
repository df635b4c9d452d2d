//! Standalone fetch-and-store collector CLI.

use clap::{Parser, Subcommand};
use findata_collector::{modules, CollectorError};
use findata_core::{init_logging, EtlConfig, LogConfig, StockSymbol};
use findata_data::{AlphaVantageClient, ConnectionFactory, StockDataRepository};
use secrecy::SecretString;

#[derive(Parser)]
#[command(name = "findata-collector")]
#[command(about = "Daily stock price collector (Alpha Vantage → PostgreSQL)", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 1회 수집 후 저장
    Run {
        /// 수집할 종목 (기본값: STOCK_SYMBOL)
        #[arg(long)]
        symbol: Option<String>,
    },

    /// 데몬 모드: 주기적으로 수집 (실패 시 재시도)
    Daemon {
        /// 수집할 종목 (기본값: STOCK_SYMBOL)
        #[arg(long)]
        symbol: Option<String>,
    },

    /// 테이블과 인덱스 생성
    InitDb,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    init_logging(LogConfig::for_crates(
        &["findata_collector", "findata_data", "findata_core"],
        &cli.log_level,
    ))?;

    tracing::info!("Findata Collector 시작");

    let config = EtlConfig::from_env().map_err(CollectorError::from)?;
    tracing::debug!(
        host = %config.database.host,
        database = %config.database.database,
        table = %config.table,
        "설정 로드 완료"
    );

    let repository =
        StockDataRepository::new(ConnectionFactory::new(&config.database), config.table.clone());

    match cli.command {
        Commands::Run { symbol } => {
            let symbol = resolve_symbol(symbol, &config)?;
            let client = build_client(&config)?;

            match modules::fetch_and_store(&client, &repository, &symbol).await {
                Ok(stats) => stats.log_summary("일별 수집"),
                Err(e) => {
                    tracing::error!(
                        symbol = %symbol,
                        error_kind = e.kind(),
                        "일별 수집 실패: {}",
                        e
                    );
                    return Err(e.into());
                }
            }
        }
        Commands::Daemon { symbol } => {
            let symbol = resolve_symbol(symbol, &config)?;
            let client = build_client(&config)?;

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("종료 신호 대기 실패: {}", e);
                    std::future::pending::<()>().await;
                }
            };

            let summary =
                modules::run_daemon(&client, &repository, &symbol, &config.daemon, shutdown).await;
            tracing::info!(
                succeeded = summary.succeeded,
                failed = summary.failed,
                "데몬 종료"
            );
        }
        Commands::InitDb => {
            repository.ensure_table().await.map_err(CollectorError::from)?;
            tracing::info!(table = %repository.table(), "테이블 초기화 완료");
        }
    }

    tracing::info!("Findata Collector 종료");

    Ok(())
}

fn resolve_symbol(
    symbol: Option<String>,
    config: &EtlConfig,
) -> Result<StockSymbol, CollectorError> {
    match symbol {
        Some(raw) => Ok(StockSymbol::new(raw)?),
        None => Ok(config.symbol.clone()),
    }
}

fn build_client(config: &EtlConfig) -> Result<AlphaVantageClient, CollectorError> {
    let api_key: SecretString = config.alpha_vantage.require_api_key()?.clone();

    Ok(AlphaVantageClient::new(
        api_key,
        &config.alpha_vantage.base_url,
        config.alpha_vantage.timeout(),
    )?)
}
