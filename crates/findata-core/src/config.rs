//! 환경변수 기반 설정 모듈.
//!
//! 프로세스 시작 시 한 번만 읽습니다. `.env` 파일이 있으면 먼저 로드합니다.
//!
//! | 환경변수 | 기본값 |
//! |---|---|
//! | `ALPHA_VANTAGE_API_KEY` | (수집 시 필수) |
//! | `ALPHA_VANTAGE_BASE_URL` | `https://www.alphavantage.co/query` |
//! | `HTTP_TIMEOUT_SECS` | 30 |
//! | `POSTGRES_USER` / `POSTGRES_PASSWORD` / `POSTGRES_HOST` | (필수) |
//! | `POSTGRES_DB` | `financial_data` |
//! | `DB_CONNECT_TIMEOUT_SECS` | 30 |
//! | `STOCK_TABLE` | `stock_data` |
//! | `STOCK_SYMBOL` | `AAPL` |
//! | `DAEMON_INTERVAL_HOURS` | 24 |
//! | `DAEMON_RETRIES` | 1 |
//! | `DAEMON_RETRY_DELAY_MINUTES` | 5 |

use crate::error::{ConfigError, ConfigResult};
use crate::types::{StockSymbol, TableName};
use secrecy::SecretString;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::time::Duration;

/// Alpha Vantage 기본 엔드포인트
pub const DEFAULT_ALPHA_VANTAGE_URL: &str = "https://www.alphavantage.co/query";
/// 기본 데이터베이스 이름
pub const DEFAULT_DATABASE: &str = "financial_data";
/// 기본 종목
pub const DEFAULT_SYMBOL: &str = "AAPL";
/// PostgreSQL 기본 포트
pub const DEFAULT_PG_PORT: u16 = 5432;

/// 타임아웃 허용 범위 (초)
const TIMEOUT_SECS_RANGE: RangeInclusive<u64> = 1..=3600;
/// 데몬 주기 허용 범위 (시간, 최대 1년)
const INTERVAL_HOURS_RANGE: RangeInclusive<u64> = 1..=366 * 24;
/// 재시도 대기 허용 범위 (분, 최대 1일)
const RETRY_DELAY_MINUTES_RANGE: RangeInclusive<u64> = 0..=24 * 60;

/// ETL 전체 설정
#[derive(Debug, Clone)]
pub struct EtlConfig {
    /// 시세 API 설정
    pub alpha_vantage: AlphaVantageConfig,
    /// DB 자격증명
    pub database: DatabaseCredentials,
    /// 적재 대상 테이블
    pub table: TableName,
    /// 기본 종목
    pub symbol: StockSymbol,
    /// 데몬 모드 설정
    pub daemon: DaemonConfig,
}

/// Alpha Vantage API 설정
#[derive(Debug, Clone)]
pub struct AlphaVantageConfig {
    /// API 키 (수집 명령에서만 필요)
    pub api_key: Option<SecretString>,
    /// 엔드포인트 URL
    pub base_url: String,
    /// 요청 타임아웃 (초)
    pub timeout_secs: u64,
}

/// PostgreSQL 접속 정보
#[derive(Debug, Clone)]
pub struct DatabaseCredentials {
    pub user: String,
    pub password: SecretString,
    pub host: String,
    pub port: u16,
    /// 데이터베이스 이름
    pub database: String,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

/// 데몬 모드 설정
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    /// 실행 주기 (시간 단위)
    pub interval_hours: u64,
    /// 실패 시 재시도 횟수
    pub retries: u32,
    /// 재시도 전 대기 시간 (분 단위)
    pub retry_delay_minutes: u64,
}

impl EtlConfig {
    /// 환경변수에서 설정 로드
    pub fn from_env() -> ConfigResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 키 조회 함수로부터 설정 로드.
    ///
    /// 빈 문자열은 설정되지 않은 것으로 취급합니다.
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let (host, port) = split_host_port(&required(&get, "POSTGRES_HOST")?)?;

        let table = match get("STOCK_TABLE") {
            Some(raw) => TableName::new(raw).map_err(|e| ConfigError::Invalid {
                key: "STOCK_TABLE",
                reason: e.to_string(),
            })?,
            None => TableName::default(),
        };

        let symbol = StockSymbol::new(get("STOCK_SYMBOL").as_deref().unwrap_or(DEFAULT_SYMBOL))
            .map_err(|e| ConfigError::Invalid {
                key: "STOCK_SYMBOL",
                reason: e.to_string(),
            })?;

        Ok(Self {
            alpha_vantage: AlphaVantageConfig {
                api_key: get("ALPHA_VANTAGE_API_KEY").map(SecretString::from),
                base_url: get("ALPHA_VANTAGE_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_URL.to_string()),
                timeout_secs: parse_in_range(&get, "HTTP_TIMEOUT_SECS", 30, TIMEOUT_SECS_RANGE)?,
            },
            database: DatabaseCredentials {
                user: required(&get, "POSTGRES_USER")?,
                password: SecretString::from(required(&get, "POSTGRES_PASSWORD")?),
                host,
                port,
                database: get("POSTGRES_DB").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
                connect_timeout_secs: parse_in_range(
                    &get,
                    "DB_CONNECT_TIMEOUT_SECS",
                    30,
                    TIMEOUT_SECS_RANGE,
                )?,
            },
            table,
            symbol,
            daemon: DaemonConfig {
                interval_hours: parse_in_range(
                    &get,
                    "DAEMON_INTERVAL_HOURS",
                    24,
                    INTERVAL_HOURS_RANGE,
                )?,
                retries: parse_or(&get, "DAEMON_RETRIES", 1)?,
                retry_delay_minutes: parse_in_range(
                    &get,
                    "DAEMON_RETRY_DELAY_MINUTES",
                    5,
                    RETRY_DELAY_MINUTES_RANGE,
                )?,
            },
        })
    }
}

impl AlphaVantageConfig {
    /// API 키를 반환합니다. 설정되지 않았으면 에러.
    pub fn require_api_key(&self) -> ConfigResult<&SecretString> {
        self.api_key
            .as_ref()
            .ok_or(ConfigError::Missing("ALPHA_VANTAGE_API_KEY"))
    }

    /// 요청 타임아웃을 Duration으로 반환
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl DatabaseCredentials {
    /// 연결 타임아웃을 Duration으로 반환
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl DaemonConfig {
    /// 실행 주기를 Duration으로 반환
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_hours.max(1).saturating_mul(60 * 60))
    }

    /// 재시도 대기 시간을 Duration으로 반환
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_minutes.saturating_mul(60))
    }
}

fn required<G>(get: &G, key: &'static str) -> ConfigResult<String>
where
    G: Fn(&str) -> Option<String>,
{
    get(key).ok_or(ConfigError::Missing(key))
}

/// 값이 있으면 파싱하고, 없으면 기본값을 사용
fn parse_or<G, T>(get: &G, key: &'static str, default: T) -> ConfigResult<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// 값이 있으면 파싱하고 범위를 확인합니다. 없으면 기본값을 사용
fn parse_in_range<G>(
    get: &G,
    key: &'static str,
    default: u64,
    range: RangeInclusive<u64>,
) -> ConfigResult<u64>
where
    G: Fn(&str) -> Option<String>,
{
    let value = parse_or(get, key, default)?;
    if !range.contains(&value) {
        return Err(ConfigError::Invalid {
            key,
            reason: format!(
                "{}..={} 범위를 벗어났습니다: {}",
                range.start(),
                range.end(),
                value
            ),
        });
    }
    Ok(value)
}

/// `host[:port]` 분리.
///
/// IPv6 주소는 `[::1]:5432`처럼 괄호로 감싸야 포트를 지정할 수 있습니다.
/// 괄호 없는 IPv6 주소(`::1`)는 전체를 호스트로 보고 기본 포트를 사용합니다.
fn split_host_port(raw: &str) -> ConfigResult<(String, u16)> {
    let invalid = |reason: String| ConfigError::Invalid {
        key: "POSTGRES_HOST",
        reason,
    };

    let (host, port) = if let Some(rest) = raw.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| invalid(format!("닫는 괄호가 없습니다: {}", raw)))?;
        match after {
            "" => (host, None),
            _ => match after.strip_prefix(':') {
                Some(port) => (host, Some(port)),
                None => return Err(invalid(format!("잘못된 호스트 형식입니다: {}", raw))),
            },
        }
    } else {
        match raw.split_once(':') {
            Some((host, port)) if !port.contains(':') => (host, Some(port)),
            _ => (raw, None),
        }
    };

    if host.is_empty() {
        return Err(invalid(format!("호스트가 비어 있습니다: {}", raw)));
    }

    let port = match port {
        Some(port) => port
            .parse()
            .map_err(|_| invalid(format!("포트 번호가 아닙니다: {}", port)))?,
        None => DEFAULT_PG_PORT,
    };

    Ok((host.to_string(), port))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn base() -> Vec<(&'static str, &'static str)> {
        vec![
            ("POSTGRES_USER", "etl"),
            ("POSTGRES_PASSWORD", "s3cret"),
            ("POSTGRES_HOST", "db.internal"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = EtlConfig::from_lookup(lookup(&base())).unwrap();

        assert!(config.alpha_vantage.api_key.is_none());
        assert_eq!(config.alpha_vantage.base_url, DEFAULT_ALPHA_VANTAGE_URL);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "financial_data");
        assert_eq!(config.database.password.expose_secret(), "s3cret");
        assert_eq!(config.table.as_str(), "stock_data");
        assert_eq!(config.symbol.as_str(), "AAPL");
        assert_eq!(config.daemon.interval(), Duration::from_secs(24 * 3600));
        assert_eq!(config.daemon.retries, 1);
        assert_eq!(config.daemon.retry_delay(), Duration::from_secs(300));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = base();
        pairs.extend([
            ("ALPHA_VANTAGE_API_KEY", "demo"),
            ("POSTGRES_HOST", "localhost:6543"),
            ("POSTGRES_DB", "prices"),
            ("STOCK_TABLE", "market.daily_prices"),
            ("STOCK_SYMBOL", "msft"),
            ("DAEMON_RETRIES", "3"),
        ]);
        let config = EtlConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(
            config
                .alpha_vantage
                .require_api_key()
                .unwrap()
                .expose_secret(),
            "demo"
        );
        assert_eq!(config.database.host, "localhost");
        assert_eq!(config.database.port, 6543);
        assert_eq!(config.database.database, "prices");
        assert_eq!(config.table.as_str(), "market.daily_prices");
        assert_eq!(config.symbol.as_str(), "MSFT");
        assert_eq!(config.daemon.retries, 3);
    }

    #[test]
    fn test_missing_required() {
        let err = EtlConfig::from_lookup(lookup(&[("POSTGRES_HOST", "db")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("POSTGRES_USER")));

        let config = EtlConfig::from_lookup(lookup(&base())).unwrap();
        assert!(matches!(
            config.alpha_vantage.require_api_key(),
            Err(ConfigError::Missing("ALPHA_VANTAGE_API_KEY"))
        ));
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = base();
        pairs.push(("HTTP_TIMEOUT_SECS", "soon"));
        assert!(matches!(
            EtlConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "HTTP_TIMEOUT_SECS", .. })
        ));

        let mut pairs = base();
        pairs.push(("STOCK_TABLE", "stock_data; --"));
        assert!(matches!(
            EtlConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { key: "STOCK_TABLE", .. })
        ));

        let mut pairs = base();
        pairs[2] = ("POSTGRES_HOST", "db:port");
        assert!(EtlConfig::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_out_of_range_durations() {
        for (key, value) in [
            ("HTTP_TIMEOUT_SECS", "0"),
            ("DB_CONNECT_TIMEOUT_SECS", "0"),
            ("DAEMON_INTERVAL_HOURS", "0"),
            // 초 단위로 변환하면 u64 범위를 넘는 값
            ("DAEMON_INTERVAL_HOURS", "18446744073709551615"),
            ("DAEMON_RETRY_DELAY_MINUTES", "307445734561825861"),
        ] {
            let mut pairs = base();
            pairs.push((key, value));
            match EtlConfig::from_lookup(lookup(&pairs)) {
                Err(ConfigError::Invalid { key: got, .. }) => assert_eq!(got, key),
                other => panic!("{}={} should be rejected: {:?}", key, value, other),
            }
        }
    }

    #[test]
    fn test_duration_bounds_accepted() {
        let mut pairs = base();
        pairs.extend([
            ("HTTP_TIMEOUT_SECS", "1"),
            ("DAEMON_INTERVAL_HOURS", "8784"),
            ("DAEMON_RETRY_DELAY_MINUTES", "0"),
        ]);
        let config = EtlConfig::from_lookup(lookup(&pairs)).unwrap();

        assert_eq!(config.alpha_vantage.timeout(), Duration::from_secs(1));
        assert_eq!(config.daemon.interval(), Duration::from_secs(8784 * 3600));
        assert_eq!(config.daemon.retry_delay(), Duration::ZERO);
    }

    #[test]
    fn test_daemon_durations_saturate() {
        let daemon = DaemonConfig {
            interval_hours: u64::MAX,
            retries: 0,
            retry_delay_minutes: u64::MAX,
        };
        assert_eq!(daemon.interval(), Duration::from_secs(u64::MAX));
        assert_eq!(daemon.retry_delay(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(
            split_host_port("db.internal").unwrap(),
            ("db.internal".to_string(), 5432)
        );
        assert_eq!(
            split_host_port("db.internal:6543").unwrap(),
            ("db.internal".to_string(), 6543)
        );
        assert_eq!(split_host_port("::1").unwrap(), ("::1".to_string(), 5432));
        assert_eq!(
            split_host_port("fe80::1:2").unwrap(),
            ("fe80::1:2".to_string(), 5432)
        );
        assert_eq!(split_host_port("[::1]").unwrap(), ("::1".to_string(), 5432));
        assert_eq!(
            split_host_port("[::1]:6543").unwrap(),
            ("::1".to_string(), 6543)
        );
    }

    #[test]
    fn test_split_host_port_invalid() {
        assert!(split_host_port("[::1").is_err());
        assert!(split_host_port("[::1]6543").is_err());
        assert!(split_host_port("[::1]:port").is_err());
        assert!(split_host_port(":5432").is_err());
        assert!(split_host_port("[]:5432").is_err());
    }

    #[test]
    fn test_empty_value_is_unset() {
        let mut pairs = base();
        pairs.push(("ALPHA_VANTAGE_API_KEY", "  "));
        let config = EtlConfig::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.alpha_vantage.api_key.is_none());
    }
}
