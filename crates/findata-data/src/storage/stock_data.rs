//! `stock_data` 테이블 저장소.
//!
//! 고정 스키마:
//!
//! | 컬럼 | 타입 |
//! |---|---|
//! | `date` | `DATE` |
//! | `open_price`, `high_price`, `low_price`, `close_price` | `NUMERIC(18, 4)` |
//! | `volume` | `BIGINT` |
//! | `stock_symbol` | `VARCHAR(16)` |
//!
//! 기본 키와 고유 제약이 없으므로 같은 (날짜, 종목)을 다시 적재하면 행이 중복됩니다.

use crate::error::Result;
use crate::storage::database::ConnectionFactory;
use crate::storage::PriceSink;
use async_trait::async_trait;
use chrono::NaiveDate;
use findata_core::{ClosePoint, PriceRow, StockSymbol, TableName};
use rust_decimal::Decimal;
use sqlx::postgres::PgConnection;
use sqlx::{Connection, FromRow};
use tracing::{info, instrument};

/// 한 INSERT 문에 담는 최대 행 수
const INSERT_CHUNK_SIZE: usize = 500;

/// 종가 조회 레코드.
#[derive(Debug, Clone, FromRow)]
pub struct CloseRecord {
    pub date: NaiveDate,
    pub close_price: Decimal,
}

impl CloseRecord {
    pub fn to_close_point(&self) -> ClosePoint {
        ClosePoint {
            date: self.date,
            close_price: self.close_price,
        }
    }
}

/// 일별 시세 테이블 repository.
#[derive(Clone)]
pub struct StockDataRepository {
    db: ConnectionFactory,
    table: TableName,
}

impl StockDataRepository {
    pub fn new(db: ConnectionFactory, table: TableName) -> Self {
        Self { db, table }
    }

    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// 테이블이 없으면 생성합니다.
    ///
    /// 조회용 `(stock_symbol, date)` 인덱스는 고유 인덱스가 아닙니다.
    pub async fn ensure_table(&self) -> Result<()> {
        let mut conn = self.db.acquire().await?;
        let outcome = create_table(&mut conn, &self.table).await;
        ConnectionFactory::release(conn, outcome).await?;

        info!(table = %self.table, "테이블 확인 완료");
        Ok(())
    }

    /// 행들을 한 트랜잭션으로 일괄 삽입하고 삽입된 행 수를 반환합니다.
    ///
    /// 중간에 실패하면 트랜잭션은 커밋되지 않고 오류를 반환합니다.
    /// 어느 경우든 연결은 닫힙니다.
    #[instrument(skip(self, rows), fields(table = %self.table, count = rows.len()))]
    pub async fn insert_rows(&self, rows: &[PriceRow]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut conn = self.db.acquire().await?;
        let outcome = insert_in_transaction(&mut conn, &self.table, rows).await;
        let inserted = ConnectionFactory::release(conn, outcome).await?;

        info!(inserted, "시세 데이터 저장 완료");
        Ok(inserted)
    }

    /// 종목의 (날짜, 종가) 시계열을 날짜 오름차순으로 조회합니다.
    ///
    /// 데이터가 없으면 빈 목록을 반환합니다.
    #[instrument(skip(self, symbol), fields(table = %self.table, symbol = %symbol))]
    pub async fn close_series(&self, symbol: &StockSymbol) -> Result<Vec<ClosePoint>> {
        let sql = format!(
            "SELECT date, close_price FROM {} WHERE stock_symbol = $1 ORDER BY date",
            self.table
        );

        let mut conn = self.db.acquire().await?;
        let outcome = sqlx::query_as::<_, CloseRecord>(&sql)
            .bind(symbol.as_str())
            .fetch_all(&mut conn)
            .await
            .map_err(Into::into);
        let records = ConnectionFactory::release(conn, outcome).await?;

        Ok(records.iter().map(CloseRecord::to_close_point).collect())
    }

    /// 종목의 저장된 행 수 (중복 포함).
    pub async fn count_rows(&self, symbol: &StockSymbol) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE stock_symbol = $1",
            self.table
        );

        let mut conn = self.db.acquire().await?;
        let outcome = sqlx::query_scalar::<_, i64>(&sql)
            .bind(symbol.as_str())
            .fetch_one(&mut conn)
            .await
            .map_err(Into::into);
        ConnectionFactory::release(conn, outcome).await
    }
}

#[async_trait]
impl PriceSink for StockDataRepository {
    fn name(&self) -> &str {
        "PostgreSQL"
    }

    async fn store(&self, rows: &[PriceRow]) -> Result<u64> {
        self.insert_rows(rows).await
    }
}

async fn create_table(conn: &mut PgConnection, table: &TableName) -> Result<()> {
    let create = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            date         DATE           NOT NULL,
            open_price   NUMERIC(18, 4) NOT NULL,
            high_price   NUMERIC(18, 4) NOT NULL,
            low_price    NUMERIC(18, 4) NOT NULL,
            close_price  NUMERIC(18, 4) NOT NULL,
            volume       BIGINT         NOT NULL,
            stock_symbol VARCHAR(16)    NOT NULL
        )
        "#,
        table
    );
    let index = format!(
        "CREATE INDEX IF NOT EXISTS idx_{}_symbol_date ON {} (stock_symbol, date)",
        table.unqualified(),
        table
    );

    sqlx::query(&create).execute(&mut *conn).await?;
    sqlx::query(&index).execute(&mut *conn).await?;
    Ok(())
}

async fn insert_in_transaction(
    conn: &mut PgConnection,
    table: &TableName,
    rows: &[PriceRow],
) -> Result<u64> {
    let sql = format!(
        r#"
        INSERT INTO {}
            (date, open_price, high_price, low_price, close_price, volume, stock_symbol)
        SELECT * FROM UNNEST(
            $1::date[], $2::numeric[], $3::numeric[], $4::numeric[], $5::numeric[],
            $6::bigint[], $7::text[]
        )
        "#,
        table
    );

    let mut tx = conn.begin().await?;
    let mut inserted = 0;

    // UNNEST 패턴으로 일괄 삽입
    for chunk in rows.chunks(INSERT_CHUNK_SIZE) {
        let dates: Vec<NaiveDate> = chunk.iter().map(|r| r.date).collect();
        let opens: Vec<Decimal> = chunk.iter().map(|r| r.open_price).collect();
        let highs: Vec<Decimal> = chunk.iter().map(|r| r.high_price).collect();
        let lows: Vec<Decimal> = chunk.iter().map(|r| r.low_price).collect();
        let closes: Vec<Decimal> = chunk.iter().map(|r| r.close_price).collect();
        let volumes: Vec<i64> = chunk.iter().map(|r| r.volume).collect();
        let symbols: Vec<&str> = chunk.iter().map(|r| r.stock_symbol.as_str()).collect();

        let result = sqlx::query(&sql)
            .bind(&dates)
            .bind(&opens)
            .bind(&highs)
            .bind(&lows)
            .bind(&closes)
            .bind(&volumes)
            .bind(&symbols)
            .execute(&mut *tx)
            .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

// =============================================================================
// 테스트
// =============================================================================
