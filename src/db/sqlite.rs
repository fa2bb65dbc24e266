use std::str::FromStr;

use crate::db::filter::QuoteQuery;
use crate::db::models::{NewQuote, Quote};
use crate::db::schema::{DATE_FORMAT, SQLITE_INIT, TIMESTAMP_FORMAT};
use crate::error::QuoteError;
use crate::pricing::to_cents;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

/// Handle to the quote table. Cheap to clone; all clones share one pool.
#[derive(Clone)]
pub struct QuoteStorage {
    pool: SqlitePool,
}

impl QuoteStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url`, creating the file if needed, and initialize the schema.
    pub async fn open(database_url: &str, max_connections: u32) -> Result<Self, QuoteError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        info!(database_url, max_connections, "quote storage opened");
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), QuoteError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Wait for in-flight queries and close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("quote storage closed");
    }

    /// Insert a quote. Returns the assigned row id.
    pub async fn insert(&self, quote: NewQuote) -> Result<i64, QuoteError> {
        let premium = quote
            .monthly_premium
            .to_f64()
            .ok_or_else(|| QuoteError::invalid("monthly_premium", "out of range"))?;
        let result = sqlx::query(
            r#"
            INSERT INTO quotes (name, zip_code, date_of_birth, monthly_premium, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(quote.name)
        .bind(quote.zip_code)
        .bind(quote.date_of_birth.format(DATE_FORMAT).to_string())
        .bind(premium)
        .bind(quote.created_at.format(TIMESTAMP_FORMAT).to_string())
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Quote, QuoteError> {
        let row = sqlx::query(
            r#"SELECT id, name, zip_code, date_of_birth, monthly_premium, created_at
               FROM quotes WHERE id = ?"#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Self::row_to_model(row)
    }

    /// Run a typed query; results are ordered by id.
    pub async fn query_all(&self, query: &QuoteQuery) -> Result<Vec<Quote>, QuoteError> {
        let mut qb = query.build();
        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_model).collect()
    }

    fn row_to_model(row: SqliteRow) -> Result<Quote, QuoteError> {
        let id: i64 = row.try_get("id")?;
        let name: String = row.try_get("name")?;
        let zip_code: String = row.try_get("zip_code")?;
        let date_of_birth_str: String = row.try_get("date_of_birth")?;
        let monthly_premium_f: f64 = row.try_get("monthly_premium")?;
        let created_at_str: String = row.try_get("created_at")?;

        let date_of_birth = NaiveDate::parse_from_str(&date_of_birth_str, DATE_FORMAT)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
        let created_at: DateTime<Utc> =
            NaiveDateTime::parse_from_str(&created_at_str, TIMESTAMP_FORMAT)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
                .and_utc();

        Ok(Quote {
            id,
            name,
            zip_code,
            date_of_birth,
            monthly_premium: to_cents(monthly_premium_f),
            created_at,
        })
    }
}

#[cfg(test)]
pub(crate) async fn memory_storage() -> QuoteStorage {
    // a single connection keeps the in-memory database alive and shared
    QuoteStorage::open("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::filter::{QuoteField, QuoteFilter};
    use crate::pricing::money;
    use chrono::{Duration, TimeZone};

    fn new_quote(name: &str, zip: &str, premium: &str, created_at: DateTime<Utc>) -> NewQuote {
        NewQuote {
            name: name.to_string(),
            zip_code: zip.to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1983, 8, 4).unwrap(),
            monthly_premium: money(premium),
            created_at,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids_and_round_trips() {
        let storage = memory_storage().await;
        let at = Utc.with_ymd_and_hms(2022, 6, 12, 20, 11, 22).unwrap();
        let first = storage
            .insert(new_quote("Ada Lovelace", "12561", "617.43", at))
            .await
            .unwrap();
        let second = storage
            .insert(new_quote("Alan Turing", "11803", "646.85", at))
            .await
            .unwrap();
        assert!(second > first);

        let quote = storage.get_by_id(first).await.unwrap();
        assert_eq!(quote.name, "Ada Lovelace");
        assert_eq!(quote.monthly_premium, money("617.43"));
        assert_eq!(quote.created_at, at);
        assert_eq!(quote.date_of_birth, NaiveDate::from_ymd_opt(1983, 8, 4).unwrap());
    }

    #[tokio::test]
    async fn rows_defaulting_created_at_are_readable() {
        let storage = memory_storage().await;
        sqlx::query(
            "INSERT INTO quotes (name, zip_code, date_of_birth, monthly_premium) VALUES ('A', '1', '1990-01-01', 600.0)",
        )
        .execute(storage.pool())
        .await
        .unwrap();
        let all = storage.query_all(&QuoteQuery::default()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert!(all[0].created_at <= Utc::now());
    }

    #[tokio::test]
    async fn equality_filters_and_most_recent() {
        let storage = memory_storage().await;
        let at = Utc.with_ymd_and_hms(2022, 6, 12, 8, 0, 0).unwrap();
        storage.insert(new_quote("Ada", "12561", "600", at)).await.unwrap();
        storage.insert(new_quote("Ada", "11803", "617.43", at)).await.unwrap();
        let newest = storage.insert(new_quote("Ada", "12561", "646.85", at)).await.unwrap();

        let filter = QuoteFilter::from_pairs([("name", "Ada"), ("zip_code", "12561")]).unwrap();
        let matches = storage.query_all(&QuoteQuery::new(filter.clone())).await.unwrap();
        assert_eq!(matches.len(), 2);

        let latest = storage
            .query_all(&QuoteQuery::new(filter).most_recent_only(true))
            .await
            .unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].id, newest);

        let by_premium = QuoteFilter::new()
            .with(QuoteField::MonthlyPremium, QuoteField::MonthlyPremium.parse_value("617.43").unwrap());
        let matches = storage.query_all(&QuoteQuery::new(by_premium)).await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].zip_code, "11803");
    }

    #[tokio::test]
    async fn injection_attempts_match_nothing() {
        let storage = memory_storage().await;
        let at = Utc.with_ymd_and_hms(2022, 6, 12, 8, 0, 0).unwrap();
        storage.insert(new_quote("Ada", "12561", "600", at)).await.unwrap();

        let filter = QuoteFilter::from_pairs([("name", "x\" OR \"1\"=\"1")]).unwrap();
        let matches = storage.query_all(&QuoteQuery::new(filter)).await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn created_after_and_premium_bounds() {
        let storage = memory_storage().await;
        let now = Utc.with_ymd_and_hms(2022, 6, 19, 12, 0, 0).unwrap();
        storage.insert(new_quote("old", "1", "600", now - Duration::hours(30))).await.unwrap();
        storage.insert(new_quote("cheap", "1", "600", now - Duration::hours(2))).await.unwrap();
        storage.insert(new_quote("dear", "1", "700", now - Duration::hours(1))).await.unwrap();

        let recent = QuoteQuery::default().created_after(now - Duration::hours(24));
        let names: Vec<String> = storage
            .query_all(&recent)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.name)
            .collect();
        assert_eq!(names, vec!["cheap", "dear"]);

        let bounded = recent.premium_between(Some(money("600")), Some(money("800")));
        let names: Vec<String> = storage
            .query_all(&bounded)
            .await
            .unwrap()
            .into_iter()
            .map(|q| q.name)
            .collect();
        assert_eq!(names, vec!["dear"]);
    }
}
