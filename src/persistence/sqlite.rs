//! SQLite implementation of the snapshot store.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

use super::models::{NewSnapshot, Snapshot};
use crate::domain::SentimentLabel;
use crate::error::TrackerError;

type SnapshotRow = (i64, String, f64, String, f64, DateTime<Utc>);

const SELECT_COLUMNS: &str =
    "SELECT id, coin_name, price_usd, sentiment_label, sentiment_score, timestamp FROM memecoins";

/// Append-only snapshot store backed by `sqlx::SqlitePool`.
///
/// Every operation checks out its own pooled connection, so readers and the
/// refresh writer only contend on SQLite's own locks.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Opens (creating if missing) the database file at `path` in WAL mode.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] if the file cannot be opened.
    pub async fn connect(path: &Path, max_connections: u32) -> Result<Self, TrackerError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        Ok(Self::new(pool))
    }

    /// Single-connection in-memory store for tests.
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self, TrackerError> {
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let store = Self::new(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Underlying pool, for tests that need raw SQL.
    #[cfg(test)]
    pub(crate) fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates the snapshot table and its lookup index if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn init_schema(&self) -> Result<(), TrackerError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS memecoins (\
                id INTEGER PRIMARY KEY AUTOINCREMENT, \
                coin_name TEXT NOT NULL, \
                price_usd REAL NOT NULL, \
                sentiment_label TEXT NOT NULL, \
                sentiment_score REAL NOT NULL, \
                timestamp TEXT NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_memecoins_coin_id ON memecoins (coin_name, id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Appends one snapshot row and returns its assigned ID.
    ///
    /// The insert auto-commits on its own; earlier rows are never touched.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn insert_snapshot(&self, snapshot: &NewSnapshot) -> Result<i64, TrackerError> {
        let result = sqlx::query(
            "INSERT INTO memecoins (coin_name, price_usd, sentiment_label, sentiment_score, timestamp) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(snapshot.coin.as_str())
        .bind(snapshot.price_usd)
        .bind(snapshot.sentiment_label().as_str())
        .bind(snapshot.sentiment_score)
        .bind(snapshot.timestamp)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Loads the row with the maximum ID for every coin that has one,
    /// ordered by coin name.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn latest_per_coin(&self) -> Result<Vec<Snapshot>, TrackerError> {
        let sql = format!(
            "{SELECT_COLUMNS} WHERE id IN (SELECT MAX(id) FROM memecoins GROUP BY coin_name) \
             ORDER BY coin_name"
        );
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_snapshot).collect()
    }

    /// Loads up to `limit` most recent rows for `coin`, newest first.
    ///
    /// Ties on the second-precision timestamp are broken by ID.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn recent_for_coin(
        &self,
        coin: &str,
        limit: u32,
    ) -> Result<Vec<Snapshot>, TrackerError> {
        let sql =
            format!("{SELECT_COLUMNS} WHERE coin_name = ? ORDER BY timestamp DESC, id DESC LIMIT ?");
        let rows = sqlx::query_as::<_, SnapshotRow>(&sql)
            .bind(coin)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(row_to_snapshot).collect()
    }

    /// Timestamp of the most recently written row for `coin`.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn latest_timestamp(&self, coin: &str) -> Result<Option<DateTime<Utc>>, TrackerError> {
        let ts = sqlx::query_scalar::<_, DateTime<Utc>>(
            "SELECT timestamp FROM memecoins WHERE coin_name = ? ORDER BY id DESC LIMIT 1",
        )
        .bind(coin)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ts)
    }

    /// Total number of stored rows.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Persistence`] on database failure.
    pub async fn count(&self) -> Result<i64, TrackerError> {
        let n = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memecoins")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_snapshot(
    (id, coin, price_usd, label, sentiment_score, timestamp): SnapshotRow,
) -> Result<Snapshot, TrackerError> {
    let sentiment_label = label
        .parse::<SentimentLabel>()
        .map_err(|e| TrackerError::Persistence(format!("row {id}: {e}")))?;
    Ok(Snapshot {
        id,
        coin,
        price_usd,
        sentiment_label,
        sentiment_score,
        timestamp,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::domain::CoinId;

    async fn store() -> SqliteStore {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store");
        };
        store
    }

    fn snap(coin: &str, price: f64, score: f64, secs: i64) -> NewSnapshot {
        let Some(coin) = CoinId::new(coin) else {
            panic!("valid coin");
        };
        let Some(timestamp) = Utc.timestamp_opt(1_700_000_000 + secs, 0).single() else {
            panic!("valid timestamp");
        };
        NewSnapshot {
            coin,
            price_usd: price,
            sentiment_score: score,
            timestamp,
        }
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = store().await;
        let Ok(a) = store.insert_snapshot(&snap("bitcoin", 1.0, 0.1, 0)).await else {
            panic!("insert failed");
        };
        let Ok(b) = store.insert_snapshot(&snap("bitcoin", 2.0, 0.1, 0)).await else {
            panic!("insert failed");
        };
        assert!(b > a);
        assert!(matches!(store.count().await, Ok(2)));
    }

    #[tokio::test]
    async fn init_schema_is_idempotent() {
        let store = store().await;
        let _ = store.insert_snapshot(&snap("bitcoin", 1.0, 0.0, 0)).await;
        assert!(store.init_schema().await.is_ok());
        assert!(matches!(store.count().await, Ok(1)));
    }

    #[tokio::test]
    async fn latest_per_coin_picks_max_id() {
        let store = store().await;
        for (coin, price, secs) in [
            ("dogecoin", 0.10, 0),
            ("bitcoin", 50_000.0, 0),
            ("dogecoin", 0.12, 60),
            ("bitcoin", 51_000.0, 60),
            ("dogecoin", 0.11, 120),
        ] {
            let _ = store.insert_snapshot(&snap(coin, price, -0.2, secs)).await;
        }

        let Ok(latest) = store.latest_per_coin().await else {
            panic!("query failed");
        };
        assert_eq!(latest.len(), 2);
        let coins: Vec<&str> = latest.iter().map(|s| s.coin.as_str()).collect();
        assert_eq!(coins, vec!["bitcoin", "dogecoin"]);
        let prices: Vec<f64> = latest.iter().map(|s| s.price_usd).collect();
        assert_eq!(prices, vec![51_000.0, 0.11]);
        assert!(latest
            .iter()
            .all(|s| s.sentiment_label == SentimentLabel::Negative));
    }

    #[tokio::test]
    async fn recent_for_coin_is_newest_first_and_limited() {
        let store = store().await;
        for i in 0..15 {
            let _ = store
                .insert_snapshot(&snap("shiba-inu", f64::from(i), 0.0, i64::from(i) * 60))
                .await;
        }
        let _ = store.insert_snapshot(&snap("bitcoin", 1.0, 0.0, 0)).await;

        let Ok(rows) = store.recent_for_coin("shiba-inu", 10).await else {
            panic!("query failed");
        };
        assert_eq!(rows.len(), 10);
        assert!(rows.windows(2).all(|w| match w {
            [a, b] => a.timestamp >= b.timestamp && a.id > b.id,
            _ => true,
        }));
        assert_eq!(rows.first().map(|s| s.price_usd), Some(14.0));
        assert!(rows.iter().all(|s| s.coin == "shiba-inu"));
    }

    #[tokio::test]
    async fn same_second_rows_tie_break_on_id() {
        let store = store().await;
        let _ = store.insert_snapshot(&snap("bitcoin", 1.0, 0.0, 0)).await;
        let _ = store.insert_snapshot(&snap("bitcoin", 2.0, 0.0, 0)).await;

        let Ok(rows) = store.recent_for_coin("bitcoin", 10).await else {
            panic!("query failed");
        };
        assert_eq!(rows.first().map(|s| s.price_usd), Some(2.0));
    }

    #[tokio::test]
    async fn latest_timestamp_tracks_last_insert() {
        let store = store().await;
        assert!(matches!(store.latest_timestamp("bitcoin").await, Ok(None)));

        let row = snap("bitcoin", 1.0, 0.0, 30);
        let _ = store.insert_snapshot(&row).await;
        let Ok(Some(ts)) = store.latest_timestamp("bitcoin").await else {
            panic!("expected a timestamp");
        };
        assert_eq!(ts, row.timestamp);
    }
}
