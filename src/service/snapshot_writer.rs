//! Snapshot writer: turns one price map plus per-coin scores into rows.

use chrono::{SubsecRound, Utc};

use super::price_fetcher::PriceMap;
use crate::domain::{CoinId, TrackedCoins};
use crate::error::TrackerError;
use crate::persistence::{NewSnapshot, Snapshot, SqliteStore};

/// Sole owner of the storage write path.
///
/// Each row is committed on its own. A failure part-way through a cycle
/// leaves the rows already written in place.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    store: SqliteStore,
    coins: TrackedCoins,
}

impl SnapshotWriter {
    /// Creates a writer for the given coin set.
    #[must_use]
    pub fn new(store: SqliteStore, coins: TrackedCoins) -> Self {
        Self { store, coins }
    }

    /// Scores every tracked coin, then appends one row per coin.
    ///
    /// All rows of a cycle share one second-precision timestamp, bumped up
    /// per coin if needed so a coin's history never goes backwards.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Upstream`] if `prices` lacks a tracked coin
    /// (nothing is written in that case), or [`TrackerError::Persistence`]
    /// if an insert fails.
    pub async fn write_cycle<F>(
        &self,
        prices: &PriceMap,
        mut score: F,
    ) -> Result<Vec<Snapshot>, TrackerError>
    where
        F: FnMut(&CoinId) -> f64 + Send,
    {
        let cycle_ts = Utc::now().trunc_subsecs(0);

        let mut pending: Vec<NewSnapshot> = Vec::with_capacity(self.coins.len());
        for coin in self.coins.iter() {
            let price_usd = *prices.get(coin).ok_or_else(|| {
                TrackerError::Upstream(format!("no price fetched for {coin}"))
            })?;
            pending.push(NewSnapshot {
                coin: coin.clone(),
                price_usd,
                sentiment_score: score(coin).clamp(-1.0, 1.0),
                timestamp: cycle_ts,
            });
        }

        let mut written = Vec::with_capacity(pending.len());
        for mut row in pending {
            if let Some(prev) = self.store.latest_timestamp(row.coin.as_str()).await? {
                row.timestamp = row.timestamp.max(prev);
            }
            let id = self.store.insert_snapshot(&row).await.inspect_err(|e| {
                tracing::error!(coin = %row.coin, error = %e, "snapshot insert failed");
            })?;
            tracing::debug!(
                id,
                coin = %row.coin,
                price_usd = row.price_usd,
                sentiment = row.sentiment_score,
                "snapshot written"
            );
            written.push(Snapshot {
                id,
                coin: row.coin.to_string(),
                price_usd: row.price_usd,
                sentiment_label: row.sentiment_label(),
                sentiment_score: row.sentiment_score,
                timestamp: row.timestamp,
            });
        }

        Ok(written)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::SentimentLabel;

    async fn writer(coins: &[&str]) -> (SnapshotWriter, SqliteStore) {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory store");
        };
        let writer = SnapshotWriter::new(store.clone(), TrackedCoins::new(coins.iter().copied()));
        (writer, store)
    }

    fn prices(pairs: &[(&str, f64)]) -> PriceMap {
        pairs
            .iter()
            .filter_map(|(c, p)| CoinId::new(c).map(|c| (c, *p)))
            .collect()
    }

    #[tokio::test]
    async fn writes_one_row_per_coin() {
        let (writer, store) = writer(&["bitcoin", "dogecoin"]).await;
        let map = prices(&[("bitcoin", 50_000.0), ("dogecoin", 0.12)]);

        let Ok(rows) = writer.write_cycle(&map, |_| 0.3).await else {
            panic!("write failed");
        };
        assert_eq!(rows.len(), 2);
        assert!(matches!(store.count().await, Ok(2)));

        let Ok(rows) = writer.write_cycle(&map, |_| 0.0).await else {
            panic!("write failed");
        };
        assert!(rows.iter().all(|r| r.sentiment_label == SentimentLabel::Neutral));
        assert!(matches!(store.count().await, Ok(4)));
    }

    #[tokio::test]
    async fn bitcoin_example_row() {
        let (writer, store) = writer(&["bitcoin"]).await;
        let map = prices(&[("bitcoin", 50_000.0)]);
        let _ = writer.write_cycle(&map, |_| 0.3).await;

        let Ok(latest) = store.latest_per_coin().await else {
            panic!("query failed");
        };
        let [row] = latest.as_slice() else {
            panic!("expected exactly one row");
        };
        assert_eq!(row.coin, "bitcoin");
        assert_eq!(row.price_usd, 50_000.0);
        assert_eq!(row.sentiment_label, SentimentLabel::Positive);
        assert!((row.sentiment_score - 0.3).abs() < 1e-12);
        assert_eq!(row.timestamp.timestamp_subsec_nanos(), 0);
    }

    #[tokio::test]
    async fn missing_price_writes_nothing() {
        let (writer, store) = writer(&["bitcoin", "dogecoin"]).await;
        let map = prices(&[("bitcoin", 50_000.0)]);
        let result = writer.write_cycle(&map, |_| 0.1).await;
        assert!(matches!(result, Err(TrackerError::Upstream(_))));
        assert!(matches!(store.count().await, Ok(0)));
    }

    #[tokio::test]
    async fn scores_are_clamped_and_labelled() {
        let (writer, _store) = writer(&["bitcoin", "dogecoin"]).await;
        let map = prices(&[("bitcoin", 1.0), ("dogecoin", 1.0)]);
        let mut calls = 0;
        let Ok(rows) = writer
            .write_cycle(&map, |_| {
                calls += 1;
                if calls == 1 { 3.0 } else { -0.4 }
            })
            .await
        else {
            panic!("write failed");
        };
        let scores: Vec<(f64, SentimentLabel)> =
            rows.iter().map(|r| (r.sentiment_score, r.sentiment_label)).collect();
        assert_eq!(
            scores,
            vec![(1.0, SentimentLabel::Positive), (-0.4, SentimentLabel::Negative)]
        );
    }

    #[tokio::test]
    async fn timestamp_never_goes_backwards() {
        let (writer, store) = writer(&["bitcoin"]).await;
        let Some(future) = Utc.timestamp_opt(Utc::now().timestamp(), 0).single() else {
            panic!("valid timestamp");
        };
        let future = future + Duration::hours(1);
        let Some(coin) = CoinId::new("bitcoin") else {
            panic!("valid coin");
        };
        let _ = store
            .insert_snapshot(&NewSnapshot {
                coin,
                price_usd: 1.0,
                sentiment_score: 0.0,
                timestamp: future,
            })
            .await;

        let Ok(rows) = writer.write_cycle(&prices(&[("bitcoin", 2.0)]), |_| 0.0).await else {
            panic!("write failed");
        };
        assert_eq!(rows.first().map(|r| r.timestamp), Some(future));
    }

    #[tokio::test]
    async fn storage_failure_is_persistence_error() {
        let (writer, store) = writer(&["bitcoin"]).await;
        store.close().await;
        let result = writer.write_cycle(&prices(&[("bitcoin", 2.0)]), |_| 0.0).await;
        assert!(matches!(result, Err(TrackerError::Persistence(_))));
    }

    #[tokio::test]
    async fn mid_cycle_failure_keeps_earlier_rows() {
        let (writer, store) = writer(&["bitcoin", "dogecoin"]).await;
        let trigger = sqlx::query(
            "CREATE TRIGGER reject_dogecoin BEFORE INSERT ON memecoins \
             WHEN NEW.coin_name = 'dogecoin' \
             BEGIN SELECT RAISE(ABORT, 'dogecoin rejected'); END",
        )
        .execute(store.pool())
        .await;
        assert!(trigger.is_ok());

        let map = prices(&[("bitcoin", 50_000.0), ("dogecoin", 0.1)]);
        let result = writer.write_cycle(&map, |_| 0.2).await;
        assert!(matches!(result, Err(TrackerError::Persistence(_))));

        let Ok(latest) = store.latest_per_coin().await else {
            panic!("query failed");
        };
        let coins: Vec<&str> = latest.iter().map(|r| r.coin.as_str()).collect();
        assert_eq!(coins, vec!["bitcoin"]);
        assert!(matches!(store.count().await, Ok(1)));
    }
}
