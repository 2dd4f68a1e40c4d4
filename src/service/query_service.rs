//! Read-only queries over stored snapshots.

use crate::domain::{CoinId, TrackedCoins};
use crate::error::{NotFoundReason, TrackerError};
use crate::persistence::{Snapshot, SqliteStore};

/// Maximum number of rows returned by [`QueryService::get_history`].
pub const HISTORY_LIMIT: u32 = 10;

/// Latest snapshot plus recent history for one coin.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinHistory {
    /// The coin queried.
    pub coin: CoinId,
    /// Most recent snapshot (same as the first `history` entry).
    pub latest: Snapshot,
    /// Up to [`HISTORY_LIMIT`] snapshots, newest first.
    pub history: Vec<Snapshot>,
}

/// Query side of the service. Never writes.
#[derive(Debug, Clone)]
pub struct QueryService {
    store: SqliteStore,
    coins: TrackedCoins,
}

impl QueryService {
    /// Creates a query service.
    #[must_use]
    pub fn new(store: SqliteStore, coins: TrackedCoins) -> Self {
        Self { store, coins }
    }

    /// Tracked coin set.
    #[must_use]
    pub fn coins(&self) -> &TrackedCoins {
        &self.coins
    }

    /// Latest snapshot (maximum ID) for every tracked coin that has one,
    /// ordered by coin name. Coins without rows are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Persistence`] on database failure.
    pub async fn list_latest(&self) -> Result<Vec<Snapshot>, TrackerError> {
        let rows = self.store.latest_per_coin().await?;
        Ok(rows
            .into_iter()
            .filter(|s| self.coins.contains(&s.coin))
            .collect())
    }

    /// Up to [`HISTORY_LIMIT`] most recent snapshots for `coin`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::NotFound`] with
    /// [`NotFoundReason::CoinNotTracked`] for an unknown coin or
    /// [`NotFoundReason::NoData`] when nothing is stored yet, and
    /// [`TrackerError::Persistence`] on database failure.
    pub async fn get_history(&self, coin: &str) -> Result<CoinHistory, TrackerError> {
        let coin = self
            .coins
            .get(coin)
            .ok_or(TrackerError::NotFound(NotFoundReason::CoinNotTracked))?
            .clone();

        let history = self
            .store
            .recent_for_coin(coin.as_str(), HISTORY_LIMIT)
            .await?;
        let latest = history
            .first()
            .cloned()
            .ok_or(TrackerError::NotFound(NotFoundReason::NoData))?;

        Ok(CoinHistory {
            coin,
            latest,
            history,
        })
    }
}
