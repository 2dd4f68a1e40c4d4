//! Refresh service: one full fetch → score → write pass.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use super::price_fetcher::PriceProvider;
use super::snapshot_writer::SnapshotWriter;
use crate::domain::TrackedCoins;
use crate::error::TrackerError;
use crate::persistence::Snapshot;
use crate::sentiment::SentimentScorer;

/// Outcome of a successful refresh cycle.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Rows appended during the cycle, in coin order.
    pub snapshots: Vec<Snapshot>,
    /// Wall time spent on the cycle.
    pub elapsed: Duration,
}

/// Runs refresh cycles, one at a time.
///
/// The sampling RNG lives behind an async mutex that is held for the whole
/// cycle, so a manual trigger arriving mid-cycle waits for the running one
/// instead of racing it.
#[derive(Debug)]
pub struct RefreshService {
    provider: Arc<dyn PriceProvider>,
    scorer: SentimentScorer,
    writer: SnapshotWriter,
    coins: TrackedCoins,
    rng: Mutex<StdRng>,
}

impl RefreshService {
    /// Creates a refresh service.
    #[must_use]
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        scorer: SentimentScorer,
        writer: SnapshotWriter,
        coins: TrackedCoins,
        rng: StdRng,
    ) -> Self {
        Self {
            provider,
            scorer,
            writer,
            coins,
            rng: Mutex::new(rng),
        }
    }

    /// Builds the sampling RNG: seeded when `seed` is given, OS entropy
    /// otherwise.
    #[must_use]
    pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
        seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64)
    }

    /// Tracked coin set.
    #[must_use]
    pub fn coins(&self) -> &TrackedCoins {
        &self.coins
    }

    /// Fetches every price, scores every coin, and appends one row per coin.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Upstream`] if the price fetch fails (nothing
    /// is written) or [`TrackerError::Persistence`] if a write fails (rows
    /// already written remain).
    pub async fn refresh(&self) -> Result<RefreshReport, TrackerError> {
        let mut rng = self.rng.lock().await;
        let started = Instant::now();

        let prices = self.provider.fetch_prices(&self.coins).await?;
        let snapshots = self
            .writer
            .write_cycle(&prices, |coin| self.scorer.score(coin, &mut *rng))
            .await?;

        Ok(RefreshReport {
            snapshots,
            elapsed: started.elapsed(),
        })
    }
}
