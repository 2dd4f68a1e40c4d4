//! Database models for price/sentiment snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{CoinId, SentimentLabel};

/// A stored row from the `memecoins` table.
///
/// Rows are immutable once written; corrections are new rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Auto-increment row ID. Latest-per-coin is the maximum ID.
    pub id: i64,
    /// Coin identifier.
    pub coin: String,
    /// Spot price in USD at refresh time.
    pub price_usd: f64,
    /// Label derived from `sentiment_score`.
    pub sentiment_label: SentimentLabel,
    /// Mean polarity of the sampled posts, in `[-1, 1]`.
    pub sentiment_score: f64,
    /// Creation time, second precision.
    pub timestamp: DateTime<Utc>,
}

/// A snapshot that has not been assigned an ID yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
    /// Coin identifier.
    pub coin: CoinId,
    /// Spot price in USD.
    pub price_usd: f64,
    /// Mean polarity of the sampled posts.
    pub sentiment_score: f64,
    /// Creation time, second precision.
    pub timestamp: DateTime<Utc>,
}

impl NewSnapshot {
    /// Label derived from the score.
    #[must_use]
    pub fn sentiment_label(&self) -> SentimentLabel {
        SentimentLabel::from_score(self.sentiment_score)
    }
}
