//! Memecoin DTOs for the list and history endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::SentimentLabel;
use crate::persistence::Snapshot;
use crate::service::CoinHistory;

/// One entry of `GET /memecoins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LatestSnapshotDto {
    /// Coin identifier.
    pub coin: String,
    /// Latest USD price.
    pub price: f64,
    /// Latest sentiment score in `[-1, 1]`.
    pub sentiment_score: f64,
    /// Label derived from the score.
    pub sentiment_label: SentimentLabel,
    /// When the snapshot was taken.
    pub last_updated: DateTime<Utc>,
}

impl From<Snapshot> for LatestSnapshotDto {
    fn from(s: Snapshot) -> Self {
        Self {
            coin: s.coin,
            price: s.price_usd,
            sentiment_score: s.sentiment_score,
            sentiment_label: s.sentiment_label,
            last_updated: s.timestamp,
        }
    }
}

/// One history row of `GET /memecoins/{coin}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SnapshotEntryDto {
    /// USD price.
    pub price_usd: f64,
    /// Sentiment score in `[-1, 1]`.
    pub sentiment_score: f64,
    /// Label derived from the score.
    pub sentiment_label: SentimentLabel,
    /// When the snapshot was taken.
    pub timestamp: DateTime<Utc>,
}

impl From<Snapshot> for SnapshotEntryDto {
    fn from(s: Snapshot) -> Self {
        Self {
            price_usd: s.price_usd,
            sentiment_score: s.sentiment_score,
            sentiment_label: s.sentiment_label,
            timestamp: s.timestamp,
        }
    }
}

/// Response body for `GET /memecoins/{coin}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CoinHistoryResponse {
    /// Coin identifier.
    pub coin: String,
    /// Most recent snapshot.
    pub latest: SnapshotEntryDto,
    /// Up to 10 snapshots, newest first.
    pub history: Vec<SnapshotEntryDto>,
}

impl From<CoinHistory> for CoinHistoryResponse {
    fn from(h: CoinHistory) -> Self {
        Self {
            coin: h.coin.to_string(),
            latest: h.latest.into(),
            history: h.history.into_iter().map(Into::into).collect(),
        }
    }
}

/// Response body for `POST /admin/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RefreshResponse {
    /// Human-readable outcome.
    pub message: String,
    /// Number of rows appended.
    pub written: usize,
    /// Cycle duration in milliseconds.
    pub elapsed_ms: u64,
}
