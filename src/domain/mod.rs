//! Domain layer: coin identity and sentiment classification.

pub mod coin_id;
pub mod sentiment_label;

pub use coin_id::{CoinId, TrackedCoins};
pub use sentiment_label::SentimentLabel;
