//! Three-way sentiment classification derived from a polarity score.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Coarse sentiment bucket stored alongside every numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SentimentLabel {
    /// Score strictly above zero.
    Positive,
    /// Score strictly below zero.
    Negative,
    /// Score exactly zero.
    Neutral,
}

impl SentimentLabel {
    /// Classifies a score. The boundary is exact equality at zero; there is
    /// no tolerance band.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Self::Positive
        } else if score < 0.0 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    /// Label as stored in the database.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Negative => "Negative",
            Self::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Positive" => Ok(Self::Positive),
            "Negative" => Ok(Self::Negative),
            "Neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}
