//! Coin identifiers and the configured tracked set.
//!
//! [`CoinId`] is a newtype over the provider's coin identifier (for
//! CoinGecko, e.g. `"dogecoin"` or `"shiba-inu"`). [`TrackedCoins`] is the
//! fixed, ordered set of coins the service refreshes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider-side identifier for a tracked coin.
///
/// Always stored trimmed and lowercase so lookups are stable regardless of
/// how the identifier was configured.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinId(String);

impl CoinId {
    /// Normalizes and wraps a coin identifier. Returns `None` for blank
    /// input.
    #[must_use]
    pub fn new(raw: &str) -> Option<Self> {
        let id = raw.trim().to_ascii_lowercase();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CoinId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Ordered, duplicate-free set of coins to track.
///
/// Order follows configuration order; it determines the order in which a
/// refresh cycle scores and writes coins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedCoins {
    coins: Vec<CoinId>,
}

impl TrackedCoins {
    /// Builds a set from identifiers, dropping blanks and duplicates.
    #[must_use]
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut coins: Vec<CoinId> = Vec::new();
        for id in ids.into_iter().filter_map(|s| CoinId::new(s.as_ref())) {
            if !coins.contains(&id) {
                coins.push(id);
            }
        }
        Self { coins }
    }

    /// Parses a comma-separated list such as `"bitcoin, dogecoin"`.
    #[must_use]
    pub fn parse_list(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// Returns the tracked coin matching `raw`, if any.
    #[must_use]
    pub fn get(&self, raw: &str) -> Option<&CoinId> {
        let wanted = CoinId::new(raw)?;
        self.coins.iter().find(|c| **c == wanted)
    }

    /// Whether `raw` names a tracked coin.
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.get(raw).is_some()
    }

    /// Iterates coins in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &CoinId> {
        self.coins.iter()
    }

    /// Number of tracked coins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.coins.len()
    }

    /// Whether no coins are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    /// Comma-joined identifiers, as expected by the `ids` query parameter.
    #[must_use]
    pub fn joined(&self) -> String {
        self.coins
            .iter()
            .map(CoinId::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}
