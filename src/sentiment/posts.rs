//! Fixed pool of sample posts used to synthesize sentiment.
//!
//! The pool is loaded once at startup, either from a newline-separated file
//! or from the built-in corpus, and is never modified afterwards.

use std::path::Path;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::TrackerError;

const BUILTIN_POSTS: &[&str] = &[
    "DOGE to the moon, this rally is amazing!",
    "Shiba army is strong today, love this community",
    "Bitcoin looking bullish after that breakout",
    "ETH gas fees are terrible again, so annoying",
    "Another rug pull, memecoins are a scam",
    "Just bought more DOGE, hodl forever",
    "Market is crashing, panic everywhere",
    "Not a good day for my portfolio, losses all around",
    "SHIB burn rate looking great this week",
    "Ethereum upgrade went smooth, really solid work",
    "Bitcoin is just digital gold, nothing new here",
    "Feeling worried about this bubble honestly",
    "Elon tweeted about doge again lol",
    "Holding my bags, no idea where this goes",
    "Massive gains today, best week of the year",
    "Bearish divergence on the daily chart, careful",
    "These memecoins are overvalued and risky",
    "Super excited for the next bull run",
    "Got rekt on leverage, never again",
    "Adoption keeps growing, very happy with my position",
    "Price moving sideways, waiting for a signal",
    "Whales dumping on retail again",
    "This coin is not dead, devs keep shipping",
    "Nice pump this morning, took some profit",
    "Fear index is extreme, might be time to buy",
    "Weekend volume is low as usual",
    "Crypto twitter is wild today",
    "Don't fall for the hype, do your own research",
    "Great community call, winning vibes",
    "Down bad on this trade, sad times",
];

/// Immutable collection of short text posts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostPool {
    posts: Vec<String>,
}

impl PostPool {
    /// Creates a pool from posts, dropping blank entries.
    #[must_use]
    pub fn new<I, S>(posts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            posts: posts
                .into_iter()
                .map(Into::into)
                .map(|p: String| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// The built-in corpus of simulated crypto posts.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(BUILTIN_POSTS.iter().copied())
    }

    /// Loads one post per non-blank line of `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`TrackerError::Config`] if the file cannot be read or
    /// contains no posts.
    pub fn from_file(path: &Path) -> Result<Self, TrackerError> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            TrackerError::Config(format!("cannot read posts file {}: {e}", path.display()))
        })?;
        let pool = Self::new(raw.lines());
        if pool.is_empty() {
            return Err(TrackerError::Config(format!(
                "posts file {} contains no posts",
                path.display()
            )));
        }
        Ok(pool)
    }

    /// Loads from `path` when given, otherwise the built-in corpus.
    ///
    /// # Errors
    ///
    /// See [`PostPool::from_file`].
    pub fn load(path: Option<&Path>) -> Result<Self, TrackerError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::builtin()),
        }
    }

    /// Draws up to `k` distinct posts uniformly at random.
    ///
    /// Returns the whole pool (in random order) when it holds fewer than
    /// `k` posts.
    pub fn sample<'a, R>(&'a self, k: usize, rng: &mut R) -> Vec<&'a str>
    where
        R: Rng + ?Sized,
    {
        self.posts
            .choose_multiple(rng, k)
            .map(String::as_str)
            .collect()
    }

    /// Number of posts in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
