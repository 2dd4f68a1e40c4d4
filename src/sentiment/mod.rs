//! Mock sentiment: a fixed post pool, a polarity model, and a sampler.
//!
//! There is no live social feed. Each score is the mean polarity of a random
//! sample of posts from a pool loaded at startup.

pub mod lexicon;
pub mod posts;
pub mod scorer;

pub use lexicon::{LexiconPolarity, PolarityModel};
pub use posts::PostPool;
pub use scorer::{DEFAULT_SAMPLE_SIZE, SentimentScorer};
