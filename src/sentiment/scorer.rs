//! Sentiment scorer: mean polarity over a random sample of posts.

use std::sync::Arc;

use rand::Rng;

use super::lexicon::PolarityModel;
use super::posts::PostPool;
use crate::domain::CoinId;

/// Default number of posts drawn per score.
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Scores a coin by sampling posts from a shared pool.
///
/// The pool, the polarity model, and the random source are all injected.
/// Every coin samples from the same pool with the same distribution; the
/// coin identifier only shows up in logs.
#[derive(Debug, Clone)]
pub struct SentimentScorer {
    pool: Arc<PostPool>,
    model: Arc<dyn PolarityModel>,
    sample_size: usize,
}

impl SentimentScorer {
    /// Creates a scorer.
    #[must_use]
    pub fn new(pool: Arc<PostPool>, model: Arc<dyn PolarityModel>, sample_size: usize) -> Self {
        Self {
            pool,
            model,
            sample_size,
        }
    }

    /// Mean polarity of `min(sample_size, pool size)` posts drawn without
    /// replacement from the pool. Returns `0.0` for an empty sample.
    pub fn score<R>(&self, coin: &CoinId, rng: &mut R) -> f64
    where
        R: Rng + ?Sized,
    {
        let sample = self.pool.sample(self.sample_size, rng);
        if sample.is_empty() {
            tracing::debug!(%coin, "empty post sample, scoring neutral");
            return 0.0;
        }

        let total: f64 = sample.iter().map(|post| self.model.polarity(post)).sum();
        #[allow(clippy::cast_precision_loss)]
        let score = (total / sample.len() as f64).clamp(-1.0, 1.0);
        tracing::debug!(%coin, posts = sample.len(), score, "sentiment scored");
        score
    }

    /// Configured sample size.
    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
pub(crate) mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::sentiment::LexiconPolarity;

    /// Polarity model returning the same value for every post.
    #[derive(Debug)]
    pub(crate) struct FixedPolarity(pub f64);

    impl PolarityModel for FixedPolarity {
        fn polarity(&self, _text: &str) -> f64 {
            self.0
        }
    }

    /// Scorer whose result is always `value`.
    pub(crate) fn fixed_scorer(value: f64) -> SentimentScorer {
        SentimentScorer::new(
            Arc::new(PostPool::new(["a", "b", "c"])),
            Arc::new(FixedPolarity(value)),
            DEFAULT_SAMPLE_SIZE,
        )
    }

    fn coin() -> CoinId {
        let Some(coin) = CoinId::new("dogecoin") else {
            panic!("valid coin");
        };
        coin
    }

    #[test]
    fn constant_model_yields_constant_mean() {
        let scorer = fixed_scorer(0.3);
        let mut rng = StdRng::seed_from_u64(0);
        assert!((scorer.score(&coin(), &mut rng) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn empty_pool_scores_zero() {
        let scorer = SentimentScorer::new(
            Arc::new(PostPool::new(Vec::<String>::new())),
            Arc::new(FixedPolarity(0.9)),
            DEFAULT_SAMPLE_SIZE,
        );
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(scorer.score(&coin(), &mut rng), 0.0);
    }

    #[test]
    fn builtin_pool_scores_stay_in_range() {
        let scorer = SentimentScorer::new(
            Arc::new(PostPool::builtin()),
            Arc::new(LexiconPolarity::new()),
            DEFAULT_SAMPLE_SIZE,
        );
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let s = scorer.score(&coin(), &mut rng);
            assert!((-1.0..=1.0).contains(&s));
        }
    }

    #[test]
    fn same_seed_same_score() {
        let scorer = SentimentScorer::new(
            Arc::new(PostPool::builtin()),
            Arc::new(LexiconPolarity::new()),
            3,
        );
        let a = scorer.score(&coin(), &mut StdRng::seed_from_u64(9));
        let b = scorer.score(&coin(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
