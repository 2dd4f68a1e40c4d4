//! Word-lexicon polarity model.
//!
//! A deliberately small stand-in for a real text-sentiment scorer: each
//! known word carries a polarity, a preceding negator flips and dampens it,
//! and a preceding intensifier scales it. The text score is the mean over
//! matched words, clamped to `[-1, 1]`.

use std::collections::HashMap;
use std::fmt;

/// Pure text → polarity function.
///
/// Implementations must return a value in `[-1, 1]` and must not fail;
/// text with no signal scores `0.0`.
pub trait PolarityModel: Send + Sync + fmt::Debug {
    /// Polarity of `text` in `[-1, 1]`.
    fn polarity(&self, text: &str) -> f64;
}

const WORDS: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("love", 0.5),
    ("excited", 0.4),
    ("happy", 0.8),
    ("best", 1.0),
    ("strong", 0.4),
    ("solid", 0.2),
    ("win", 0.8),
    ("winning", 0.5),
    ("profit", 0.5),
    ("gains", 0.5),
    ("bullish", 0.6),
    ("moon", 0.5),
    ("mooning", 0.6),
    ("pump", 0.3),
    ("pumping", 0.4),
    ("rally", 0.4),
    ("hodl", 0.3),
    ("undervalued", 0.3),
    ("breakout", 0.4),
    ("adoption", 0.2),
    ("rocket", 0.4),
    ("fun", 0.3),
    ("nice", 0.6),
    ("wow", 0.1),
    // negative
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("hate", -0.8),
    ("worst", -1.0),
    ("weak", -0.4),
    ("scam", -0.8),
    ("rug", -0.7),
    ("rugged", -0.8),
    ("dump", -0.5),
    ("dumping", -0.5),
    ("crash", -0.6),
    ("crashing", -0.6),
    ("bearish", -0.6),
    ("loss", -0.5),
    ("losses", -0.5),
    ("rekt", -0.7),
    ("fear", -0.5),
    ("panic", -0.6),
    ("overvalued", -0.3),
    ("bubble", -0.3),
    ("dead", -0.2),
    ("sad", -0.5),
    ("worried", -0.4),
    ("risky", -0.3),
    ("down", -0.2),
];

const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "dont", "isn't", "isnt", "won't", "wont", "can't", "cant",
    "doesn't", "doesnt", "ain't", "aint",
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("so", 1.2),
    ("super", 1.4),
    ("extremely", 1.5),
    ("totally", 1.3),
];

/// Negated words keep half their strength with the opposite sign.
const NEGATION_FACTOR: f64 = -0.5;

/// Built-in lexicon polarity model.
#[derive(Debug, Clone)]
pub struct LexiconPolarity {
    words: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconPolarity {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconPolarity {
    /// Creates the model with the built-in word list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            words: WORDS.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }
}

impl PolarityModel for LexiconPolarity {
    fn polarity(&self, text: &str) -> f64 {
        let lowered = text.to_lowercase();
        let mut scores: Vec<f64> = Vec::new();
        let mut negate = false;
        let mut intensity = 1.0;

        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty());

        for token in tokens {
            if NEGATORS.contains(&token) {
                negate = true;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                intensity *= factor;
                continue;
            }
            if let Some(base) = self.words.get(token) {
                let mut value = (base * intensity).clamp(-1.0, 1.0);
                if negate {
                    value *= NEGATION_FACTOR;
                }
                scores.push(value);
            }
            negate = false;
            intensity = 1.0;
        }

        if scores.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let mean = scores.iter().sum::<f64>() / scores.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}
