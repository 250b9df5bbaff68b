//! Mapping of each classifier family's native labels onto the common scale.

use crate::types::{ClassifierOutput, NormalizedSentiment, SentimentCategory};

/// Stars assumed when a star label cannot be parsed.
const FALLBACK_STARS: u8 = 3;

/// Native output vocabulary of a classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelFamily {
    /// Labels like `"4 stars"`: leading token is a 1–5 rating.
    StarRating,
    /// Labels `positive` / `negative` / `neutral`.
    Polarity,
}

impl LabelFamily {
    #[must_use]
    pub fn normalize(self, output: &ClassifierOutput) -> NormalizedSentiment {
        match self {
            Self::StarRating => normalize_star_label(&output.label, output.confidence),
            Self::Polarity => normalize_polarity_label(&output.label, output.confidence),
        }
    }
}

/// Normalize a star-rating label.
///
/// The leading whitespace-separated token must parse as an integer in `1..=5`.
/// Anything else falls back to 3 stars (neutral) instead of failing the record.
#[must_use]
pub fn normalize_star_label(label: &str, score: f32) -> NormalizedSentiment {
    let stars = label
        .split_whitespace()
        .next()
        .and_then(|token| token.parse::<u8>().ok())
        .filter(|stars| (1..=5).contains(stars))
        .unwrap_or(FALLBACK_STARS);

    NormalizedSentiment {
        category: SentimentCategory::from_stars(stars),
        stars,
        confidence: score,
    }
}

/// Normalize a polarity label (case-insensitive).
#[must_use]
pub fn normalize_polarity_label(label: &str, score: f32) -> NormalizedSentiment {
    let (category, stars) = match label.trim().to_lowercase().as_str() {
        "positive" => (SentimentCategory::Positive, 5),
        "negative" => (SentimentCategory::Negative, 1),
        _ => (SentimentCategory::Neutral, 3),
    };

    NormalizedSentiment {
        category,
        stars,
        confidence: score,
    }
}
