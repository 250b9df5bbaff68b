use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Three-class sentiment shared by both classifier families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentCategory {
    #[serde(rename = "Positivo")]
    Positive,
    #[serde(rename = "Neutro")]
    Neutral,
    #[serde(rename = "Negativo")]
    Negative,
}

impl SentimentCategory {
    /// Fixed star partition: 4–5 positive, 1–2 negative, 3 neutral.
    #[must_use]
    pub fn from_stars(stars: u8) -> Self {
        if stars >= 4 {
            Self::Positive
        } else if stars <= 2 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positivo",
            Self::Neutral => "Neutro",
            Self::Negative => "Negativo",
        }
    }
}

impl std::fmt::Display for SentimentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provenance tag naming the classifier whose output was kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectedModel {
    #[serde(rename = "Texto")]
    Text,
    #[serde(rename = "Emoji")]
    Emoji,
}

impl SelectedModel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "Texto",
            Self::Emoji => "Emoji",
        }
    }
}

impl std::fmt::Display for SelectedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw top-1 prediction in the classifier's own vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierOutput {
    pub label: String,
    /// Model confidence in `[0.0, 1.0]`.
    pub confidence: f32,
}

impl ClassifierOutput {
    #[must_use]
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }

    /// Placeholder for inputs that are never sent to a model (blank text).
    /// Normalizes to 3 stars / neutral in both families.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSentiment {
    pub category: SentimentCategory,
    /// Star rating in `1..=5`.
    pub stars: u8,
    pub confidence: f32,
}

/// Emoji-vs-letter density of a raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContentSignal {
    pub emoji_count: usize,
    /// ASCII letters and digits left after removing emoji.
    pub letter_count: usize,
}

/// Authoritative per-record result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reconciled {
    pub sentiment: SentimentCategory,
    pub stars: u8,
    pub confidence: f32,
    pub selected_model: SelectedModel,
}

/// The ten enrichment columns appended to every record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Enrichment {
    pub sentiment_text: SentimentCategory,
    pub stars_text: u8,
    pub confidence_text: f32,
    pub sentiment_emoji: SentimentCategory,
    pub stars_emoji: u8,
    pub confidence_emoji: f32,
    pub final_sentiment: SentimentCategory,
    pub final_stars: u8,
    pub final_confidence: f32,
    pub selected_model: SelectedModel,
}

impl Enrichment {
    pub const COLUMNS: [&'static str; 10] = [
        "sentiment_text",
        "stars_text",
        "confidence_text",
        "sentiment_emoji",
        "stars_emoji",
        "confidence_emoji",
        "final_sentiment",
        "final_stars",
        "final_confidence",
        "selected_model",
    ];

    /// Column values in [`Self::COLUMNS`] order, formatted for delimited output.
    #[must_use]
    pub fn to_row(&self) -> [String; 10] {
        [
            self.sentiment_text.to_string(),
            self.stars_text.to_string(),
            self.confidence_text.to_string(),
            self.sentiment_emoji.to_string(),
            self.stars_emoji.to_string(),
            self.confidence_emoji.to_string(),
            self.final_sentiment.to_string(),
            self.final_stars.to_string(),
            self.final_confidence.to_string(),
            self.selected_model.to_string(),
        ]
    }
}

/// One input record: ordered `(column, value)` pairs as read from the source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComplaintRecord {
    columns: Vec<(String, String)>,
}

impl ComplaintRecord {
    #[must_use]
    pub fn new(columns: Vec<(String, String)>) -> Self {
        Self { columns }
    }

    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn columns(&self) -> &[(String, String)] {
        &self.columns
    }
}

impl Serialize for ComplaintRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Original record plus its enrichment, serialized as one flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: ComplaintRecord,
    #[serde(flatten)]
    pub enrichment: Enrichment,
}

/// Configuration for the classifier backends.
#[derive(Debug, Clone)]
pub struct SentimentConfig {
    pub text_model_url: String,
    pub emoji_model_url: String,
    pub text_model_name: String,
    pub emoji_model_name: String,
    /// Column holding the free text in input datasets.
    pub text_column: String,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

impl SentimentConfig {
    /// Build config from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `Err` naming the offending variable if a numeric value is invalid.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. Every key has a default.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `SOULCARE_CLASSIFIER_BATCH_SIZE` is not a positive
    /// integer or `SOULCARE_CLASSIFIER_TIMEOUT_SECS` is not an integer.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let batch_size = get("SOULCARE_CLASSIFIER_BATCH_SIZE", "32")
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                "invalid SOULCARE_CLASSIFIER_BATCH_SIZE: must be a positive integer".to_string()
            })?;

        let timeout_secs = get("SOULCARE_CLASSIFIER_TIMEOUT_SECS", "60")
            .parse::<u64>()
            .map_err(|e| format!("invalid SOULCARE_CLASSIFIER_TIMEOUT_SECS: {e}"))?;

        Ok(Self {
            text_model_url: get("SOULCARE_TEXT_MODEL_URL", "http://localhost:8081"),
            emoji_model_url: get("SOULCARE_EMOJI_MODEL_URL", "http://localhost:8082"),
            text_model_name: get(
                "SOULCARE_TEXT_MODEL_NAME",
                "nlptown/bert-base-multilingual-uncased-sentiment",
            ),
            emoji_model_name: get(
                "SOULCARE_EMOJI_MODEL_NAME",
                "cardiffnlp/twitter-roberta-base-sentiment-latest",
            ),
            text_column: get("SOULCARE_TEXT_COLUMN", "Texto"),
            batch_size,
            timeout_secs,
        })
    }
}
