//! Sentiment classifier adapters.
//!
//! Both models are sequence-classification checkpoints served behind a TEI
//! (Text Embeddings Inference) compatible `/predict` endpoint.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SentimentError;
use crate::normalize::LabelFamily;
use crate::types::{ClassifierOutput, SentimentConfig};

/// A batch sentiment model.
///
/// Implementations return exactly one [`ClassifierOutput`] per input, in input
/// order, and must accept empty or emoji-only strings. Any failure is fatal for
/// the whole batch.
pub trait SentimentClassifier: Send + Sync {
    /// Model identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Vocabulary of the labels this model emits.
    fn family(&self) -> LabelFamily;

    fn classify(
        &self,
        texts: &[&str],
    ) -> impl Future<Output = Result<Vec<ClassifierOutput>, SentimentError>> + Send;
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    inputs: Vec<[&'a str; 1]>,
    raw_scores: bool,
}

#[derive(Debug, Deserialize)]
struct Prediction {
    label: String,
    score: f32,
}

/// HTTP client for a TEI `/predict` endpoint.
///
/// `reqwest::Client` is safe to share, so one instance may serve concurrent
/// callers.
#[derive(Debug, Clone)]
pub struct TeiClassifier {
    client: reqwest::Client,
    url: String,
    model: String,
    family: LabelFamily,
    batch_size: usize,
}

impl TeiClassifier {
    /// Create a classifier for the model served at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        model: &str,
        family: LabelFamily,
        batch_size: usize,
        timeout: Duration,
    ) -> Result<Self, SentimentError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{}/predict", base_url.trim_end_matches('/')),
            model: model.to_string(),
            family,
            batch_size: batch_size.max(1),
        })
    }

    /// The star-rating text model configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn text_model(config: &SentimentConfig) -> Result<Self, SentimentError> {
        Self::new(
            &config.text_model_url,
            &config.text_model_name,
            LabelFamily::StarRating,
            config.batch_size,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// The polarity emoji/social model configured in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if the HTTP client cannot be built.
    pub fn emoji_model(config: &SentimentConfig) -> Result<Self, SentimentError> {
        Self::new(
            &config.emoji_model_url,
            &config.emoji_model_name,
            LabelFamily::Polarity,
            config.batch_size,
            Duration::from_secs(config.timeout_secs),
        )
    }

    fn error(&self, message: impl Into<String>) -> SentimentError {
        SentimentError::Classifier {
            model: self.model.clone(),
            message: message.into(),
        }
    }

    async fn predict_batch(&self, chunk: &[&str]) -> Result<Vec<ClassifierOutput>, SentimentError> {
        let request = PredictRequest {
            inputs: chunk.iter().map(|text| [*text]).collect(),
            raw_scores: false,
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.error(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(self.error(format!("returned status {}", response.status())));
        }

        let predictions: Vec<Vec<Prediction>> = response
            .json()
            .await
            .map_err(|e| self.error(format!("response parse error: {e}")))?;

        if predictions.len() != chunk.len() {
            return Err(self.error(format!(
                "returned {} predictions for {} inputs",
                predictions.len(),
                chunk.len()
            )));
        }

        predictions
            .into_iter()
            .map(|labels| {
                labels
                    .into_iter()
                    .max_by(|a, b| a.score.total_cmp(&b.score))
                    .map(|top| ClassifierOutput::new(top.label, top.score))
                    .ok_or_else(|| self.error("returned an empty label list"))
            })
            .collect()
    }
}

impl SentimentClassifier for TeiClassifier {
    fn name(&self) -> &str {
        &self.model
    }

    fn family(&self) -> LabelFamily {
        self.family
    }

    /// Classify `texts`, batching into groups of `batch_size` per request.
    ///
    /// Blank texts are not sent; they get [`ClassifierOutput::blank`].
    async fn classify(&self, texts: &[&str]) -> Result<Vec<ClassifierOutput>, SentimentError> {
        let mut outputs = vec![ClassifierOutput::blank(); texts.len()];

        let (indices, non_blank): (Vec<usize>, Vec<&str>) = texts
            .iter()
            .enumerate()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(i, text)| (i, *text))
            .unzip();

        let mut scored = Vec::with_capacity(non_blank.len());
        for chunk in non_blank.chunks(self.batch_size) {
            scored.extend(self.predict_batch(chunk).await?);
        }

        for (index, output) in indices.into_iter().zip(scored) {
            outputs[index] = output;
        }

        tracing::debug!(
            model = %self.model,
            total = texts.len(),
            sent = non_blank.len(),
            "classifier batch scored"
        );

        Ok(outputs)
    }
}
