//! Sentiment pipeline orchestration.

use crate::classifier::{SentimentClassifier, TeiClassifier};
use crate::dataset::{assemble, IndexedOutput};
use crate::error::SentimentError;
use crate::report::{summarize, SentimentSummary};
use crate::types::{ComplaintRecord, EnrichedRecord, SentimentConfig};

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<EnrichedRecord>,
    pub summary: SentimentSummary,
}

/// Dual-classifier pipeline: a star-rating text model and a polarity emoji model.
#[derive(Debug, Clone)]
pub struct SentimentPipeline<T, E> {
    text_model: T,
    emoji_model: E,
    text_column: String,
}

impl SentimentPipeline<TeiClassifier, TeiClassifier> {
    /// Build the TEI-backed pipeline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError::Http`] if a classifier client cannot be built.
    pub fn from_config(config: &SentimentConfig) -> Result<Self, SentimentError> {
        Ok(Self::new(
            TeiClassifier::text_model(config)?,
            TeiClassifier::emoji_model(config)?,
            &config.text_column,
        ))
    }
}

impl<T, E> SentimentPipeline<T, E>
where
    T: SentimentClassifier,
    E: SentimentClassifier,
{
    #[must_use]
    pub fn new(text_model: T, emoji_model: E, text_column: &str) -> Self {
        Self {
            text_model,
            emoji_model,
            text_column: text_column.to_string(),
        }
    }

    #[must_use]
    pub fn text_column(&self) -> &str {
        &self.text_column
    }

    /// Score, normalize and reconcile every record.
    ///
    /// 1. Run both classifiers concurrently over all texts.
    /// 2. Tag each output with its record index.
    /// 3. Join both stages back onto the records by index and reconcile.
    /// 4. Summarize final sentiment counts.
    ///
    /// Records without the text column are scored as empty text. An empty
    /// input produces an empty analysis without calling either model.
    ///
    /// # Errors
    ///
    /// Returns [`SentimentError`] if either classifier fails or a stage comes
    /// back misaligned. No partial result is returned.
    pub async fn run(&self, records: Vec<ComplaintRecord>) -> Result<Analysis, SentimentError> {
        if records.is_empty() {
            tracing::info!("no records to analyze");
            return Ok(Analysis {
                records: Vec::new(),
                summary: summarize(&[]),
            });
        }

        let texts: Vec<&str> = records
            .iter()
            .map(|r| r.get(&self.text_column).unwrap_or_default())
            .collect();

        let (text_stage, emoji_stage) = tokio::try_join!(
            score_stage(&self.text_model, &texts),
            score_stage(&self.emoji_model, &texts),
        )?;

        let enriched = assemble(
            records,
            &self.text_column,
            (self.text_model.family(), text_stage),
            (self.emoji_model.family(), emoji_stage),
        )?;

        let summary = summarize(&enriched);
        tracing::info!(
            records = enriched.len(),
            emoji_selected = summary.emoji_selected,
            text_selected = summary.text_selected,
            "sentiment analysis complete"
        );

        Ok(Analysis {
            records: enriched,
            summary,
        })
    }
}

async fn score_stage<C: SentimentClassifier>(
    classifier: &C,
    texts: &[&str],
) -> Result<Vec<IndexedOutput>, SentimentError> {
    let outputs = classifier.classify(texts).await?;

    if outputs.len() != texts.len() {
        return Err(SentimentError::Classifier {
            model: classifier.name().to_string(),
            message: format!(
                "returned {} outputs for {} inputs",
                outputs.len(),
                texts.len()
            ),
        });
    }

    Ok(outputs
        .into_iter()
        .enumerate()
        .map(|(index, output)| IndexedOutput { index, output })
        .collect())
}
