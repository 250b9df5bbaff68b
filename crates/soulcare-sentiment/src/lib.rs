//! Dual-model sentiment pipeline for Soulcare complaints.
//!
//! Scores every complaint with a star-rating text model and a polarity
//! emoji/social model, normalizes both onto a common scale, and keeps exactly
//! one of the two per record depending on whether the text is emoji-dominated.
//! The enriched dataset and a per-category summary are returned to the caller.

pub mod classifier;
pub mod dataset;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod signal;
pub mod sources;
pub mod types;

pub use classifier::{SentimentClassifier, TeiClassifier};
pub use dataset::{assemble, read_csv, write_csv, write_dataset, Dataset, IndexedOutput};
pub use error::SentimentError;
pub use normalize::{normalize_polarity_label, normalize_star_label, LabelFamily};
pub use pipeline::{Analysis, SentimentPipeline};
pub use reconcile::{reconcile, select_model};
pub use report::{render_markdown, report_file_name, summarize, SentimentSummary};
pub use signal::content_signal;
pub use types::{
    ClassifierOutput, ComplaintRecord, ContentSignal, EnrichedRecord, Enrichment,
    NormalizedSentiment, Reconciled, SelectedModel, SentimentCategory, SentimentConfig,
};
