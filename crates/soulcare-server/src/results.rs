//! Holder for the most recent analysis run, shared across handlers.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use soulcare_sentiment::Analysis;
use tokio::sync::RwLock;

/// A completed analysis together with its rendered report.
#[derive(Debug)]
pub struct LatestAnalysis {
    pub analysis: Analysis,
    pub report: String,
    pub completed_at: DateTime<Utc>,
}

/// Latest successful analysis, replaced wholesale on each run.
#[derive(Debug, Clone, Default)]
pub struct AnalysisResults {
    latest: Arc<RwLock<Option<Arc<LatestAnalysis>>>>,
}

impl AnalysisResults {
    pub async fn latest(&self) -> Option<Arc<LatestAnalysis>> {
        self.latest.read().await.clone()
    }

    pub async fn replace(&self, latest: LatestAnalysis) -> Arc<LatestAnalysis> {
        let latest = Arc::new(latest);
        *self.latest.write().await = Some(Arc::clone(&latest));
        latest
    }
}
