//! On-demand analysis runs and the latest-run dataset.

use axum::{extract::State, Extension, Json};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;
use soulcare_sentiment::sources::records_from_complaints;
use soulcare_sentiment::{render_markdown, EnrichedRecord, SentimentSummary};

use crate::middleware::RequestId;
use crate::results::LatestAnalysis;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct RunAnalysisResponse {
    pub success: bool,
    pub total_records: usize,
    pub summary: SentimentSummary,
    /// Markdown report for this run.
    pub report: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReportData {
    pub items: Vec<EnrichedRecord>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// POST /api/v1/admin/run-analysis: score every stored complaint.
///
/// The previous result stays in place if the run fails.
pub(super) async fn run_analysis(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<RunAnalysisResponse>>, ApiError> {
    let complaints = state.store.load().await;
    let records = records_from_complaints(&complaints);

    let analysis = state.pipeline.run(records).await.map_err(|e| {
        tracing::error!(error = %e, "analysis run failed");
        ApiError::new(req_id.0.clone(), "analysis_failed", e.to_string())
    })?;

    let report = render_markdown(&analysis.summary, Local::now().naive_local());
    let latest = state
        .results
        .replace(LatestAnalysis {
            analysis,
            report,
            completed_at: Utc::now(),
        })
        .await;

    Ok(Json(ApiResponse {
        data: RunAnalysisResponse {
            success: true,
            total_records: latest.analysis.records.len(),
            summary: latest.analysis.summary.clone(),
            report: latest.report.clone(),
            completed_at: latest.completed_at,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/report-data: enriched records from the latest run, or none.
pub(super) async fn report_data(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ReportData>> {
    let data = match state.results.latest().await {
        Some(latest) => ReportData {
            items: latest.analysis.records.clone(),
            completed_at: Some(latest.completed_at),
        },
        None => ReportData {
            items: Vec::new(),
            completed_at: None,
        },
    };

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}
