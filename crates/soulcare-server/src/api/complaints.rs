//! Complaint intake, listing and the scrapeable listing page.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Html,
    Extension, Json,
};
use chrono::Utc;
use soulcare_core::{Complaint, NewComplaint};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

/// POST /api/v1/complaints: validate and store a complaint.
pub(super) async fn create_complaint(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<NewComplaint>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Complaint>>), ApiError> {
    let rid = &req_id.0;

    let Json(submission) =
        payload.map_err(|e| ApiError::new(rid, "validation_error", e.body_text()))?;
    let complaint = submission
        .validate(Utc::now())
        .map_err(|e| ApiError::new(rid, "validation_error", e.to_string()))?;

    state.store.append(complaint.clone()).await.map_err(|e| {
        tracing::error!(error = %e, "failed to persist complaint");
        ApiError::new(rid, "internal_error", "failed to store complaint")
    })?;
    tracing::info!(id = complaint.id, "complaint stored");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: complaint,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

/// GET /api/v1/complaints: all stored complaints, newest first.
pub(super) async fn list_complaints(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<Complaint>>> {
    Json(ApiResponse {
        data: state.store.list_recent().await,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// GET /complaints: one `<h5>` author / `<p>` text pair per complaint.
pub(super) async fn complaint_page(State(state): State<AppState>) -> Html<String> {
    let complaints = state.store.list_recent().await;
    Html(render_complaint_page(&complaints))
}

fn render_complaint_page(complaints: &[Complaint]) -> String {
    let mut html = String::from(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"utf-8\"><title>Reclamações</title></head>\n<body>\n",
    );
    for complaint in complaints {
        html.push_str("<div class=\"complaint\"><h5>");
        html.push_str(&escape_html(&complaint.name));
        html.push_str("</h5><p>");
        html.push_str(&escape_html(&complaint.description));
        html.push_str("</p></div>\n");
    }
    html.push_str("</body>\n</html>\n");
    html
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use soulcare_sentiment::sources::{parse_complaint_page, AUTHOR_COLUMN, TEXT_COLUMN};

    use super::*;

    fn complaint(name: &str, description: &str) -> Complaint {
        Complaint {
            id: 1,
            name: name.to_string(),
            email: "x@example.com".to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"A" & 'B'</b>"#),
            "&lt;b&gt;&quot;A&quot; &amp; &#39;B&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn rendered_page_scrapes_back_to_the_same_pairs() {
        let complaints = vec![
            complaint("Ana & Cia", "Não chegou <nunca>"),
            complaint("Beto", "😡😡😡"),
        ];

        let records = parse_complaint_page(&render_complaint_page(&complaints));
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(AUTHOR_COLUMN), Some("Ana & Cia"));
        assert_eq!(records[0].get(TEXT_COLUMN), Some("Não chegou <nunca>"));
        assert_eq!(records[1].get(TEXT_COLUMN), Some("😡😡😡"));
    }
}
