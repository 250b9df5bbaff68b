//! Complaint listing page scraper.
//!
//! The listing renders each complaint as an `<h5>` author heading followed by
//! a `<p>` body. Headings and bodies are paired by position.

use std::sync::LazyLock;

use regex::Regex;

use super::{AUTHOR_COLUMN, TEXT_COLUMN};
use crate::error::SentimentError;
use crate::types::ComplaintRecord;

static H5_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h5\b[^>]*>(.*?)</h5\s*>").expect("valid h5 regex"));
static P_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<p\b[^>]*>(.*?)</p\s*>").expect("valid p regex"));
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<[^>]+>").expect("valid tags regex"));

/// Fetch `url` and extract its complaints.
///
/// # Errors
///
/// Returns [`SentimentError::Page`] on transport failure or a non-2xx status.
pub async fn fetch_complaint_page(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<ComplaintRecord>, SentimentError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| SentimentError::Page(format!("GET {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(SentimentError::Page(format!(
            "GET {url} returned status {}",
            response.status()
        )));
    }

    let html = response
        .text()
        .await
        .map_err(|e| SentimentError::Page(format!("reading body of {url} failed: {e}")))?;

    let records = parse_complaint_page(&html);
    tracing::info!(url, count = records.len(), "scraped complaint page");
    Ok(records)
}

/// Pair every `<h5>` with the `<p>` at the same position.
///
/// Extra headings or paragraphs beyond the shorter list are dropped.
#[must_use]
pub fn parse_complaint_page(html: &str) -> Vec<ComplaintRecord> {
    let authors = H5_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())));
    let texts = P_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| clean_text(m.as_str())));

    authors
        .zip(texts)
        .map(|(author, text)| {
            ComplaintRecord::new(vec![
                (AUTHOR_COLUMN.to_string(), author),
                (TEXT_COLUMN.to_string(), text),
            ])
        })
        .collect()
}

fn clean_text(input: &str) -> String {
    let no_tags = TAG_RE.replace_all(input, " ");
    decode_entities(&no_tags)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn decode_entities(input: &str) -> String {
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
