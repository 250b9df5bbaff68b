//! Aggregate counts and the Markdown sentiment report.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::types::{EnrichedRecord, SelectedModel, SentimentCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub sentiment: SentimentCategory,
    pub count: usize,
}

/// Counts consumed by the report renderer and the HTTP API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SentimentSummary {
    pub total: usize,
    /// Final sentiment counts, most frequent first. Absent categories are omitted.
    pub by_sentiment: Vec<CategoryCount>,
    pub text_selected: usize,
    pub emoji_selected: usize,
}

impl SentimentSummary {
    #[must_use]
    pub fn count(&self, sentiment: SentimentCategory) -> usize {
        self.by_sentiment
            .iter()
            .find(|c| c.sentiment == sentiment)
            .map_or(0, |c| c.count)
    }
}

#[must_use]
pub fn summarize(records: &[EnrichedRecord]) -> SentimentSummary {
    let mut counts: HashMap<SentimentCategory, usize> = HashMap::new();
    let mut emoji_selected = 0;

    for record in records {
        *counts.entry(record.enrichment.final_sentiment).or_default() += 1;
        if record.enrichment.selected_model == SelectedModel::Emoji {
            emoji_selected += 1;
        }
    }

    let mut by_sentiment: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(sentiment, count)| CategoryCount { sentiment, count })
        .collect();
    by_sentiment.sort_by(|a, b| b.count.cmp(&a.count).then(a.sentiment.cmp(&b.sentiment)));

    SentimentSummary {
        total: records.len(),
        by_sentiment,
        text_selected: records.len() - emoji_selected,
        emoji_selected,
    }
}

/// File name for a report generated at `at`, e.g.
/// `relatorio_sentimento_14-03-2025_09-30.md`.
#[must_use]
pub fn report_file_name(at: NaiveDateTime) -> String {
    format!("relatorio_sentimento_{}.md", at.format("%d-%m-%Y_%H-%M"))
}

/// Render the summary as a Markdown report.
#[must_use]
pub fn render_markdown(summary: &SentimentSummary, generated_at: NaiveDateTime) -> String {
    let mut out = String::from("# Relatório de análise de sentimento\n\n");
    out.push_str(&format!(
        "**Gerado em**: {}\n",
        generated_at.format("%d/%m/%Y %H:%M")
    ));
    out.push_str(&format!(
        "**Total de avaliações analisadas**: {}\n\n",
        summary.total
    ));
    out.push_str("---\n\n");

    out.push_str("| Sentimento | Contagem |\n");
    out.push_str("|------------|----------|\n");
    for row in &summary.by_sentiment {
        out.push_str(&format!("| {} | {} |\n", row.sentiment, row.count));
    }

    out.push_str("\n| Modelo escolhido | Contagem |\n");
    out.push_str("|------------------|----------|\n");
    out.push_str(&format!(
        "| {} | {} |\n",
        SelectedModel::Text,
        summary.text_selected
    ));
    out.push_str(&format!(
        "| {} | {} |\n",
        SelectedModel::Emoji,
        summary.emoji_selected
    ));

    out
}
