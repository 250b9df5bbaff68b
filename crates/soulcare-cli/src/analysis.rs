//! Scrape and analyze command handlers.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use soulcare_sentiment::sources::{fetch_complaint_page, AUTHOR_COLUMN, TEXT_COLUMN};
use soulcare_sentiment::{
    read_csv, render_markdown, report_file_name, write_csv, write_dataset, Analysis, Dataset,
    SentimentConfig, SentimentPipeline, SentimentSummary,
};

const PAGE_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("soulcare-cli/", env!("CARGO_PKG_VERSION"));

/// Fetch the complaint listing page and write its `Autor,Texto` pairs to `output`.
///
/// # Errors
///
/// Returns an error if the page cannot be fetched or the dataset cannot be written.
pub(crate) async fn run_scrape(url: &str, output: &Path) -> anyhow::Result<()> {
    let dataset = scrape(url).await?;

    if dataset.is_empty() {
        println!("no complaints found at {url}");
    }

    write_dataset(output, &dataset)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "scraped {} complaints into {}",
        dataset.len(),
        output.display()
    );
    Ok(())
}

/// Score the dataset at `input` and write the enriched dataset and report.
///
/// # Errors
///
/// Returns an error if configuration is invalid, the input cannot be read,
/// either model fails, or an output cannot be written. Nothing is written on
/// a failed analysis.
pub(crate) async fn run_analyze(
    input: &Path,
    output: &Path,
    report_dir: &Path,
) -> anyhow::Result<()> {
    let config = SentimentConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let dataset = read_csv(input, &config.text_column)
        .with_context(|| format!("failed to read {}", input.display()))?;
    analyze(&config, dataset, output, report_dir).await
}

/// Scrape the listing page, then analyze it in one pass.
///
/// # Errors
///
/// Returns an error if either step fails.
pub(crate) async fn run_scrape_and_analyze(
    url: &str,
    output: &Path,
    report_dir: &Path,
) -> anyhow::Result<()> {
    let mut config = SentimentConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    // Scraped datasets always carry the text under this column.
    config.text_column = TEXT_COLUMN.to_string();

    let dataset = scrape(url).await?;
    analyze(&config, dataset, output, report_dir).await
}

async fn scrape(url: &str) -> anyhow::Result<Dataset> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(PAGE_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    let records = fetch_complaint_page(&client, url).await?;

    Ok(Dataset {
        headers: vec![AUTHOR_COLUMN.to_string(), TEXT_COLUMN.to_string()],
        records,
    })
}

async fn analyze(
    config: &SentimentConfig,
    dataset: Dataset,
    output: &Path,
    report_dir: &Path,
) -> anyhow::Result<()> {
    let pipeline = SentimentPipeline::from_config(config)?;
    let Dataset { headers, records } = dataset;

    let Analysis { records, summary } = pipeline.run(records).await?;

    write_csv(output, &headers, &records)
        .with_context(|| format!("failed to write {}", output.display()))?;

    let now = Local::now().naive_local();
    std::fs::create_dir_all(report_dir)
        .with_context(|| format!("failed to create {}", report_dir.display()))?;
    let report_path = report_dir.join(report_file_name(now));
    std::fs::write(&report_path, render_markdown(&summary, now))
        .with_context(|| format!("failed to write {}", report_path.display()))?;

    print_summary(&summary);
    println!("enriched dataset: {}", output.display());
    println!("report: {}", report_path.display());
    Ok(())
}

fn print_summary(summary: &SentimentSummary) {
    println!("{} records analyzed", summary.total);
    for entry in &summary.by_sentiment {
        println!("  {:<10} {}", entry.sentiment.as_str(), entry.count);
    }
    println!(
        "  model selected: Texto {}, Emoji {}",
        summary.text_selected, summary.emoji_selected
    );
}
