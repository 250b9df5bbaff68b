mod analysis;
mod complaints;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::complaints::ComplaintsCommands;

const DEFAULT_PAGE_URL: &str = "http://127.0.0.1:5000/complaints";
const DEFAULT_QUOTES_PATH: &str = "analise/quotes.csv";
const DEFAULT_ANALYSIS_PATH: &str = "analise/analise.csv";

#[derive(Debug, Parser)]
#[command(name = "soulcare-cli")]
#[command(about = "Soulcare complaint sentiment command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the complaint listing page into a delimited dataset
    Scrape {
        /// Complaint listing page to scrape
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        url: String,

        /// Where to write the `Autor,Texto` dataset
        #[arg(long, default_value = DEFAULT_QUOTES_PATH)]
        output: PathBuf,
    },
    /// Score a dataset with both models and write the enriched dataset and report
    Analyze {
        /// Delimited dataset with a free-text column
        #[arg(long, default_value = DEFAULT_QUOTES_PATH)]
        input: PathBuf,

        /// Where to write the enriched dataset
        #[arg(long, default_value = DEFAULT_ANALYSIS_PATH)]
        output: PathBuf,

        /// Directory for the Markdown report
        #[arg(long, default_value = ".")]
        report_dir: PathBuf,
    },
    /// Scrape, then analyze
    Run {
        #[arg(long, default_value = DEFAULT_PAGE_URL)]
        url: String,

        /// Where to write the enriched dataset
        #[arg(long, default_value = DEFAULT_ANALYSIS_PATH)]
        output: PathBuf,

        /// Directory for the Markdown report
        #[arg(long, default_value = ".")]
        report_dir: PathBuf,
    },
    /// Inspect the complaint store
    Complaints {
        #[command(subcommand)]
        command: ComplaintsCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let log_level = std::env::var("SOULCARE_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape { url, output }) => analysis::run_scrape(&url, &output).await,
        Some(Commands::Analyze {
            input,
            output,
            report_dir,
        }) => analysis::run_analyze(&input, &output, &report_dir).await,
        Some(Commands::Run {
            url,
            output,
            report_dir,
        }) => analysis::run_scrape_and_analyze(&url, &output, &report_dir).await,
        Some(Commands::Complaints { command }) => complaints::run(command).await,
        None => {
            println!("soulcare-cli: run with --help to list commands");
            Ok(())
        }
    }
}
