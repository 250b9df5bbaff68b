//! Complaint store command handlers.

use std::path::PathBuf;

use clap::Subcommand;
use soulcare_store::ComplaintStore;

/// Sub-commands available under `complaints`.
#[derive(Debug, Subcommand)]
pub enum ComplaintsCommands {
    /// List stored complaints, newest first
    List {
        /// Show at most this many complaints
        #[arg(long)]
        limit: Option<usize>,

        /// Complaint store file
        #[arg(long, env = "SOULCARE_DATA_FILE", default_value = "./complaints.json")]
        data_file: PathBuf,
    },
}

pub(crate) async fn run(command: ComplaintsCommands) -> anyhow::Result<()> {
    match command {
        ComplaintsCommands::List { limit, data_file } => list(data_file, limit).await,
    }
}

async fn list(data_file: PathBuf, limit: Option<usize>) -> anyhow::Result<()> {
    let store = ComplaintStore::new(data_file);
    let complaints = store.list_recent().await;

    if complaints.is_empty() {
        println!("no complaints stored in {}", store.path().display());
        return Ok(());
    }

    let shown = limit.unwrap_or(complaints.len());
    for complaint in complaints.iter().take(shown) {
        println!(
            "{}  {:<24} {}",
            complaint.created_at.format("%d-%m-%Y %H:%M"),
            complaint.name,
            complaint.description
        );
    }
    println!(
        "{} of {} complaints shown",
        shown.min(complaints.len()),
        complaints.len()
    );
    Ok(())
}
