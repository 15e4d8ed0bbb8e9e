//! Ingest command handler.
//!
//! Runs ingestion only and reports what would be stored per file.

use super::{build_store, collection_id};
use clap::Args;
use docqa_core::{config::AppConfig, AppResult};
use docqa_knowledge::{ingest_files, load_config, IngestReport};
use std::path::PathBuf;

/// Split documents into chunks and report the result
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Document to ingest (PDF, or UTF-8 text with form-feed page breaks)
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Document collection id (default: random UUID)
    #[arg(long)]
    pub collection: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");

        let rag = load_config(&config.workspace)?;
        let store = build_store(config, &rag).await?;
        let collection = collection_id(self.collection.as_deref());

        let report = ingest_files(store.as_ref(), &self.files, &collection, &rag).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", render_report(&report));
        }

        Ok(())
    }
}

fn render_report(report: &IngestReport) -> String {
    let mut out = format!("Collection: {}", report.document_collection_id);
    for file in &report.files {
        out.push_str(&format!(
            "\n  {}: {} pages, {} chunks",
            file.filename, file.pages, file.chunks
        ));
    }
    out.push_str(&format!("\nTotal chunks: {}", report.total_chunks()));
    out
}
