//! Ask command handler.
//!
//! Ingests the given documents into a fresh collection and answers one
//! question from them, with citations.

use super::{build_store, collection_id};
use clap::Args;
use docqa_core::{config::AppConfig, AppError, AppResult};
use docqa_knowledge::{ingest_files, load_config, AnswerResult, RagPipeline};
use docqa_llm::create_client;
use std::path::PathBuf;

/// Answer a question from documents
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Document to answer from (PDF, or UTF-8 text with form-feed page breaks)
    #[arg(short, long = "file", required = true)]
    pub files: Vec<PathBuf>,

    /// Document collection id (default: random UUID)
    #[arg(long)]
    pub collection: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self
            .question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| AppError::Config("No question provided".to_string()))?;

        config.validate()?;
        let rag = load_config(&config.workspace)?;

        let store = build_store(config, &rag).await?;
        let collection = collection_id(self.collection.as_deref());
        let report = ingest_files(store.as_ref(), &self.files, &collection, &rag).await?;
        tracing::info!(
            "Collection '{}' holds {} chunks from {} files",
            collection,
            report.total_chunks(),
            report.files.len()
        );

        let endpoint = config.resolve_endpoint(&config.provider);
        let api_key = config.resolve_api_key(&config.provider);
        let llm = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())?;

        let pipeline = RagPipeline::with_llm_extractor(store, llm, &config.model, rag);
        let result = pipeline.ask(question, &collection).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", render_answer(&result));
        }

        Ok(())
    }
}

/// Plain-text rendering of an answer with its sources and snippets.
fn render_answer(result: &AnswerResult) -> String {
    let mut out = result.answer.trim_end().to_string();

    if !result.sources.is_empty() {
        out.push_str("\n\nSources:");
        for source in &result.sources {
            out.push_str(&format!("\n  - {} p.{}", source.filename, source.page));
        }
    }

    if !result.snippets.is_empty() {
        out.push_str("\n\nSnippets:");
        for snippet in &result.snippets {
            out.push_str(&format!(
                "\n  [{} p.{}] {}",
                snippet.filename,
                snippet.page,
                snippet.text.replace('\n', " ")
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_knowledge::{Snippet, Source};

    #[test]
    fn test_render_no_evidence() {
        let rendered = render_answer(&AnswerResult::no_evidence());

        assert_eq!(
            rendered,
            "I don't know. I couldn't find evidence in the document."
        );
    }

    #[test]
    fn test_render_with_citations() {
        let result = AnswerResult {
            answer: "Rent is due on the 1st.\n".to_string(),
            sources: vec![Source {
                filename: "lease.txt".to_string(),
                page: 2,
            }],
            snippets: vec![Snippet {
                filename: "lease.txt".to_string(),
                page: 2,
                text: "Rent is due\non the 1st.".to_string(),
            }],
        };

        assert_eq!(
            render_answer(&result),
            "Rent is due on the 1st.\n\nSources:\n  - lease.txt p.2\n\nSnippets:\n  [lease.txt p.2] Rent is due on the 1st."
        );
    }
}
