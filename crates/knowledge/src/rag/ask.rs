//! Question answering orchestration.

use crate::config::RagConfig;
use crate::rag::answer::synthesize_answer;
use crate::rag::expand::expand_query;
use crate::rag::extract::{Extractor, LlmExtractor};
use crate::rag::merge::merge_evidence;
use crate::rag::retrieve::{retrieve_compressed, retrieve_expanded};
use crate::rag::sources::build_citations;
use crate::store::{CollectionFilter, VectorStore};
use crate::types::AnswerResult;
use docqa_core::{AppError, AppResult};
use docqa_llm::LlmClient;
use std::sync::Arc;
use tracing::Instrument;

/// Answers questions about one document collection at a time.
///
/// Holds no per-request state; one pipeline can serve concurrent requests.
pub struct RagPipeline {
    store: Arc<dyn VectorStore>,
    llm: Arc<dyn LlmClient>,
    extractor: Arc<dyn Extractor>,
    model: String,
    config: RagConfig,
}

impl RagPipeline {
    pub fn new(
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmClient>,
        extractor: Arc<dyn Extractor>,
        model: impl Into<String>,
        config: RagConfig,
    ) -> Self {
        Self {
            store,
            llm,
            extractor,
            model: model.into(),
            config,
        }
    }

    /// Pipeline whose compression step uses the same model as the other stages.
    pub fn with_llm_extractor(
        store: Arc<dyn VectorStore>,
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        config: RagConfig,
    ) -> Self {
        let model = model.into();
        let extractor = Arc::new(LlmExtractor::new(Arc::clone(&llm), model.clone()));
        Self::new(store, llm, extractor, model, config)
    }

    /// Answer `question` from the chunks of collection `collection_id`.
    ///
    /// The first failing stage aborts the request with its error. An empty
    /// evidence set is not a failure and yields the no-evidence answer.
    pub async fn ask(&self, question: &str, collection_id: &str) -> AppResult<AnswerResult> {
        let span = tracing::info_span!("rag.ask", collection = %collection_id);
        self.run(question, collection_id).instrument(span).await
    }

    async fn run(&self, question: &str, collection_id: &str) -> AppResult<AnswerResult> {
        if question.trim().is_empty() {
            return Err(AppError::Config("No question provided".to_string()));
        }

        tracing::info!("Answering question: {}", question);

        let filter = CollectionFilter::new(collection_id);
        let expanded = expand_query(self.llm.as_ref(), &self.model, question).await?;

        let (primary, secondary) = tokio::try_join!(
            retrieve_compressed(
                self.store.as_ref(),
                self.extractor.as_ref(),
                question,
                &filter,
                self.config.primary_k,
            ),
            retrieve_expanded(
                self.store.as_ref(),
                &expanded,
                &filter,
                self.config.secondary_k,
                self.config.score_threshold,
            ),
        )?;

        let evidence = merge_evidence(
            primary,
            secondary.into_iter().map(|s| s.chunk).collect(),
            self.config.max_evidence,
            self.config.key_prefix_chars,
        );
        let citations = build_citations(&evidence, &self.config);

        synthesize_answer(self.llm.as_ref(), &self.model, question, &evidence, citations).await
    }
}
