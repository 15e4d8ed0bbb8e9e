//! Knowledge type definitions.

use serde::{Deserialize, Serialize};

/// Fixed-shape metadata stamped on every chunk at ingestion.
///
/// Unknown keys are rejected so that loosely shaped metadata never reaches
/// the retrieval pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChunkMetadata {
    /// Collection the chunk belongs to (one uploaded document set)
    pub document_collection_id: String,

    /// Original file name of the document
    pub filename: String,

    /// 1-based page number, when the loader knows it
    #[serde(default)]
    pub page_number: Option<u32>,
}

impl ChunkMetadata {
    /// Create metadata for a chunk.
    pub fn new(
        document_collection_id: impl Into<String>,
        filename: impl Into<String>,
        page_number: Option<u32>,
    ) -> Self {
        Self {
            document_collection_id: document_collection_id.into(),
            filename: filename.into(),
            page_number,
        }
    }

    /// Page number as reported in citations; an unknown page is `0`.
    pub fn cited_page(&self) -> u32 {
        self.page_number.unwrap_or(0)
    }
}

/// A unit of evidence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Text content
    pub content: String,

    /// Where the text came from
    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Create a new chunk.
    pub fn new(content: impl Into<String>, metadata: ChunkMetadata) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Copy of this chunk with different content and the same metadata.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: self.metadata.clone(),
        }
    }
}

/// A chunk with the relevance score the vector store assigned to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,

    /// Store-specific similarity; higher is more relevant
    pub score: f32,
}

impl ScoredChunk {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        Self { chunk, score }
    }
}

/// A citation unit, unique by `(filename, page)` within a response.
///
/// Field order gives the derived ordering: filename, then page.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Source {
    pub filename: String,
    pub page: u32,
}

/// An excerpt of a piece of evidence shown alongside the answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub filename: String,
    pub page: u32,

    /// Chunk content, truncated with a marker when it is too long
    pub text: String,
}

/// Fixed answer returned when retrieval finds no evidence.
pub const NO_EVIDENCE_ANSWER: &str = "I don't know. I couldn't find evidence in the document.";

/// The answer to one question, with its citations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResult {
    /// Answer text as produced by the language model
    pub answer: String,

    /// Sorted, deduplicated citations
    pub sources: Vec<Source>,

    /// Excerpts from the leading evidence
    pub snippets: Vec<Snippet>,
}

impl AnswerResult {
    /// The designed non-answer for an empty evidence set.
    pub fn no_evidence() -> Self {
        Self {
            answer: NO_EVIDENCE_ANSWER.to_string(),
            sources: Vec::new(),
            snippets: Vec::new(),
        }
    }

    /// Whether this is the no-evidence fallback.
    pub fn is_no_evidence(&self) -> bool {
        self.answer == NO_EVIDENCE_ANSWER && self.sources.is_empty() && self.snippets.is_empty()
    }
}

/// Per-file outcome of an ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestedFile {
    pub filename: String,
    pub pages: u32,
    pub chunks: u32,
}

/// Outcome of ingesting a set of files into one collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestReport {
    pub document_collection_id: String,
    pub files: Vec<IngestedFile>,
}

impl IngestReport {
    /// Total number of chunks stored.
    pub fn total_chunks(&self) -> u32 {
        self.files.iter().map(|f| f.chunks).sum()
    }
}
