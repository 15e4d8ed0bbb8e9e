//! Prompt context, citation sources and snippets built from evidence.

use crate::config::RagConfig;
use crate::rag::merge::EvidenceSet;
use crate::types::{Chunk, Snippet, Source};
use std::collections::BTreeSet;

/// Appended to snippets cut at the length limit.
pub const TRUNCATION_MARKER: char = '…';

/// Everything derived from the evidence set besides the answer itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citations {
    pub context: String,
    pub sources: Vec<Source>,
    pub snippets: Vec<Snippet>,
}

/// Build context, sources and snippets in one pass over the evidence.
pub fn build_citations(evidence: &EvidenceSet, config: &RagConfig) -> Citations {
    Citations {
        context: build_context(evidence),
        sources: build_sources(evidence),
        snippets: build_snippets(evidence, config.max_snippets, config.snippet_chars),
    }
}

fn label(chunk: &Chunk) -> String {
    match chunk.metadata.page_number {
        Some(page) => format!("({} p.{})", chunk.metadata.filename, page),
        None => format!("({} p.?)", chunk.metadata.filename),
    }
}

/// Evidence rendered as `(<filename> p.<page>) <content>` blocks separated by
/// a blank line, in evidence order.
pub fn build_context(evidence: &EvidenceSet) -> String {
    evidence
        .iter()
        .map(|chunk| format!("{} {}", label(chunk), chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Unique `(filename, page)` pairs, sorted by filename then page.
pub fn build_sources(evidence: &EvidenceSet) -> Vec<Source> {
    evidence
        .iter()
        .map(|chunk| Source {
            filename: chunk.metadata.filename.clone(),
            page: chunk.metadata.cited_page(),
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Snippets of the first `max_snippets` evidence entries.
pub fn build_snippets(evidence: &EvidenceSet, max_snippets: usize, max_chars: usize) -> Vec<Snippet> {
    evidence
        .iter()
        .take(max_snippets)
        .map(|chunk| Snippet {
            filename: chunk.metadata.filename.clone(),
            page: chunk.metadata.cited_page(),
            text: truncate_excerpt(&chunk.content, max_chars),
        })
        .collect()
}

/// First `max_chars` characters of `text`, plus the marker if anything was cut.
pub fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let mut excerpt = text[..idx].to_string();
            excerpt.push(TRUNCATION_MARKER);
            excerpt
        }
        None => text.to_string(),
    }
}
