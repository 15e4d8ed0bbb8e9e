//! Merging primary and secondary results into one evidence set.

use crate::types::Chunk;
use std::collections::HashSet;
use std::fmt;

/// Identity of a piece of evidence: filename, page and a content prefix.
///
/// Chunks with the same key are considered the same evidence even when their
/// content differs after the prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EvidenceKey {
    filename: String,
    page_number: Option<u32>,
    prefix: String,
}

impl EvidenceKey {
    /// Key of `chunk`, using the first `prefix_chars` characters of its content.
    pub fn of(chunk: &Chunk, prefix_chars: usize) -> Self {
        Self {
            filename: chunk.metadata.filename.clone(),
            page_number: chunk.metadata.page_number,
            prefix: chunk.content.chars().take(prefix_chars).collect(),
        }
    }
}

impl fmt::Display for EvidenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.page_number {
            Some(page) => write!(f, "{}|{}|{}", self.filename, page, self.prefix),
            None => write!(f, "{}|?|{}", self.filename, self.prefix),
        }
    }
}

/// Ordered, key-unique, size-capped evidence. Only built by [`merge_evidence`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvidenceSet(Vec<Chunk>);

impl EvidenceSet {
    pub fn chunks(&self) -> &[Chunk] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Chunk> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a EvidenceSet {
    type Item = &'a Chunk;
    type IntoIter = std::slice::Iter<'a, Chunk>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Union of primary then secondary chunks, first occurrence of each key wins,
/// capped at `max_evidence`.
pub fn merge_evidence(
    primary: Vec<Chunk>,
    secondary: Vec<Chunk>,
    max_evidence: usize,
    key_prefix_chars: usize,
) -> EvidenceSet {
    let mut seen = HashSet::new();
    let mut merged = Vec::with_capacity(max_evidence.min(primary.len() + secondary.len()));

    for chunk in primary.into_iter().chain(secondary) {
        if merged.len() >= max_evidence {
            break;
        }

        let key = EvidenceKey::of(&chunk, key_prefix_chars);
        if seen.contains(&key) {
            tracing::trace!("Dropping duplicate evidence {}", key);
            continue;
        }
        seen.insert(key);
        merged.push(chunk);
    }

    tracing::info!("Merged evidence: {} chunks", merged.len());
    EvidenceSet(merged)
}
