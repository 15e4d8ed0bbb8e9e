//! Retrieval pipeline configuration management.

use crate::embeddings::EmbeddingConfig;
use docqa_core::config::STATE_DIR;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "rag.yaml";

/// Tunables for retrieval, merging, citation and ingestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RagConfig {
    /// Fan-out of the primary (compressed) retriever
    #[serde(default = "default_primary_k")]
    pub primary_k: usize,

    /// Fan-out of the secondary (expanded query) retriever
    #[serde(default = "default_secondary_k")]
    pub secondary_k: usize,

    /// Secondary results must score strictly above this
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f32,

    /// Maximum size of the merged evidence set
    #[serde(default = "default_max_evidence")]
    pub max_evidence: usize,

    /// Number of leading evidence entries turned into snippets
    #[serde(default = "default_max_snippets")]
    pub max_snippets: usize,

    /// Snippet length in characters before the truncation marker
    #[serde(default = "default_snippet_chars")]
    pub snippet_chars: usize,

    /// Content prefix length used in the evidence identity key
    #[serde(default = "default_key_prefix_chars")]
    pub key_prefix_chars: usize,

    /// Ingestion chunk size in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Ingestion chunk overlap in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    #[serde(default)]
    pub embedding: EmbeddingConfig,
}

fn default_primary_k() -> usize {
    12
}

fn default_secondary_k() -> usize {
    8
}

fn default_score_threshold() -> f32 {
    0.2
}

fn default_max_evidence() -> usize {
    8
}

fn default_max_snippets() -> usize {
    4
}

fn default_snippet_chars() -> usize {
    500
}

fn default_key_prefix_chars() -> usize {
    120
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            primary_k: default_primary_k(),
            secondary_k: default_secondary_k(),
            score_threshold: default_score_threshold(),
            max_evidence: default_max_evidence(),
            max_snippets: default_max_snippets(),
            snippet_chars: default_snippet_chars(),
            key_prefix_chars: default_key_prefix_chars(),
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            embedding: EmbeddingConfig::default(),
        }
    }
}

impl RagConfig {
    /// Check that the values describe a usable pipeline.
    pub fn validate(&self) -> AppResult<()> {
        if self.primary_k == 0 || self.secondary_k == 0 {
            return Err(AppError::Config(
                "primaryK and secondaryK must be greater than zero".to_string(),
            ));
        }

        if self.max_evidence == 0 {
            return Err(AppError::Config(
                "maxEvidence must be greater than zero".to_string(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(AppError::Config("chunkSize must be greater than zero".to_string()));
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err(AppError::Config(format!(
                "chunkOverlap ({}) must be smaller than chunkSize ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }

        if self.key_prefix_chars == 0 {
            return Err(AppError::Config(
                "keyPrefixChars must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

/// Load pipeline configuration.
///
/// Reads `.docqa/rag.yaml` under the workspace if it exists, otherwise
/// returns the defaults.
pub fn load_config(workspace: &Path) -> AppResult<RagConfig> {
    let config_path = get_config_path(workspace);

    if !config_path.exists() {
        tracing::debug!("No pipeline config at {:?}, using defaults", config_path);
        return Ok(RagConfig::default());
    }

    let content = fs::read_to_string(&config_path).map_err(|e| {
        AppError::Config(format!("Failed to read config at {:?}: {}", config_path, e))
    })?;

    let config: RagConfig = serde_yaml::from_str(&content).map_err(|e| {
        AppError::Config(format!("Failed to parse config at {:?}: {}", config_path, e))
    })?;

    config.validate()?;

    tracing::debug!("Loaded pipeline config from {:?}", config_path);
    Ok(config)
}

/// Get the path to the pipeline config file.
pub fn get_config_path(workspace: &Path) -> PathBuf {
    workspace.join(STATE_DIR).join(CONFIG_FILE)
}
