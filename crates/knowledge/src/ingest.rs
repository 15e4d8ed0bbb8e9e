//! Document ingestion for PDF and plain-text files.
//!
//! PDF pages are extracted one by one; text files separate pages with form
//! feeds. Each page is split into overlapping character-bounded chunks,
//! stamped with collection, filename and page, and handed to the vector store.

use crate::config::RagConfig;
use crate::store::VectorStore;
use crate::types::{Chunk, ChunkMetadata, IngestReport, IngestedFile};
use docqa_core::{AppError, AppResult};
use std::path::{Path, PathBuf};
use text_splitter::{ChunkConfig, TextSplitter};

/// Page separator in extracted document text.
pub const PAGE_BREAK: char = '\x0c';

/// Split document text into 1-based numbered pages, skipping blank pages.
pub fn split_pages(text: &str) -> Vec<(u32, &str)> {
    text.split(PAGE_BREAK)
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(i, page)| (i as u32 + 1, page))
        .collect()
}

/// Split one document into chunks carrying its metadata.
pub fn chunk_document(
    filename: &str,
    text: &str,
    document_collection_id: &str,
    config: &RagConfig,
) -> AppResult<Vec<Chunk>> {
    let chunk_config = ChunkConfig::new(config.chunk_size)
        .with_overlap(config.chunk_overlap)
        .map_err(|e| AppError::Config(format!("Invalid chunking settings: {}", e)))?;
    let splitter = TextSplitter::new(chunk_config);

    let mut chunks = Vec::new();
    for (page, page_text) in split_pages(text) {
        for piece in splitter.chunks(page_text) {
            if piece.trim().is_empty() {
                continue;
            }
            chunks.push(Chunk::new(
                piece,
                ChunkMetadata::new(document_collection_id, filename, Some(page)),
            ));
        }
    }

    tracing::debug!(
        "Split '{}' into {} chunks ({} bytes)",
        filename,
        chunks.len(),
        text.len()
    );
    Ok(chunks)
}

/// Chunk and store one document held in memory.
pub async fn ingest_document(
    store: &dyn VectorStore,
    filename: &str,
    text: &str,
    document_collection_id: &str,
    config: &RagConfig,
) -> AppResult<IngestedFile> {
    let chunks = chunk_document(filename, text, document_collection_id, config)?;
    store.add_chunks(&chunks).await?;

    Ok(IngestedFile {
        filename: filename.to_string(),
        pages: split_pages(text).len() as u32,
        chunks: chunks.len() as u32,
    })
}

/// Extract PDF text page by page, joined with [`PAGE_BREAK`].
pub fn extract_pdf_text(bytes: &[u8]) -> AppResult<String> {
    let document = lopdf::Document::load_mem(bytes)
        .map_err(|e| AppError::Knowledge(format!("Failed to parse PDF: {}", e)))?;

    let mut pages = Vec::new();
    for page_number in document.get_pages().keys() {
        let text = document.extract_text(&[*page_number]).map_err(|e| {
            AppError::Knowledge(format!(
                "Failed to extract text from page {}: {}",
                page_number, e
            ))
        })?;
        pages.push(text);
    }

    tracing::debug!("Extracted text from {} PDF pages", pages.len());
    Ok(pages.join(&PAGE_BREAK.to_string()))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// Read a document as page-separated text.
async fn read_document(path: &Path) -> AppResult<String> {
    let read_error =
        |e: std::io::Error| AppError::Knowledge(format!("Failed to read {:?}: {}", path, e));

    if is_pdf(path) {
        let bytes = tokio::fs::read(path).await.map_err(read_error)?;
        extract_pdf_text(&bytes)
    } else {
        tokio::fs::read_to_string(path).await.map_err(read_error)
    }
}

fn file_name(path: &Path) -> AppResult<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| AppError::Knowledge(format!("Invalid file name: {:?}", path)))
}

/// Read, chunk and store a set of PDF or UTF-8 text files under one collection.
pub async fn ingest_files(
    store: &dyn VectorStore,
    paths: &[PathBuf],
    document_collection_id: &str,
    config: &RagConfig,
) -> AppResult<IngestReport> {
    if paths.is_empty() {
        return Err(AppError::Config("No files provided".to_string()));
    }

    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let filename = file_name(path)?;
        let text = read_document(path).await?;

        let ingested =
            ingest_document(store, filename, &text, document_collection_id, config).await?;
        tracing::info!(
            "Ingested '{}': {} pages, {} chunks",
            ingested.filename,
            ingested.pages,
            ingested.chunks
        );
        files.push(ingested);
    }

    Ok(IngestReport {
        document_collection_id: document_collection_id.to_string(),
        files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::MockProvider;
    use crate::store::{CollectionFilter, InMemoryVectorStore};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn pdf_fixture(pages: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![72.into(), 720.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_split_pages_numbers_from_one() {
        let pages = split_pages("first\x0csecond\x0c\x0cfourth");

        assert_eq!(pages, vec![(1, "first"), (2, "second"), (4, "fourth")]);
    }

    #[test]
    fn test_text_without_page_breaks_is_page_one() {
        assert_eq!(split_pages("only page"), vec![(1, "only page")]);
        assert!(split_pages("  \n ").is_empty());
    }

    #[test]
    fn test_chunks_respect_size_and_metadata() {
        let text = format!("{}\x0c{}", "Alpha sentence. ".repeat(200), "Beta words. ".repeat(10));
        let chunks = chunk_document("doc.txt", &text, "col", &RagConfig::default()).unwrap();

        assert!(chunks.len() > 2);
        assert!(chunks.iter().all(|c| c.content.chars().count() <= 1000));
        assert!(chunks
            .iter()
            .all(|c| c.metadata.document_collection_id == "col" && c.metadata.filename == "doc.txt"));
        assert_eq!(chunks.last().unwrap().metadata.page_number, Some(2));
        assert_eq!(chunks[0].metadata.page_number, Some(1));
    }

    #[test]
    fn test_chunks_overlap() {
        let config = RagConfig {
            chunk_size: 100,
            chunk_overlap: 40,
            ..Default::default()
        };
        let text = (0..60).map(|i| format!("w{:02}", i)).collect::<Vec<_>>().join(" ");
        let chunks = chunk_document("doc.txt", &text, "col", &config).unwrap();

        assert!(chunks.len() >= 2);
        let first_words: Vec<&str> = chunks[0].content.split_whitespace().collect();
        let last_word = first_words.last().unwrap();
        assert!(chunks[1].content.contains(last_word));
    }

    #[test]
    fn test_invalid_overlap_is_config_error() {
        let config = RagConfig {
            chunk_size: 10,
            chunk_overlap: 20,
            ..Default::default()
        };
        let result = chunk_document("doc.txt", "some text", "col", &config);

        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_ingest_files_into_store() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lease.txt");
        std::fs::write(&path, "Rent is due on the first.\x0cDeposit is refunded within 30 days.")
            .unwrap();

        let store = InMemoryVectorStore::new(Arc::new(MockProvider::new(128)));
        let report = ingest_files(&store, &[path], "col-1", &RagConfig::default())
            .await
            .unwrap();

        assert_eq!(report.document_collection_id, "col-1");
        assert_eq!(report.files[0].filename, "lease.txt");
        assert_eq!(report.files[0].pages, 2);
        assert_eq!(report.total_chunks(), 2);

        let results = store
            .similarity_search("deposit refunded", 1, &CollectionFilter::new("col-1"))
            .await
            .unwrap();
        assert_eq!(results[0].metadata.page_number, Some(2));
    }

    #[test]
    fn test_extract_pdf_text_separates_pages() {
        let bytes = pdf_fixture(&["Rent is due on the first.", "Deposit is refunded."]);
        let text = extract_pdf_text(&bytes).unwrap();

        let pages = split_pages(&text);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].0, 1);
        assert!(pages[0].1.contains("Rent is due on the first."));
        assert_eq!(pages[1].0, 2);
        assert!(pages[1].1.contains("Deposit is refunded."));
    }

    #[test]
    fn test_pdf_extension_detection() {
        assert!(is_pdf(Path::new("lease.pdf")));
        assert!(is_pdf(Path::new("LEASE.PDF")));
        assert!(!is_pdf(Path::new("lease.txt")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[tokio::test]
    async fn test_ingest_pdf_keeps_page_numbers() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("lease.pdf");
        std::fs::write(
            &path,
            pdf_fixture(&[
                "Rent is due on the first of each month.",
                "The deposit is refunded within thirty days.",
            ]),
        )
        .unwrap();

        let store = InMemoryVectorStore::new(Arc::new(MockProvider::new(128)));
        let report = ingest_files(&store, &[path], "col-pdf", &RagConfig::default())
            .await
            .unwrap();

        assert_eq!(report.files[0].filename, "lease.pdf");
        assert_eq!(report.files[0].pages, 2);
        assert_eq!(report.total_chunks(), 2);

        let results = store
            .similarity_search("deposit refunded", 1, &CollectionFilter::new("col-pdf"))
            .await
            .unwrap();
        assert_eq!(results[0].metadata.filename, "lease.pdf");
        assert_eq!(results[0].metadata.page_number, Some(2));
        assert!(results[0].content.contains("deposit is refunded"));
    }

    #[tokio::test]
    async fn test_malformed_pdf_is_knowledge_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let store = InMemoryVectorStore::new(Arc::new(MockProvider::new(32)));
        let result = ingest_files(&store, &[path], "col", &RagConfig::default()).await;

        assert!(matches!(result, Err(AppError::Knowledge(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_missing_file_is_knowledge_error() {
        let temp = TempDir::new().unwrap();
        let store = InMemoryVectorStore::new(Arc::new(MockProvider::new(32)));

        let result = ingest_files(
            &store,
            &[temp.path().join("missing.txt")],
            "col",
            &RagConfig::default(),
        )
        .await;

        assert!(matches!(result, Err(AppError::Knowledge(_))));
    }

    #[tokio::test]
    async fn test_no_files_is_config_error() {
        let store = InMemoryVectorStore::new(Arc::new(MockProvider::new(32)));
        let result = ingest_files(&store, &[], "col", &RagConfig::default()).await;

        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
