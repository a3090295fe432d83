use crate::chunking::{split_documents, ChunkingConfig};
use crate::embeddings::Embedder;
use crate::error::IngestError;
use crate::loader::{filter_to_minimal_docs, load_pdf_documents};
use crate::models::IndexingReport;
use crate::traits::VectorIndex;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct IndexingOptions {
    pub chunking: ChunkingConfig,
}

/// One-shot offline pipeline: ensure the remote index exists, then
/// load → filter → split → embed → upsert. Errors are not caught here;
/// any failure aborts the run.
pub async fn run_indexing<E, V>(
    folder: &Path,
    embedder: &E,
    index: &V,
    options: IndexingOptions,
) -> Result<IndexingReport, IngestError>
where
    E: Embedder + Send + Sync,
    V: VectorIndex + Send + Sync,
{
    index.ensure_index(embedder.dimensions()).await?;

    let documents = load_pdf_documents(folder)?;
    let minimal = filter_to_minimal_docs(&documents);
    let chunks = split_documents(&minimal, options.chunking)?;

    let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
    let embeddings = embedder.embed_batch(&texts)?;

    let upserted = index.upsert(&chunks, &embeddings).await?;

    Ok(IndexingReport {
        documents: documents.len(),
        chunks: chunks.len(),
        upserted,
    })
}
