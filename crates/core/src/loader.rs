use crate::error::IngestError;
use crate::extractor::extract_page_texts;
use crate::models::Document;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All `*.pdf` files under `folder`, recursively, in a stable order.
/// The folder itself must exist; a folder without PDFs is simply empty.
pub fn discover_pdf_files(folder: &Path) -> Result<Vec<PathBuf>, IngestError> {
    fs::metadata(folder)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    Ok(files)
}

/// Load every PDF under `folder` as one `Document` per non-blank page,
/// with `source` (file path) and `page` metadata.
pub fn load_pdf_documents(folder: &Path) -> Result<Vec<Document>, IngestError> {
    let mut documents = Vec::new();

    for path in discover_pdf_files(folder)? {
        path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
            IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
        })?;

        let source = path.to_string_lossy().to_string();
        for page in extract_page_texts(&path)? {
            let mut metadata = BTreeMap::new();
            metadata.insert("source".to_string(), source.clone());
            metadata.insert("page".to_string(), page.number.to_string());
            documents.push(Document::new(page.text, metadata));
        }
    }

    Ok(documents)
}

/// Copy the documents, keeping only the `source` metadata key.
/// Content is preserved verbatim; the input is untouched.
pub fn filter_to_minimal_docs(documents: &[Document]) -> Vec<Document> {
    documents
        .iter()
        .map(|document| {
            let mut metadata = BTreeMap::new();
            if let Some(source) = document.source() {
                metadata.insert("source".to_string(), source.to_string());
            }
            Document::new(document.text.clone(), metadata)
        })
        .collect()
}
