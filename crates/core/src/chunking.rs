use crate::error::IngestError;
use crate::models::{Chunk, Document};
use sha2::{Digest, Sha256};
use std::collections::VecDeque;

pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const DEFAULT_CHUNK_OVERLAP: usize = 20;

/// Boundary preference order: paragraph, line, word, then hard character cuts.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone, Copy)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl ChunkingConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 {
            return Err(IngestError::InvalidChunkConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(IngestError::InvalidChunkConfig(format!(
                "chunk_overlap {} must be smaller than chunk_size {}",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Split `text` into overlapping windows of at most `chunk_size` characters,
/// preferring paragraph, line, and word boundaries before hard cuts.
/// Pieces keep their trailing separators, so joining the windows (after
/// dropping each window's carried-over prefix) reproduces the input exactly.
pub fn split_text(text: &str, config: ChunkingConfig) -> Vec<String> {
    split_recursive(text, &SEPARATORS, config)
}

fn split_recursive(text: &str, separators: &[&str], config: ChunkingConfig) -> Vec<String> {
    let (separator, remaining) = pick_separator(text, separators);
    let mut chunks = Vec::new();
    let mut pending: Vec<String> = Vec::new();

    for piece in split_with_separator(text, separator) {
        if piece.chars().count() < config.chunk_size {
            pending.push(piece);
            continue;
        }

        if !pending.is_empty() {
            chunks.extend(merge_pieces(std::mem::take(&mut pending), config));
        }

        if remaining.is_empty() {
            chunks.extend(hard_split(&piece, config));
        } else {
            chunks.extend(split_recursive(&piece, remaining, config));
        }
    }

    if !pending.is_empty() {
        chunks.extend(merge_pieces(pending, config));
    }

    chunks.retain(|chunk| !chunk.is_empty());
    chunks
}

fn pick_separator<'sep>(
    text: &str,
    separators: &'sep [&'sep str],
) -> (&'sep str, &'sep [&'sep str]) {
    for (index, separator) in separators.iter().enumerate() {
        if separator.is_empty() || text.contains(separator) {
            return (separator, &separators[index + 1..]);
        }
    }
    ("", &[])
}

/// Split on `separator`, keeping the separator attached to the preceding
/// piece so no characters are lost.
fn split_with_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut rest = text;
    while let Some(position) = rest.find(separator) {
        let end = position + separator.len();
        pieces.push(rest[..end].to_string());
        rest = &rest[end..];
    }
    if !rest.is_empty() {
        pieces.push(rest.to_string());
    }
    pieces
}

/// Greedily pack pieces into windows of at most `chunk_size` characters,
/// carrying up to `chunk_overlap` trailing characters into the next window.
fn merge_pieces(pieces: Vec<String>, config: ChunkingConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut window: VecDeque<String> = VecDeque::new();
    let mut window_len = 0usize;

    for piece in pieces {
        let piece_len = piece.chars().count();

        if window_len + piece_len > config.chunk_size && !window.is_empty() {
            chunks.push(window.iter().map(String::as_str).collect::<String>());

            while window_len > config.chunk_overlap
                || (window_len + piece_len > config.chunk_size && window_len > 0)
            {
                match window.pop_front() {
                    Some(front) => window_len -= front.chars().count(),
                    None => break,
                }
            }
        }

        window_len += piece_len;
        window.push_back(piece);
    }

    if !window.is_empty() {
        chunks.push(window.iter().map(String::as_str).collect::<String>());
    }

    chunks
}

/// Last resort for text with no usable boundary at all.
fn hard_split(text: &str, config: ChunkingConfig) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let step = config
        .chunk_size
        .saturating_sub(config.chunk_overlap)
        .max(1);

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + config.chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }
    chunks
}

/// Chunk every document, tagging each chunk with the document's `source`.
pub fn split_documents(
    documents: &[Document],
    config: ChunkingConfig,
) -> Result<Vec<Chunk>, IngestError> {
    config.validate()?;

    let mut chunks = Vec::new();
    for document in documents {
        let source = document.source().unwrap_or_default().to_string();
        for (index, text) in split_text(&document.text, config).into_iter().enumerate() {
            let id = make_chunk_id(&source, index as u64, &text);
            chunks.push(Chunk {
                id,
                text,
                source: source.clone(),
            });
        }
    }
    Ok(chunks)
}

fn make_chunk_id(source: &str, index: u64, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    hasher.update(index.to_le_bytes());
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn distinct_word_text(words: usize) -> String {
        (0..words)
            .map(|index| format!("word{index:04}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stitch chunks back together by dropping each chunk's carried-over
    /// prefix (the longest prefix that is also a suffix of the text so far).
    fn reconstruct(chunks: &[String]) -> String {
        let mut text = chunks.first().cloned().unwrap_or_default();
        for chunk in chunks.iter().skip(1) {
            let mut boundaries: Vec<usize> =
                chunk.char_indices().map(|(index, _)| index).collect();
            boundaries.push(chunk.len());
            let overlap = boundaries
                .into_iter()
                .rev()
                .find(|&end| text.ends_with(&chunk[..end]))
                .unwrap_or(0);
            text.push_str(&chunk[overlap..]);
        }
        text
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = split_text("a short note", ChunkingConfig::default());
        assert_eq!(chunks, vec!["a short note".to_string()]);
    }

    #[test]
    fn defaults_match_the_pipeline_contract() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 20);
    }

    #[test]
    fn every_chunk_respects_the_size_limit() {
        let text = distinct_word_text(400);
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 20,
        };

        for chunk in split_text(&text, config) {
            assert!(chunk.chars().count() <= 100, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn consecutive_chunks_overlap_and_reconstruct_the_text() {
        let text = distinct_word_text(300);
        let config = ChunkingConfig {
            chunk_size: 120,
            chunk_overlap: 30,
        };

        let chunks = split_text(&text, config);
        assert!(chunks.len() > 2);

        for pair in chunks.windows(2) {
            let shared = pair[1]
                .char_indices()
                .map(|(index, _)| index)
                .chain([pair[1].len()])
                .rev()
                .find(|&end| pair[0].ends_with(&pair[1][..end]))
                .unwrap_or(0);
            assert!(shared > 0, "no overlap between consecutive chunks");
        }

        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn zero_overlap_concatenates_exactly() {
        let text = distinct_word_text(200);
        let config = ChunkingConfig {
            chunk_size: 80,
            chunk_overlap: 0,
        };

        let chunks = split_text(&text, config);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let first = distinct_word_text(8);
        let second = distinct_word_text(8).replace("word", "item");
        let text = format!("{first}\n\n{second}");
        let config = ChunkingConfig {
            chunk_size: first.len() + 4,
            chunk_overlap: 0,
        };

        let chunks = split_text(&text, config);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], format!("{first}\n\n"));
        assert_eq!(chunks[1], second);
    }

    #[test]
    fn boundary_free_text_is_hard_cut_with_overlap() {
        let text = "x".repeat(1200);
        let chunks = split_text(&text, ChunkingConfig::default());

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 500);
        assert_eq!(chunks[1].len(), 500);
        assert_eq!(chunks[2].len(), 240);
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 100,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn split_documents_tags_chunks_with_their_source() {
        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), "/data/gale.pdf".to_string());
        let documents = vec![Document::new(distinct_word_text(200), metadata)];
        let config = ChunkingConfig {
            chunk_size: 120,
            chunk_overlap: 20,
        };

        let chunks = split_documents(&documents, config).expect("config is valid");

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(chunk.source, "/data/gale.pdf");
            assert_eq!(chunk.id.len(), 64);
        }
    }

    #[test]
    fn chunk_ids_are_deterministic() {
        let first = make_chunk_id("/data/gale.pdf", 3, "some text");
        let second = make_chunk_id("/data/gale.pdf", 3, "some text");
        let other = make_chunk_id("/data/gale.pdf", 4, "some text");
        assert_eq!(first, second);
        assert_ne!(first, other);
    }
}
