use crate::config::PineconeConfig;
use crate::error::BackendError;
use crate::models::{Chunk, RetrievedChunk};
use crate::traits::VectorIndex;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::sync::OnceCell;

const CONTROL_PLANE: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2025-01";

/// Pinecone caps upsert batches; stay well under the documented limits.
const UPSERT_BATCH: usize = 100;

#[derive(Debug, Clone)]
struct IndexDescription {
    host: String,
    dimension: usize,
}

/// REST client for one Pinecone serverless index. The data-plane host is
/// resolved lazily and cached, so a client built against a missing index
/// fails at first use rather than at construction.
pub struct PineconeStore {
    config: PineconeConfig,
    dimension: usize,
    client: Client,
    host: OnceCell<String>,
}

impl PineconeStore {
    pub fn new(config: PineconeConfig, dimension: usize) -> Self {
        Self {
            config,
            dimension,
            client: Client::new(),
            host: OnceCell::new(),
        }
    }

    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }

    async fn describe_index(&self) -> Result<Option<IndexDescription>, BackendError> {
        let response = self
            .client
            .get(format!("{CONTROL_PLANE}/indexes/{}", self.config.index_name))
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "pinecone".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        parse_index_description(&parsed).map(Some)
    }

    async fn create_index(&self, dimension: usize) -> Result<IndexDescription, BackendError> {
        let response = self
            .client
            .post(format!("{CONTROL_PLANE}/indexes"))
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .json(&json!({
                "name": self.config.index_name,
                "dimension": dimension,
                "metric": "cosine",
                "spec": {
                    "serverless": {
                        "cloud": self.config.cloud,
                        "region": self.config.region,
                    }
                },
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "pinecone".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        parse_index_description(&parsed)
    }

    async fn data_host(&self) -> Result<&str, BackendError> {
        self.host
            .get_or_try_init(|| async {
                match self.describe_index().await? {
                    Some(description) => Ok(description.host),
                    None => Err(BackendError::Request(format!(
                        "index {} does not exist; run the indexing pipeline first",
                        self.config.index_name
                    ))),
                }
            })
            .await
            .map(String::as_str)
    }
}

#[async_trait]
impl VectorIndex for PineconeStore {
    async fn ensure_index(&self, dimension: usize) -> Result<(), BackendError> {
        if dimension != self.dimension {
            return Err(BackendError::DimensionMismatch {
                expected: self.dimension,
                actual: dimension,
            });
        }

        let description = match self.describe_index().await? {
            Some(description) => description,
            None => self.create_index(dimension).await?,
        };

        if description.dimension != dimension {
            return Err(BackendError::DimensionMismatch {
                expected: dimension,
                actual: description.dimension,
            });
        }

        // First writer wins; the host never changes for a given index.
        drop(self.host.set(description.host));
        Ok(())
    }

    async fn upsert(
        &self,
        chunks: &[Chunk],
        embeddings: &[Vec<f32>],
    ) -> Result<usize, BackendError> {
        if chunks.len() != embeddings.len() {
            return Err(BackendError::Request(format!(
                "embedding count {} doesn't match chunk count {}",
                embeddings.len(),
                chunks.len()
            )));
        }
        if chunks.is_empty() {
            return Ok(0);
        }

        let vectors = chunks
            .iter()
            .zip(embeddings.iter())
            .map(|(chunk, embedding)| {
                if embedding.len() != self.dimension {
                    return Err(BackendError::DimensionMismatch {
                        expected: self.dimension,
                        actual: embedding.len(),
                    });
                }
                Ok(upsert_payload(chunk, embedding))
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        let host = self.data_host().await?;
        let mut upserted = 0usize;

        for batch in vectors.chunks(UPSERT_BATCH) {
            let response = self
                .client
                .post(format!("https://{host}/vectors/upsert"))
                .header("Api-Key", &self.config.api_key)
                .header("X-Pinecone-Api-Version", API_VERSION)
                .json(&json!({ "vectors": batch }))
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(BackendError::BackendResponse {
                    backend: "pinecone".to_string(),
                    details: response.status().to_string(),
                });
            }

            let parsed: Value = response.json().await?;
            upserted += parsed
                .pointer("/upsertedCount")
                .and_then(Value::as_u64)
                .unwrap_or(batch.len() as u64) as usize;
        }

        Ok(upserted)
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
    ) -> Result<Vec<RetrievedChunk>, BackendError> {
        if vector.len() != self.dimension {
            return Err(BackendError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }

        let host = self.data_host().await?;
        let response = self
            .client
            .post(format!("https://{host}/query"))
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-Api-Version", API_VERSION)
            .json(&json!({
                "vector": vector,
                "topK": top_k,
                "includeMetadata": true,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::BackendResponse {
                backend: "pinecone".to_string(),
                details: response.status().to_string(),
            });
        }

        let parsed: Value = response.json().await?;
        Ok(parse_query_matches(&parsed))
    }
}

fn upsert_payload(chunk: &Chunk, embedding: &[f32]) -> Value {
    json!({
        "id": chunk.id,
        "values": embedding,
        "metadata": {
            "source": chunk.source,
            "text": chunk.text,
        },
    })
}

fn parse_index_description(value: &Value) -> Result<IndexDescription, BackendError> {
    let host = value
        .pointer("/host")
        .and_then(Value::as_str)
        .ok_or_else(|| BackendError::BackendResponse {
            backend: "pinecone".to_string(),
            details: "index description missing host".to_string(),
        })?;
    let dimension = value
        .pointer("/dimension")
        .and_then(Value::as_u64)
        .ok_or_else(|| BackendError::BackendResponse {
            backend: "pinecone".to_string(),
            details: "index description missing dimension".to_string(),
        })?;

    Ok(IndexDescription {
        host: host.to_string(),
        dimension: dimension as usize,
    })
}

fn parse_query_matches(value: &Value) -> Vec<RetrievedChunk> {
    let matches = value
        .pointer("/matches")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut hits = Vec::new();
    for hit in matches {
        let id = hit
            .pointer("/id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let score = hit.pointer("/score").and_then(Value::as_f64).unwrap_or(0.0);
        let text = hit
            .pointer("/metadata/text")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let source = hit
            .pointer("/metadata/source")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        hits.push(RetrievedChunk {
            id,
            text,
            source,
            score,
        });
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::{parse_index_description, parse_query_matches, upsert_payload};
    use crate::models::Chunk;
    use serde_json::json;

    #[test]
    fn upsert_payload_round_trips_source_and_text() {
        let chunk = Chunk {
            id: "abc123".to_string(),
            text: "Aspirin thins blood.".to_string(),
            source: "/data/gale.pdf".to_string(),
        };

        let payload = upsert_payload(&chunk, &[0.1, 0.2]);

        assert_eq!(payload["id"], "abc123");
        assert_eq!(payload["metadata"]["source"], "/data/gale.pdf");
        assert_eq!(payload["metadata"]["text"], "Aspirin thins blood.");
    }

    #[test]
    fn query_matches_parse_stored_text_and_metadata() {
        let body = json!({
            "matches": [
                {
                    "id": "abc123",
                    "score": 0.92,
                    "metadata": { "source": "/data/gale.pdf", "text": "Aspirin thins blood." }
                },
                {
                    "id": "def456",
                    "score": 0.81,
                    "metadata": { "source": "/data/gale.pdf", "text": "Take with food." }
                }
            ]
        });

        let hits = parse_query_matches(&body);

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "abc123");
        assert_eq!(hits[0].source, "/data/gale.pdf");
        assert_eq!(hits[0].text, "Aspirin thins blood.");
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn empty_match_list_parses_to_no_hits() {
        let hits = parse_query_matches(&json!({ "matches": [] }));
        assert!(hits.is_empty());
    }

    #[test]
    fn index_description_requires_host_and_dimension() {
        let ok = parse_index_description(&json!({
            "name": "medicalchatbot",
            "host": "medicalchatbot-abc.svc.pinecone.io",
            "dimension": 384,
        }))
        .expect("description is complete");
        assert_eq!(ok.host, "medicalchatbot-abc.svc.pinecone.io");
        assert_eq!(ok.dimension, 384);

        let missing = parse_index_description(&json!({ "name": "medicalchatbot" }));
        assert!(missing.is_err());
    }
}
