//! Remote-API embedder backed by the OpenAI embeddings endpoint.

use std::time::Duration;

use serde::Deserialize;

use crate::error::EmbedError;

use super::{Embedder, l2_normalize};

const ENDPOINT: &str = "https://api.openai.com/v1/embeddings";
const MODEL: &str = "text-embedding-3-large";
const TIMEOUT_SECS: u64 = 60;

/// Embedder speaking the OpenAI embeddings API.
///
/// Construction requires a key — [`super::from_settings`] fails fast before
/// building one without it.
pub struct OpenAiEmbedder {
    api_key: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: ENDPOINT.to_string(),
        }
    }

    /// Override the endpoint (test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Embedder for OpenAiEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build();

        let body = serde_json::json!({
            "model": MODEL,
            "input": texts,
        });

        tracing::debug!(count = texts.len(), model = MODEL, "embedding batch via openai");

        let response = agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("Content-Type", "application/json")
            .send_string(&body.to_string())
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => EmbedError::RequestFailed {
                    message: format!("HTTP {status} from embeddings API"),
                },
                ureq::Error::Transport(t) => EmbedError::RequestFailed {
                    message: t.to_string(),
                },
            })?;

        let parsed: EmbeddingResponse =
            response.into_json().map_err(|e| EmbedError::ParseError {
                message: e.to_string(),
            })?;

        if parsed.data.len() != texts.len() {
            return Err(EmbedError::ParseError {
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    parsed.data.len()
                ),
            });
        }

        // The API may reorder entries; restore input order by index.
        let mut ordered: Vec<Vec<f32>> = vec![Vec::new(); texts.len()];
        for datum in parsed.data {
            let slot = ordered.get_mut(datum.index).ok_or_else(|| {
                EmbedError::ParseError {
                    message: format!("embedding index {} out of range", datum.index),
                }
            })?;
            *slot = datum.embedding;
            l2_normalize(slot);
        }
        Ok(ordered)
    }
}
