//! Local-model embedder backed by an Ollama instance.

use std::time::Duration;

use crate::error::EmbedError;

use super::{Embedder, l2_normalize};

/// Configuration for the Ollama embedder.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Embedding model name.
    pub model: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "nomic-embed-text".into(),
            timeout_secs: 120,
        }
    }
}

/// Embedder speaking Ollama's `/api/embeddings` endpoint.
pub struct OllamaEmbedder {
    config: OllamaConfig,
}

impl OllamaEmbedder {
    pub fn new(config: OllamaConfig) -> Self {
        Self { config }
    }

    /// Probe the server with a lightweight `/api/tags` request.
    pub fn probe(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(5))
            .build();
        matches!(agent.get(&url).call(), Ok(resp) if resp.status() == 200)
    }

    fn embed_one(&self, agent: &ureq::Agent, text: &str) -> Result<Vec<f32>, EmbedError> {
        let url = format!("{}/api/embeddings", self.config.base_url);
        let body = serde_json::json!({
            "model": self.config.model,
            "prompt": text,
        });

        let response = agent
            .post(&url)
            .set("Content-Type", "application/json")
            .send_string(&body.to_string())
            .map_err(|e| match e {
                ureq::Error::Status(status, _) => EmbedError::RequestFailed {
                    message: format!("HTTP {status} from {url}"),
                },
                ureq::Error::Transport(_) => EmbedError::Unavailable {
                    url: self.config.base_url.clone(),
                },
            })?;

        let json: serde_json::Value = response.into_json().map_err(|e| EmbedError::ParseError {
            message: e.to_string(),
        })?;

        let mut vec: Vec<f32> = json["embedding"]
            .as_array()
            .ok_or_else(|| EmbedError::ParseError {
                message: "missing 'embedding' field".into(),
            })?
            .iter()
            .map(|v| v.as_f64().unwrap_or(0.0) as f32)
            .collect();

        l2_normalize(&mut vec);
        Ok(vec)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .build();

        tracing::debug!(
            count = texts.len(),
            model = %self.config.model,
            "embedding batch via ollama"
        );

        texts.iter().map(|t| self.embed_one(&agent, t)).collect()
    }
}
