//! The embedding collaborator: text → unit vector.
//!
//! Two backends implement [`Embedder`]: a local Ollama instance (default,
//! no API key) and the OpenAI embeddings API. The backend is chosen once at
//! construction from [`Settings`] — the pipeline never branches on provider
//! names per call.
//!
//! Contract: one vector per input text, L2-normalized, so downstream dot
//! products are cosine similarities.

pub mod ollama;
pub mod openai;

use crate::config::{EmbeddingProvider, Settings};
use crate::error::EmbedError;

pub use ollama::{OllamaConfig, OllamaEmbedder};
pub use openai::OpenAiEmbedder;

/// Text-to-vector collaborator. `Send + Sync` so one backend can serve all
/// server requests.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one unit vector per input.
    ///
    /// An empty batch is a valid no-op returning an empty vec; network and
    /// provider failures surface as [`EmbedError`].
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError>;
}

/// Construct the configured embedding backend.
///
/// Selecting the remote provider without an API key fails fast here.
pub fn from_settings(settings: &Settings) -> Result<Box<dyn Embedder>, EmbedError> {
    match settings.embedding_provider {
        EmbeddingProvider::Local => Ok(Box::new(OllamaEmbedder::new(OllamaConfig {
            base_url: settings.ollama_url.clone(),
            model: settings.ollama_model.clone(),
            ..OllamaConfig::default()
        }))),
        EmbeddingProvider::Remote => {
            let key = settings
                .openai_api_key
                .clone()
                .filter(|k| !k.is_empty())
                .ok_or(EmbedError::MissingKey)?;
            Ok(Box::new(OpenAiEmbedder::new(key)))
        }
    }
}

/// Scale a vector to unit length. Zero vectors are left untouched.
pub(crate) fn l2_normalize(vec: &mut [f32]) {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vec.iter_mut() {
            *x /= norm;
        }
    }
}
