//! Runtime settings for the squin engine.
//!
//! Settings are resolved in three layers: built-in defaults, an optional
//! `squin.toml` file, then environment variables (highest precedence). The
//! catalog key and the OpenAI key are deliberately *not* validated here —
//! each collaborator fails fast at its point of use so that, for example, a
//! local-provider run never demands an OpenAI key.

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::ConfigError;

/// Which embedding backend to construct.
///
/// Selected once at construction time; the pipeline never branches on
/// provider strings per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmbeddingProvider {
    /// Local Ollama instance (no API key required).
    #[default]
    Local,
    /// OpenAI embeddings API (requires an API key).
    Remote,
}

impl FromStr for EmbeddingProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" | "ollama" => Ok(Self::Local),
            "remote" | "openai" => Ok(Self::Remote),
            other => Err(ConfigError::UnknownProvider {
                name: other.to_string(),
            }),
        }
    }
}

/// Resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Aladin TTB key for the catalog collaborator.
    pub ttb_key: Option<String>,
    /// Embedding backend selection.
    pub embedding_provider: EmbeddingProvider,
    /// API key for the remote embedding provider.
    pub openai_api_key: Option<String>,
    /// Base URL of the local Ollama instance.
    pub ollama_url: String,
    /// Embedding model served by Ollama.
    pub ollama_model: String,
    /// Listen address for the `squind` server binary.
    pub listen_addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ttb_key: None,
            embedding_provider: EmbeddingProvider::Local,
            openai_api_key: None,
            ollama_url: "http://localhost:11434".into(),
            ollama_model: "nomic-embed-text".into(),
            listen_addr: "127.0.0.1:8000".into(),
        }
    }
}

/// On-disk shape of `squin.toml`. All keys optional.
#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    ttb_key: Option<String>,
    embedding_provider: Option<String>,
    openai_api_key: Option<String>,
    ollama_url: Option<String>,
    ollama_model: Option<String>,
    listen_addr: Option<String>,
}

impl Settings {
    /// Resolve settings from defaults, an optional TOML file, and the
    /// environment.
    ///
    /// When `path` is `None`, `./squin.toml` is used if it exists; a missing
    /// default file is not an error, but an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = Self::default();

        let file = match path {
            Some(p) => Some(Self::read_file(p)?),
            None => {
                let default = Path::new("squin.toml");
                if default.is_file() {
                    Some(Self::read_file(default)?)
                } else {
                    None
                }
            }
        };

        if let Some(file) = file {
            if let Some(key) = file.ttb_key {
                settings.ttb_key = Some(key);
            }
            if let Some(name) = file.embedding_provider {
                settings.embedding_provider = name.parse()?;
            }
            if let Some(key) = file.openai_api_key {
                settings.openai_api_key = Some(key);
            }
            if let Some(url) = file.ollama_url {
                settings.ollama_url = url;
            }
            if let Some(model) = file.ollama_model {
                settings.ollama_model = model;
            }
            if let Some(addr) = file.listen_addr {
                settings.listen_addr = addr;
            }
        }

        settings.apply_env()?;
        Ok(settings)
    }

    /// Resolve settings from defaults and the environment only.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    fn read_file(path: &Path) -> Result<FileSettings, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Ok(key) = std::env::var("SQUIN_TTB_KEY") {
            if !key.is_empty() {
                self.ttb_key = Some(key);
            }
        }
        if let Ok(name) = std::env::var("SQUIN_EMBEDDING_PROVIDER") {
            if !name.is_empty() {
                self.embedding_provider = name.parse()?;
            }
        }
        if let Ok(key) = std::env::var("SQUIN_OPENAI_API_KEY") {
            if !key.is_empty() {
                self.openai_api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("SQUIN_OLLAMA_URL") {
            if !url.is_empty() {
                self.ollama_url = url;
            }
        }
        if let Ok(model) = std::env::var("SQUIN_OLLAMA_MODEL") {
            if !model.is_empty() {
                self.ollama_model = model;
            }
        }
        if let Ok(addr) = std::env::var("SQUIN_LISTEN_ADDR") {
            if !addr.is_empty() {
                self.listen_addr = addr;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_parses_aliases() {
        assert_eq!(
            "local".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::Local
        );
        assert_eq!(
            "OpenAI".parse::<EmbeddingProvider>().unwrap(),
            EmbeddingProvider::Remote
        );
        assert!("sbert".parse::<EmbeddingProvider>().is_err());
    }

    #[test]
    fn toml_overlay_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("squin.toml");
        std::fs::write(
            &path,
            "ttb_key = \"ttb-test\"\nembedding_provider = \"remote\"\nollama_model = \"bge-m3\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.ttb_key.as_deref(), Some("ttb-test"));
        assert_eq!(settings.embedding_provider, EmbeddingProvider::Remote);
        assert_eq!(settings.ollama_model, "bge-m3");
        // untouched key keeps its default
        assert_eq!(settings.ollama_url, "http://localhost:11434");
    }

    #[test]
    fn named_config_file_must_exist() {
        let dir = tempfile::TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load(Some(&missing)),
            Err(ConfigError::Read { .. })
        ));
    }
}
