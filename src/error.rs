//! Rich diagnostic error types for the squin engine.
//!
//! Each collaborator-facing subsystem defines its own error type with miette
//! `#[diagnostic]` derives, providing error codes, help text, and source
//! chains. The interview normalizers and the constraint accumulator are total
//! functions and have no error type at all: malformed answers simply leave
//! the state untouched.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the squin engine.
///
/// Each variant wraps a subsystem-specific error, preserving the full
/// diagnostic chain (error codes, help text, sources) through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SquinError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Embed(#[from] EmbedError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Rank(#[from] RankError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias used across the crate.
pub type SquinResult<T> = std::result::Result<T, SquinError>;

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors from the book-catalog collaborator.
///
/// A successful request that matches nothing returns an empty item list, not
/// an error — these variants all describe a request that could not complete.
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("catalog API key is missing")]
    #[diagnostic(
        code(squin::catalog::missing_key),
        help(
            "Set SQUIN_TTB_KEY (or `ttb_key` in squin.toml) to your Aladin \
             TTB key. Keys are issued at the Aladin open-API portal."
        )
    )]
    MissingKey,

    #[error("catalog request failed: {message}")]
    #[diagnostic(
        code(squin::catalog::transport),
        help("Check network connectivity and that the catalog endpoint is reachable.")
    )]
    Transport { message: String },

    #[error("catalog returned HTTP {status} for {endpoint}")]
    #[diagnostic(
        code(squin::catalog::http),
        help("A non-success status from the catalog usually means an invalid key or a malformed query.")
    )]
    Http { status: u16, endpoint: String },

    #[error("catalog API error: {message}")]
    #[diagnostic(
        code(squin::catalog::api),
        help(
            "The catalog accepted the request but reported an application-level \
             error. Verify the TTB key quota and the request parameters."
        )
    )]
    Api { message: String },

    #[error("failed to decode catalog response: {message}")]
    #[diagnostic(
        code(squin::catalog::decode),
        help("The catalog returned a payload that does not match the expected item schema.")
    )]
    Decode { message: String },
}

// ---------------------------------------------------------------------------
// Embedding errors
// ---------------------------------------------------------------------------

/// Errors from the embedding collaborator.
#[derive(Debug, Error, Diagnostic)]
pub enum EmbedError {
    #[error("OpenAI API key is missing while the remote embedding provider is selected")]
    #[diagnostic(
        code(squin::embed::missing_key),
        help(
            "Set SQUIN_OPENAI_API_KEY, or switch to the local provider with \
             SQUIN_EMBEDDING_PROVIDER=local."
        )
    )]
    MissingKey,

    #[error("embedding provider is not available at {url}")]
    #[diagnostic(
        code(squin::embed::unavailable),
        help("Start Ollama with `ollama serve`, or point SQUIN_OLLAMA_URL at a running instance.")
    )]
    Unavailable { url: String },

    #[error("embedding request failed: {message}")]
    #[diagnostic(
        code(squin::embed::request_failed),
        help("Check that the embedding provider is running and the model is available.")
    )]
    RequestFailed { message: String },

    #[error("failed to parse embedding response: {message}")]
    #[diagnostic(
        code(squin::embed::parse_error),
        help("The provider returned an unexpected response format.")
    )]
    ParseError { message: String },
}

// ---------------------------------------------------------------------------
// Ranking errors
// ---------------------------------------------------------------------------

/// Precondition failures in the reranker.
///
/// Candidate books and candidate vectors must be index-aligned, and every
/// vector must share the narrative vector's dimension.
#[derive(Debug, Error, Diagnostic)]
pub enum RankError {
    #[error("candidate/vector count mismatch: {books} books, {vectors} vectors")]
    #[diagnostic(
        code(squin::rank::index_mismatch),
        help(
            "The reranker requires one embedding per candidate, index-aligned. \
             Embed exactly the texts of the candidate list being ranked."
        )
    )]
    IndexMismatch { books: usize, vectors: usize },

    #[error("embedding dimension mismatch: narrative has {expected}, candidate {index} has {actual}")]
    #[diagnostic(
        code(squin::rank::dim_mismatch),
        help("All vectors in one rerank call must come from the same embedding model.")
    )]
    DimensionMismatch {
        expected: usize,
        actual: usize,
        index: usize,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// Errors loading or interpreting configuration.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(squin::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {message}")]
    #[diagnostic(
        code(squin::config::parse),
        help("squin.toml must be valid TOML; see the documented keys in the README.")
    )]
    Parse { path: String, message: String },

    #[error("unknown embedding provider \"{name}\"")]
    #[diagnostic(
        code(squin::config::provider),
        help("Valid providers are \"local\" (Ollama) and \"remote\" (OpenAI).")
    )]
    UnknownProvider { name: String },
}
