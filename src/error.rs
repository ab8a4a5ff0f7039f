//! Error types for the `ragkit` crate.

use std::time::Duration;

use thiserror::Error;

use crate::document::ScoredDocument;

/// Errors that can occur in RAG operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// The embedding provider was unreachable or returned malformed output.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A vector's length differed from the index's established dimensionality.
    #[error("Dimension mismatch: index holds {expected}-dimensional vectors, got {actual}")]
    DimensionMismatch {
        /// The dimensionality established by the first vector stored.
        expected: usize,
        /// The dimensionality of the rejected vector.
        actual: usize,
    },

    /// A similarity search was run against an index with no entries.
    #[error("Search against an empty index")]
    EmptyIndex,

    /// The generation provider failed.
    ///
    /// When surfaced by [`RagPipeline::query`](crate::pipeline::RagPipeline::query),
    /// `sources` holds the documents retrieved before generation failed, so
    /// callers keep them for diagnostics. Providers raise it with `sources`
    /// empty.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// The retrieval result that preceded the failed generation call.
        sources: Vec<ScoredDocument>,
    },

    /// An external provider call exceeded the configured timeout.
    #[error("Provider '{provider}' timed out after {timeout:?}")]
    ProviderTimeout {
        /// The provider (model name) whose call timed out.
        provider: String,
        /// The configured timeout that elapsed.
        timeout: Duration,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
