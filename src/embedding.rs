//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend behind a unified async
/// interface. The backing model is fixed at construction time, and the output
/// is deterministic for a given model and input.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::EmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`](crate::error::RagError::Embedding) if
    /// the backing model is unreachable or returns a malformed (empty or
    /// non-numeric) vector.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Return the name of the backing embedding model.
    fn model(&self) -> &str;
}
