//! Retriever: embed a query and rank stored documents against it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::document::ScoredDocument;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// Run a provider call, enforcing the configured timeout when one is set.
///
/// An elapsed timeout surfaces as [`RagError::ProviderTimeout`] named after
/// the provider's model.
pub(crate) async fn call_with_timeout<T>(
    provider: &str,
    timeout: Option<Duration>,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result,
            Err(_) => Err(RagError::ProviderTimeout {
                provider: provider.to_string(),
                timeout: limit,
            }),
        },
        None => call.await,
    }
}

/// Orchestrates query embedding and similarity lookup against a
/// [`VectorIndex`], returning ranked documents.
///
/// Errors from the embedding provider and the index propagate unchanged:
/// a single external call failure is not treated as transient, so there are
/// no retries.
pub struct Retriever {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    timeout: Option<Duration>,
}

impl Retriever {
    /// Create a retriever over the given embedding provider and index.
    pub fn new(embedding_provider: Arc<dyn EmbeddingProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { embedding_provider, index, timeout: None }
    }

    /// Apply a timeout to the embedding call made for each query.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Retrieve the `k` documents most similar to `query`.
    ///
    /// Embeds the query, searches the index, and returns the matches in the
    /// index's ranking order.
    ///
    /// # Errors
    ///
    /// Propagates [`RagError::Embedding`], [`RagError::EmptyIndex`], and
    /// [`RagError::ProviderTimeout`] unmodified.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<ScoredDocument>> {
        debug!(query_len = query.len(), k, "embedding query");
        let query_vector = call_with_timeout(
            self.embedding_provider.model(),
            self.timeout,
            self.embedding_provider.embed(query),
        )
        .await?;

        let results = self.index.search(&query_vector, k).await?;
        debug!(result_count = results.len(), "retrieved documents");
        Ok(results)
    }
}
