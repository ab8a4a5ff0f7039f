//! Vector index trait for storing and searching embedded documents.

use async_trait::async_trait;

use crate::document::{Document, ScoredDocument};
use crate::error::Result;

/// A storage backend for one collection of embedded documents with
/// similarity search.
///
/// An index holds `(document, vector)` entries unique by document id. Its
/// dimensionality is established by the first vector added; every later
/// vector must have the same length. Lifecycle: created empty, populated
/// once at setup, queried many times, discarded at process end.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{InMemoryVectorIndex, VectorIndex};
///
/// let index = InMemoryVectorIndex::new();
/// index.add(document, embedding).await?;
/// let results = index.search(&query_embedding, 2).await?;
/// ```
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace the entry keyed by the document's id.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DimensionMismatch`](crate::error::RagError::DimensionMismatch)
    /// if `vector` has a different length than previously stored vectors.
    /// A rejected add leaves the index unchanged.
    async fn add(&self, document: Document, vector: Vec<f32>) -> Result<()>;

    /// Return the `k` entries most similar to `query_vector`, ordered by
    /// descending cosine similarity. Ties are broken by insertion order
    /// (earlier-inserted document wins). If the index holds fewer than `k`
    /// entries, all of them are returned.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyIndex`](crate::error::RagError::EmptyIndex)
    /// if the index has no entries, and
    /// [`RagError::Config`](crate::error::RagError::Config) if `k == 0`.
    async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredDocument>>;

    /// Return the number of entries in the index.
    async fn len(&self) -> usize;

    /// Return `true` if the index holds no entries.
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove every entry, returning the index to its freshly created state.
    ///
    /// Also resets the established dimensionality.
    async fn clear(&self) -> Result<()>;
}
