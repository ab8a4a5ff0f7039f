//! In-memory vector index using cosine similarity.
//!
//! This module provides [`InMemoryVectorIndex`], a vector index backed by an
//! insertion-ordered `Vec` protected by a `tokio::sync::RwLock`. It is
//! suitable for development, testing, and small fixed corpora.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{Document, ScoredDocument};
use crate::error::{RagError, Result};
use crate::index::VectorIndex;

/// A document paired with its embedding, owned by the index.
#[derive(Debug, Clone)]
struct IndexEntry {
    document: Document,
    vector: Vec<f32>,
}

#[derive(Debug, Default)]
struct IndexState {
    /// Entries in insertion order. Replacing an entry keeps its position.
    entries: Vec<IndexEntry>,
    /// Document id to position in `entries`.
    positions: HashMap<String, usize>,
}

/// An in-memory vector index using cosine similarity for search.
///
/// Entries are kept in insertion order so that equal-score search results
/// rank the earlier-inserted document first. All operations are async-safe
/// via `tokio::sync::RwLock`: setup writes are exclusive, query reads are
/// concurrent.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::{Document, InMemoryVectorIndex, VectorIndex};
///
/// let index = InMemoryVectorIndex::new();
/// index.add(Document::new("a", "some text"), vec![0.1, 0.9]).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    inner: RwLock<IndexState>,
}

impl InMemoryVectorIndex {
    /// Create a new empty in-memory vector index.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude, keeping the ordering
/// total (never NaN).
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn add(&self, document: Document, vector: Vec<f32>) -> Result<()> {
        let mut state = self.inner.write().await;

        if let Some(first) = state.entries.first() {
            if first.vector.len() != vector.len() {
                return Err(RagError::DimensionMismatch {
                    expected: first.vector.len(),
                    actual: vector.len(),
                });
            }
        }

        if let Some(&position) = state.positions.get(&document.id) {
            state.entries[position] = IndexEntry { document, vector };
        } else {
            let position = state.entries.len();
            state.positions.insert(document.id.clone(), position);
            state.entries.push(IndexEntry { document, vector });
        }
        Ok(())
    }

    async fn search(&self, query_vector: &[f32], k: usize) -> Result<Vec<ScoredDocument>> {
        if k == 0 {
            return Err(RagError::Config("k must be at least 1".to_string()));
        }

        let state = self.inner.read().await;
        if state.entries.is_empty() {
            return Err(RagError::EmptyIndex);
        }

        let expected = state.entries[0].vector.len();
        if query_vector.len() != expected {
            return Err(RagError::DimensionMismatch { expected, actual: query_vector.len() });
        }

        let mut scored: Vec<ScoredDocument> = state
            .entries
            .iter()
            .map(|entry| ScoredDocument {
                document: entry.document.clone(),
                score: cosine_similarity(&entry.vector, query_vector),
            })
            .collect();

        // Stable sort: equal scores keep insertion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }

    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.inner.write().await;
        state.entries.clear();
        state.positions.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::cosine_similarity;

    #[test]
    fn cosine_of_parallel_vectors_is_one() {
        let sim = cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert!((sim - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        let sim = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(sim.abs() < 1e-6);
    }

    #[test]
    fn cosine_with_zero_magnitude_is_zero_not_nan() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]);
        assert_eq!(sim, 0.0);
        assert!(!sim.is_nan());
    }
}
