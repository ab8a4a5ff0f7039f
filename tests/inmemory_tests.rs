//! Behavior and property tests for the in-memory vector index.

use proptest::prelude::*;
use ragkit::{Document, InMemoryVectorIndex, RagError, VectorIndex};

#[tokio::test]
async fn search_on_empty_index_fails() {
    let index = InMemoryVectorIndex::new();
    let err = index.search(&[1.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyIndex));
}

#[tokio::test]
async fn search_with_zero_k_is_rejected() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "text"), vec![1.0, 0.0]).await.unwrap();
    let err = index.search(&[1.0, 0.0], 0).await.unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}

#[tokio::test]
async fn mismatched_dimensions_are_rejected_without_mutation() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "first"), vec![1.0, 0.0]).await.unwrap();

    let err = index.add(Document::new("b", "second"), vec![1.0, 0.0, 0.0]).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));

    // The rejected add left the index untouched.
    assert_eq!(index.len().await, 1);
    let results = index.search(&[1.0, 0.0], 10).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document.id, "a");
}

#[tokio::test]
async fn query_vector_with_wrong_dimensions_is_rejected() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "text"), vec![1.0, 0.0]).await.unwrap();
    let err = index.search(&[1.0, 0.0, 0.0], 1).await.unwrap_err();
    assert!(matches!(err, RagError::DimensionMismatch { expected: 2, actual: 3 }));
}

#[tokio::test]
async fn adding_same_id_replaces_instead_of_duplicating() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "old text"), vec![1.0, 0.0]).await.unwrap();
    index.add(Document::new("a", "new text"), vec![0.0, 1.0]).await.unwrap();

    assert_eq!(index.len().await, 1);
    let results = index.search(&[0.0, 1.0], 1).await.unwrap();
    assert_eq!(results[0].document.text, "new text");
}

#[tokio::test]
async fn equal_scores_rank_earlier_insertion_first() {
    let index = InMemoryVectorIndex::new();
    // Same vector for both, so the scores tie exactly.
    index.add(Document::new("first", "inserted first"), vec![0.6, 0.8]).await.unwrap();
    index.add(Document::new("second", "inserted second"), vec![0.6, 0.8]).await.unwrap();

    let results = index.search(&[0.6, 0.8], 2).await.unwrap();
    assert_eq!(results[0].document.id, "first");
    assert_eq!(results[1].document.id, "second");
}

#[tokio::test]
async fn zero_magnitude_query_scores_zero_not_nan() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "text"), vec![1.0, 2.0]).await.unwrap();

    let results = index.search(&[0.0, 0.0], 1).await.unwrap();
    assert_eq!(results[0].score, 0.0);
    assert!(!results[0].score.is_nan());
}

#[tokio::test]
async fn k_beyond_entry_count_returns_everything() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "one"), vec![1.0, 0.0]).await.unwrap();
    index.add(Document::new("b", "two"), vec![0.0, 1.0]).await.unwrap();

    let results = index.search(&[1.0, 1.0], 10).await.unwrap();
    assert_eq!(results.len(), 2);
}

#[tokio::test]
async fn each_document_retrieves_itself_top_one() {
    let index = InMemoryVectorIndex::new();
    let vectors: Vec<(&str, Vec<f32>)> = vec![
        ("a", vec![1.0, 0.0, 0.0]),
        ("b", vec![0.0, 1.0, 0.0]),
        ("c", vec![0.0, 0.0, 1.0]),
        ("d", vec![0.7, 0.7, 0.1]),
    ];
    for (id, vector) in &vectors {
        index.add(Document::new(*id, format!("doc {id}")), vector.clone()).await.unwrap();
    }

    for (id, vector) in &vectors {
        let results = index.search(vector, 1).await.unwrap();
        assert_eq!(results[0].document.id, *id, "document {id} did not retrieve itself");
    }
}

#[tokio::test]
async fn clear_empties_the_index_and_resets_dimensions() {
    let index = InMemoryVectorIndex::new();
    index.add(Document::new("a", "text"), vec![1.0, 0.0]).await.unwrap();
    index.clear().await.unwrap();

    assert!(index.is_empty().await);
    // A different dimensionality is accepted after the reset.
    index.add(Document::new("b", "other"), vec![1.0, 0.0, 0.0]).await.unwrap();
    assert_eq!(index.len().await, 1);
}

/// Generate a non-zero L2-normalized embedding of the given dimension.
fn arb_normalized_embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    proptest::collection::vec(-1.0f32..1.0f32, dim).prop_filter_map("non-zero embedding", |mut v| {
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm < 1e-8 {
            return None;
        }
        for val in &mut v {
            *val /= norm;
        }
        Some(v)
    })
}

/// Generate a document id/vector pair with a normalized embedding.
fn arb_entry(dim: usize) -> impl Strategy<Value = (String, Vec<f32>)> {
    ("[a-z]{3,8}", arb_normalized_embedding(dim)).prop_map(|(id, embedding)| (id, embedding))
}

mod prop_search_ordering {
    use super::*;

    const DIM: usize = 16;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// For any set of stored embeddings, search results are ordered by
        /// non-increasing score and bounded by both k and the entry count.
        #[test]
        fn results_ordered_descending_and_bounded_by_k(
            entries in proptest::collection::vec(arb_entry(DIM), 1..20),
            query in arb_normalized_embedding(DIM),
            k in 1usize..25,
        ) {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let (results, unique_count) = rt.block_on(async {
                let index = InMemoryVectorIndex::new();
                for (id, vector) in &entries {
                    index
                        .add(Document::new(id.clone(), format!("text for {id}")), vector.clone())
                        .await
                        .unwrap();
                }
                // Duplicate ids replace, so count what actually remains.
                let unique_count = index.len().await;
                let results = index.search(&query, k).await.unwrap();
                (results, unique_count)
            });

            prop_assert!(results.len() <= k);
            prop_assert!(results.len() <= unique_count);

            for window in results.windows(2) {
                prop_assert!(
                    window[0].score >= window[1].score,
                    "results not in descending order: {} < {}",
                    window[0].score,
                    window[1].score,
                );
            }
        }
    }
}
