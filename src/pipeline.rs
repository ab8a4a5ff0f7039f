//! RAG pipeline orchestrator.
//!
//! The [`RagPipeline`] coordinates the full ingest-and-query workflow by
//! composing an [`EmbeddingProvider`], a [`VectorIndex`], a [`Retriever`],
//! and a [`GenerationProvider`].
//!
//! # Example
//!
//! ```rust,ignore
//! use ragkit::{RagPipeline, RagConfig, InMemoryVectorIndex};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(embedder))
//!     .generation_provider(Arc::new(generator))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .build()?;
//!
//! pipeline.setup(&documents).await?;
//! let response = pipeline.query("What animals are llamas related to?", 2).await?;
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::RagConfig;
use crate::document::{Document, RagResponse, ScoredDocument};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;
use crate::index::VectorIndex;
use crate::retriever::{call_with_timeout, Retriever};

/// The RAG pipeline orchestrator.
///
/// Two-phase lifecycle: [`setup`](RagPipeline::setup) populates the index
/// from a corpus exactly once, then [`query`](RagPipeline::query) may be
/// called any number of times against the completed collection. Construct
/// one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    generation_provider: Arc<dyn GenerationProvider>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: Arc<dyn VectorIndex>,
    retriever: Retriever,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline").field("config", &self.config).finish_non_exhaustive()
    }
}

/// Assemble the generation prompt from the retrieved context and the query.
///
/// Context documents appear in rank order, followed by the question and an
/// instruction to answer only from that context.
fn build_prompt(query: &str, sources: &[ScoredDocument]) -> String {
    let context: Vec<&str> = sources.iter().map(|s| s.document.text.as_str()).collect();
    format!(
        "Context information:\n{}\n\nQuestion: {query}\n\nPlease answer the question based only on the context provided.",
        context.join("\n"),
    )
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the vector index.
    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Populate the index from a corpus: embed each document, then add it.
    ///
    /// Setup runs once per collection. If any embed or add fails, the index
    /// is discarded (cleared) before the error is returned, so a failed
    /// setup never leaves a partially populated, queryable collection.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if the index is already populated, and
    /// propagates [`RagError::Embedding`], [`RagError::DimensionMismatch`],
    /// and [`RagError::ProviderTimeout`] unmodified.
    pub async fn setup(&self, documents: &[Document]) -> Result<()> {
        if !self.index.is_empty().await {
            return Err(RagError::Config(
                "index is already populated; setup requires a fresh collection".to_string(),
            ));
        }

        for document in documents {
            let result = call_with_timeout(
                self.embedding_provider.model(),
                self.config.provider_timeout,
                self.embedding_provider.embed(&document.text),
            )
            .await;

            let vector = match result {
                Ok(vector) => vector,
                Err(e) => {
                    error!(document.id = %document.id, error = %e, "embedding failed during setup");
                    self.discard().await;
                    return Err(e);
                }
            };

            if let Err(e) = self.index.add(document.clone(), vector).await {
                error!(document.id = %document.id, error = %e, "add failed during setup");
                self.discard().await;
                return Err(e);
            }
        }

        info!(document_count = documents.len(), "collection populated");
        Ok(())
    }

    /// Answer a query using the `k` most similar documents as context.
    ///
    /// Retrieves ranked documents, assembles a prompt from their text in
    /// rank order, and calls the generation provider. If retrieval fails, no
    /// generation call is made. If generation fails, the returned
    /// [`RagError::Generation`] carries the retrieved sources for
    /// diagnostics; no answer is fabricated.
    pub async fn query(&self, text: &str, k: usize) -> Result<RagResponse> {
        let sources = self.retriever.retrieve(text, k).await?;

        let prompt = build_prompt(text, &sources);
        debug!(prompt_len = prompt.len(), model = self.generation_provider.model(), "generating answer");

        let result = call_with_timeout(
            self.generation_provider.model(),
            self.config.provider_timeout,
            self.generation_provider.generate(&prompt),
        )
        .await;

        let answer = match result {
            Ok(answer) => answer,
            Err(RagError::Generation { provider, message, .. }) => {
                error!(provider = %provider, "generation failed");
                return Err(RagError::Generation { provider, message, sources });
            }
            Err(e) => return Err(e),
        };

        info!(source_count = sources.len(), "query answered");
        Ok(RagResponse { answer, sources })
    }

    /// Answer a query using the configured default `top_k`.
    pub async fn query_default(&self, text: &str) -> Result<RagResponse> {
        self.query(text, self.config.top_k).await
    }

    async fn discard(&self) {
        if let Err(e) = self.index.clear().await {
            error!(error = %e, "failed to discard partially populated index");
        }
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build) to
/// validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    generation_provider: Option<Arc<dyn GenerationProvider>>,
    index: Option<Arc<dyn VectorIndex>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the generation provider.
    pub fn generation_provider(mut self, provider: Arc<dyn GenerationProvider>) -> Self {
        self.generation_provider = Some(provider);
        self
    }

    /// Set the vector index backend.
    pub fn index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.index = Some(index);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let generation_provider = self
            .generation_provider
            .ok_or_else(|| RagError::Config("generation_provider is required".to_string()))?;
        let index =
            self.index.ok_or_else(|| RagError::Config("index is required".to_string()))?;

        let mut retriever = Retriever::new(Arc::clone(&embedding_provider), Arc::clone(&index));
        if let Some(timeout) = config.provider_timeout {
            retriever = retriever.with_timeout(timeout);
        }

        Ok(RagPipeline { config, embedding_provider, generation_provider, index, retriever })
    }
}

#[cfg(test)]
mod tests {
    use super::build_prompt;
    use crate::document::{Document, ScoredDocument};

    #[test]
    fn prompt_lists_context_in_rank_order_before_question() {
        let sources = vec![
            ScoredDocument { document: Document::new("b", "second fact"), score: 0.9 },
            ScoredDocument { document: Document::new("a", "first fact"), score: 0.4 },
        ];
        let prompt = build_prompt("what is true?", &sources);

        assert!(prompt.starts_with("Context information:\nsecond fact\nfirst fact\n"));
        assert!(prompt.contains("Question: what is true?"));
        assert!(prompt.ends_with("Please answer the question based only on the context provided."));
    }
}
