//! # ragkit
//!
//! Minimal Retrieval-Augmented Generation: an in-memory vector index over
//! embedded documents, a retriever, and a pipeline that grounds a
//! generation call on retrieved context.
//!
//! ## Overview
//!
//! The crate is built around four seams:
//!
//! - [`EmbeddingProvider`] — turns text into a fixed-length `Vec<f32>`
//! - [`VectorIndex`] — stores embedded documents and answers top-k cosine
//!   similarity queries ([`InMemoryVectorIndex`] is the provided backend)
//! - [`Retriever`] — embeds a query and ranks stored documents against it
//! - [`GenerationProvider`] — turns a context-grounded prompt into an answer
//!
//! [`RagPipeline`] ties them together: `setup` embeds and indexes a corpus
//! once, then `query` retrieves context, assembles a prompt, and returns the
//! generated answer together with its sources.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use ragkit::{Document, InMemoryVectorIndex, RagConfig, RagPipeline};
//! use ragkit::ollama::{OllamaEmbeddingProvider, OllamaGenerationProvider};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(OllamaEmbeddingProvider::new()))
//!     .generation_provider(Arc::new(OllamaGenerationProvider::new()))
//!     .index(Arc::new(InMemoryVectorIndex::new()))
//!     .build()?;
//!
//! pipeline.setup(&[
//!     Document::new("a", "Llamas are members of the camelid family."),
//!     Document::new("b", "Llamas can grow as much as 6 feet tall."),
//! ]).await?;
//!
//! let response = pipeline.query("How tall can llamas grow?", 2).await?;
//! println!("{}", response.answer);
//! ```
//!
//! The index is in-memory only; the collection lives for the process and is
//! not persisted. Errors from providers and the index surface to the caller
//! unmodified, with no internal retries.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod inmemory;
#[cfg(feature = "ollama")]
pub mod ollama;
pub mod pipeline;
pub mod retriever;

pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Document, RagResponse, ScoredDocument};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use generation::GenerationProvider;
pub use index::VectorIndex;
pub use inmemory::InMemoryVectorIndex;
#[cfg(feature = "ollama")]
pub use ollama::{OllamaEmbeddingProvider, OllamaGenerationProvider};
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use retriever::Retriever;
