//! Ollama providers for embeddings and chat-based generation.
//!
//! This module is only available when the `ollama` feature is enabled.
//! Both providers talk to a local Ollama server over HTTP using `reqwest`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::generation::GenerationProvider;

/// The default base URL of a local Ollama server.
const DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// The default model for Ollama embeddings.
const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// The default model for Ollama chat generation.
const DEFAULT_CHAT_MODEL: &str = "gemma3";

/// System message sent with every generation request.
const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the \
     provided context. If the context doesn't contain enough information to answer the question, \
     say so.";

/// An [`EmbeddingProvider`] backed by the Ollama `/api/embeddings` endpoint.
///
/// # Configuration
///
/// - `model` – defaults to `nomic-embed-text`.
/// - `base_url` – defaults to `http://localhost:11434`.
///
/// # Example
///
/// ```rust,ignore
/// use ragkit::ollama::OllamaEmbeddingProvider;
///
/// let provider = OllamaEmbeddingProvider::new().with_model("mxbai-embed-large");
/// let embedding = provider.embed("hello world").await?;
/// ```
pub struct OllamaEmbeddingProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for OllamaEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaEmbeddingProvider {
    /// Create a new provider with the default model and base URL.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
        }
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL of the Ollama server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Older Ollama versions return `embedding`, newer ones may return
/// `embeddings`; accept either.
#[derive(Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    embedding: Vec<f32>,
    #[serde(default)]
    embeddings: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Read an error detail out of a non-success response body.
async fn error_detail(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body)
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(model = %self.model, text_len = text.len(), "requesting embedding");

        let url = format!("{}/api/embeddings", self.base_url);
        let request_body = EmbeddingsRequest { model: &self.model, prompt: text };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(model = %self.model, error = %e, "embedding request failed");
                RagError::Embedding {
                    provider: self.model.clone(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response).await;
            error!(model = %self.model, %status, "embedding API error");
            return Err(RagError::Embedding {
                provider: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embeddings_response: EmbeddingsResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse embedding response");
            RagError::Embedding {
                provider: self.model.clone(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        let vector = if embeddings_response.embedding.is_empty() {
            embeddings_response.embeddings
        } else {
            embeddings_response.embedding
        };

        if vector.is_empty() {
            return Err(RagError::Embedding {
                provider: self.model.clone(),
                message: "no embedding found in response".to_string(),
            });
        }
        Ok(vector)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// A [`GenerationProvider`] backed by the Ollama `/api/chat` endpoint.
///
/// Sends a fixed system message instructing the model to answer only from
/// the provided context, followed by the prompt as the user message.
/// Streaming is disabled; the full answer is returned in one response.
pub struct OllamaGenerationProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl Default for OllamaGenerationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OllamaGenerationProvider {
    /// Create a new provider with the default model and base URL.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_CHAT_MODEL.into(),
        }
    }

    /// Set the chat model name (e.g. `llama3.2`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the base URL of the Ollama server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerationProvider for OllamaGenerationProvider {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "requesting generation");

        let url = format!("{}/api/chat", self.base_url);
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: SYSTEM_PROMPT },
                ChatMessage { role: "user", content: prompt },
            ],
            stream: false,
        };

        let response =
            self.client.post(&url).json(&request_body).send().await.map_err(|e| {
                error!(model = %self.model, error = %e, "chat request failed");
                RagError::Generation {
                    provider: self.model.clone(),
                    message: format!("request failed: {e}"),
                    sources: Vec::new(),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = error_detail(response).await;
            error!(model = %self.model, %status, "chat API error");
            return Err(RagError::Generation {
                provider: self.model.clone(),
                message: format!("API returned {status}: {detail}"),
                sources: Vec::new(),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(model = %self.model, error = %e, "failed to parse chat response");
            RagError::Generation {
                provider: self.model.clone(),
                message: format!("failed to parse response: {e}"),
                sources: Vec::new(),
            }
        })?;

        Ok(chat_response.message.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
