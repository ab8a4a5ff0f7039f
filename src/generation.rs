//! Generation provider trait for turning a prompt into natural-language text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates natural-language text from a prompt.
///
/// Treated as a pure function of the prompt string: no conversation state is
/// carried between calls. The backing model is fixed at construction time.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Generation`](crate::error::RagError::Generation)
    /// if the backing model is unreachable or produces no output.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Return the name of the backing generation model.
    fn model(&self) -> &str;
}
