//! Model client seams.
//!
//! The pipeline talks to language and vision models through these traits
//! only; any failure behind them is recoverable and triggers the
//! documented fallback path of the caller.

use async_trait::async_trait;
use lexdoc_core::Result;

/// Text generation against a language model.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the given prompts.
    async fn generate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> Result<String>;
}

/// Descriptive-text generation from a vision-capable model.
#[async_trait]
pub trait VisionDescriber: Send + Sync {
    /// Describe an image following the given instructions.
    async fn describe_image(&self, image: &[u8], instructions: &str) -> Result<String>;
}
