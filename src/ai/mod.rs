//! AI collaborator
//!
//! The AI collaborator judges allergens and diet compatibility for a product
//! and can optionally score it. It sits behind [`ProductAssistant`] so the
//! analyzer does not care whether answers come from an LLM or a stub.

mod client;
mod prompt;

pub use client::{parse_analysis, GptClient};
pub use prompt::{build_prompt, default_response_template, SYSTEM_PROMPT};

use thiserror::Error;

use crate::models::{AiServiceInput, AiServiceOutput};

/// Errors that can occur while talking to the AI collaborator
#[derive(Error, Debug)]
pub enum AiError {
    #[error("API key is required. Set OPENAI_API_KEY environment variable.")]
    MissingApiKey,

    #[error("API request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Empty response received from API")]
    EmptyResponse,

    #[error("Failed to parse API response: {0}")]
    Parse(String),
}

pub type AiResult<T> = Result<T, AiError>;

/// Something that can analyze a product on behalf of a user
pub trait ProductAssistant {
    /// Run one combined allergen / diet (and optionally score) analysis
    fn analyze_product(&self, input: &AiServiceInput) -> AiResult<AiServiceOutput>;
}

impl<T: ProductAssistant + ?Sized> ProductAssistant for &T {
    fn analyze_product(&self, input: &AiServiceInput) -> AiResult<AiServiceOutput> {
        (**self).analyze_product(input)
    }
}

impl<T: ProductAssistant + ?Sized> ProductAssistant for Box<T> {
    fn analyze_product(&self, input: &AiServiceInput) -> AiResult<AiServiceOutput> {
        (**self).analyze_product(input)
    }
}

/// Stand-in used when no AI collaborator is configured; every call fails,
/// so the analyzer falls back and scores locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl ProductAssistant for OfflineAssistant {
    fn analyze_product(&self, _input: &AiServiceInput) -> AiResult<AiServiceOutput> {
        Err(AiError::MissingApiKey)
    }
}
