// ABOUTME: Text generation service abstraction for pluggable model backends
// ABOUTME: Defines the listing/generation contract plus request and budget value types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Text Generation Service Interface
//!
//! This module defines the contract an external generative text backend must
//! implement to be driven by the plan pipeline. The credential is bound into
//! the implementing instance when it is constructed, so neither method takes
//! one.
//!
//! ## Key Concepts
//!
//! - **`TextGenerationService`**: async trait for model listing and one-shot generation
//! - **`ModelDescriptor`**: one listed model and whether it can generate content
//! - **`GenerationBudget`**: output token cap and sampling parameters
//! - **`GenerationRequest`**: prompt plus budget, shared by every candidate of one attempt
//!
//! ## Example: Using a Service
//!
//! ```rust,no_run
//! use pierre_plan_forge::llm::{GenerationBudget, GenerationRequest, TextGenerationService};
//!
//! async fn example(service: &dyn TextGenerationService) {
//!     let request = GenerationRequest::new("Give me one squat tip.", GenerationBudget::motivation());
//!     let text = service.generate("gemini-1.5-flash", &request).await;
//! }
//! ```

mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::constants::generation::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
    MOTIVATION_MAX_OUTPUT_TOKENS, MOTIVATION_TEMPERATURE,
};
use crate::errors::ServiceError;

// ============================================================================
// Request Types
// ============================================================================

/// One model as reported by the listing endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Identifier as listed, possibly namespaced (`models/gemini-1.5-flash`)
    pub identifier: String,
    /// Whether the model advertises content generation
    pub supports_generation: bool,
}

impl ModelDescriptor {
    /// Create a descriptor
    #[must_use]
    pub fn new(identifier: impl Into<String>, supports_generation: bool) -> Self {
        Self {
            identifier: identifier.into(),
            supports_generation,
        }
    }
}

/// Output size and sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationBudget {
    /// Maximum number of output tokens
    pub max_output_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling threshold
    pub top_p: Option<f32>,
    /// Top-k sampling cutoff
    pub top_k: Option<u32>,
}

impl GenerationBudget {
    /// Budget used for plan documents
    #[must_use]
    pub const fn plan() -> Self {
        Self {
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: Some(DEFAULT_TOP_P),
            top_k: Some(DEFAULT_TOP_K),
        }
    }

    /// Budget used for a single motivational quote
    #[must_use]
    pub const fn motivation() -> Self {
        Self {
            max_output_tokens: MOTIVATION_MAX_OUTPUT_TOKENS,
            temperature: MOTIVATION_TEMPERATURE,
            top_p: None,
            top_k: None,
        }
    }
}

impl Default for GenerationBudget {
    fn default() -> Self {
        Self::plan()
    }
}

/// Prompt and budget for one generation attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Full prompt text
    pub prompt: String,
    /// Output size and sampling parameters
    pub budget: GenerationBudget,
}

impl GenerationRequest {
    /// Create a request
    #[must_use]
    pub fn new(prompt: impl Into<String>, budget: GenerationBudget) -> Self {
        Self {
            prompt: prompt.into(),
            budget,
        }
    }

    /// Set the output token cap
    #[must_use]
    pub const fn with_max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.budget.max_output_tokens = max_output_tokens;
        self
    }

    /// Set the temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.budget.temperature = temperature;
        self
    }
}

// ============================================================================
// Service Trait
// ============================================================================

/// External generative text backend
///
/// Implementations classify every failure into a [`ServiceError`] so the
/// orchestrator can tell unavailable models from other failures.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Short backend identifier used in logs (e.g., "gemini")
    fn name(&self) -> &'static str;

    /// Whether a credential is bound to this instance
    fn is_configured(&self) -> bool {
        true
    }

    /// List the models visible to the bound credential
    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ServiceError>;

    /// Generate text from `model` for one request
    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError>;
}
