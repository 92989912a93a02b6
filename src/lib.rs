// ABOUTME: Main library entry point for the Pierre plan forge
// ABOUTME: Turns unreliable generative model output into validated fitness plan documents
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Plan Forge
//!
//! Generates personalized workout and diet plans from a generative text
//! service, and salvages a structured [`models::PlanDocument`] from whatever
//! the service actually returns: truncated output, prose around the document,
//! code fences, or broken containers.
//!
//! ## Architecture
//!
//! - **generation**: model discovery ([`generation::ModelCatalog`]) and
//!   sequential fallback across candidates ([`generation::GenerationOrchestrator`])
//! - **parsing**: output normalization ([`parsing::ContentSanitizer`]) and the
//!   cascading repair engine ([`parsing::StructuralRepair`])
//! - **services**: the bounded retry lifecycle ([`services::PlanGenerator`])
//!   and the motivational quote path ([`services::MotivationService`])
//! - **llm**: the [`llm::TextGenerationService`] seam and its Gemini adapter
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use pierre_plan_forge::config::PlanForgeConfig;
//! use pierre_plan_forge::errors::AppResult;
//! use pierre_plan_forge::llm::GeminiClient;
//! use pierre_plan_forge::models::UserProfile;
//! use pierre_plan_forge::services::PlanGenerator;
//!
//! async fn example(profile: UserProfile) -> AppResult<()> {
//!     let config = PlanForgeConfig::from_env()?;
//!     let client = Arc::new(GeminiClient::from_config(&config)?);
//!     let generator = PlanGenerator::new(client, &config);
//!
//!     let generated = generator.generate_plan(&profile).await?;
//!     println!("{} workout days from {}", generated.plan.workout_plan.len(), generated.model_used);
//!     Ok(())
//! }
//! ```

/// Re-exported foundation types
pub use pierre_plan_core::{constants, errors, models};

/// Environment-driven configuration
pub mod config;

/// Candidate model discovery and per-call fallback
pub mod generation;

/// External text generation service seam and adapters
pub mod llm;

/// Structured logging setup
pub mod logging;

/// Output sanitization, parse diagnostics, and structural repair
pub mod parsing;

/// End-to-end plan and motivation services
pub mod services;
