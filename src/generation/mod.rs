// ABOUTME: Candidate model discovery and per-call model fallback
// ABOUTME: Re-exports the model catalog and the generation orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Generation
//!
//! [`ModelCatalog`] is consulted once per request. [`GenerationOrchestrator`]
//! then walks its candidates for each attempt. The end-to-end retry loop lives
//! in [`crate::services::PlanGenerator`] and stays separate from this per-call
//! fallback loop.

mod catalog;
mod orchestrator;

pub use catalog::{CatalogReport, ModelCandidate, ModelCatalog, ModelId};
pub use orchestrator::{GenerationOrchestrator, GenerationOutcome};

pub(crate) use orchestrator::preview;
