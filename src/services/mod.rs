// ABOUTME: Service layer composing discovery, generation, and parsing into request lifecycles
// ABOUTME: Provides plan generation and motivational quotes to the request-handling layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Service layer
//!
//! Services are transport-agnostic: the binary, an HTTP handler, or a test
//! drives them the same way.

/// Motivational quote generation
pub mod motivation;

/// Bounded retry plan generation
pub mod plan_generator;

pub use motivation::MotivationService;
pub use plan_generator::{GeneratedPlan, PlanGenerator};
