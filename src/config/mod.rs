// ABOUTME: Configuration management module for plan generation settings
// ABOUTME: Re-exports the environment-driven plan forge configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module for the Pierre plan forge
//!
//! All settings come from environment variables, read once at startup by
//! [`PlanForgeConfig::from_env`].

/// Environment configuration
pub mod environment;

pub use environment::PlanForgeConfig;
