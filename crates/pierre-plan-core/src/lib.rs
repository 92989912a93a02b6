// ABOUTME: Core types and constants for the Pierre plan forge
// ABOUTME: Foundation crate with error taxonomy, plan document models, and generation constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pierre Plan Core
//!
//! Foundation crate providing shared types and constants for fitness plan
//! generation. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode`, the external-service error taxonomy and
//!   the classified errors surfaced by the generation pipeline
//! - **constants**: Generation defaults, fallback model lists, and API endpoints
//! - **models**: The plan document wire shape and the user profile it is built for

/// Unified error handling with standard error codes and pipeline classification
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Plan document, user profile, and generated plan envelope
pub mod models;
