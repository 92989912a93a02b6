// ABOUTME: Parsing pipeline for generated plan text
// ABOUTME: Sanitization, parse diagnostics, and cascading structural repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Parsing
//!
//! Raw service output goes through [`ContentSanitizer::sanitize`], then a
//! direct typed parse. When that fails, [`diagnose`] describes the failure and
//! [`StructuralRepair::repair`] tries to salvage the span.

mod diagnostic;
mod repair;
mod sanitizer;
mod scan;

pub use diagnostic::diagnose;
pub use repair::{
    bracket_close, close_containers, remove_incomplete_property, truncate_at_error_offset,
    truncate_to_last_complete_record, RepairAttempt, RepairStrategyKind, Repaired,
    StructuralRepair,
};
pub use sanitizer::ContentSanitizer;
