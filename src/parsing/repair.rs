// ABOUTME: Cascading structural repair for malformed or truncated JSON spans
// ABOUTME: Four priority-ordered strategies that only trim fragments and append closers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Structural Repair
//!
//! Invoked only after a direct parse of a sanitized span has failed. Each
//! strategy is a pure function from the span (and the parse diagnostic) to an
//! optional repaired text. Strategies run in a fixed order and the first one
//! whose output deserializes into the target type wins.
//!
//! | Order | Strategy                               | Applies when                                    |
//! |-------|----------------------------------------|-------------------------------------------------|
//! | A     | [`bracket_close`]                      | the span does not end inside a string literal   |
//! | B     | [`truncate_to_last_complete_record`]   | a fully formed record can be found              |
//! | C     | [`truncate_at_error_offset`]           | the parser stopped inside an array element      |
//! | D     | [`remove_incomplete_property`]         | the span ends inside a string literal           |
//!
//! Repairs never change a field value. They delete a trailing fragment and
//! append closing characters, so a repaired document can lose data but never
//! gains any.
//!
//! Closers are derived from a string-aware stack of unmatched openers and
//! appended innermost first. Mismatched closers already present in the span
//! are not fixed; such a span fails every strategy.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{DiagnosticKind, ParseDiagnostic};

use super::scan::{scan, scan_prefix};

/// Record terminated by one of the fields the document shape puts last,
/// immediately followed by the record's closing brace
static COMPLETE_RECORD_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r#""(?:description|restTime|duration|calories)"\s*:\s*(?:"(?:[^"\\]|\\.)*"|-?\d[\d.eE+\-]*)\s*\}"#,
    )
    .ok()
});

/// Repair strategies in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairStrategyKind {
    /// A: append missing closers
    BracketClose,
    /// B: truncate after the last fully formed record
    LastCompleteRecord,
    /// C: truncate at the record boundary nearest the parser error
    ErrorOffsetTruncation,
    /// D: drop a dangling key/value pair cut inside a string
    IncompletePropertyRemoval,
}

impl RepairStrategyKind {
    /// All strategies in the order they are tried
    pub const ALL: [Self; 4] = [
        Self::BracketClose,
        Self::LastCompleteRecord,
        Self::ErrorOffsetTruncation,
        Self::IncompletePropertyRemoval,
    ];

    /// Stable label for logs and reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::BracketClose => "bracket_close",
            Self::LastCompleteRecord => "last_complete_record",
            Self::ErrorOffsetTruncation => "error_offset_truncation",
            Self::IncompletePropertyRemoval => "incomplete_property_removal",
        }
    }

    /// Run this strategy on `span`
    #[must_use]
    pub fn apply(self, span: &str, diagnostic: &ParseDiagnostic) -> RepairAttempt {
        match self {
            Self::BracketClose => bracket_close(span),
            Self::LastCompleteRecord => truncate_to_last_complete_record(span),
            Self::ErrorOffsetTruncation => truncate_at_error_offset(span, diagnostic),
            Self::IncompletePropertyRemoval => remove_incomplete_property(span),
        }
    }
}

impl fmt::Display for RepairStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairAttempt {
    /// The strategy produced a candidate text
    Repaired(String),
    /// The strategy's precondition does not hold for this span
    NotApplicable,
}

impl From<Option<String>> for RepairAttempt {
    fn from(text: Option<String>) -> Self {
        text.map_or(Self::NotApplicable, Self::Repaired)
    }
}

/// A successful repair
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired<T> {
    /// Strategy that produced the text
    pub strategy: RepairStrategyKind,
    /// Repaired text
    pub text: String,
    /// Value deserialized from `text`
    pub value: T,
}

/// Cascading repair engine
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralRepair;

impl StructuralRepair {
    /// Try every strategy in order; return the first repair that deserializes into `T`
    #[must_use]
    pub fn repair<T: DeserializeOwned>(
        span: &str,
        diagnostic: &ParseDiagnostic,
    ) -> Option<Repaired<T>> {
        RepairStrategyKind::ALL.into_iter().find_map(|strategy| {
            let RepairAttempt::Repaired(text) = strategy.apply(span, diagnostic) else {
                debug!(strategy = %strategy, "Repair strategy not applicable");
                return None;
            };

            match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    debug!(strategy = %strategy, "Repair strategy succeeded");
                    Some(Repaired {
                        strategy,
                        text,
                        value,
                    })
                }
                Err(e) => {
                    debug!(strategy = %strategy, error = %e, "Repaired text still does not parse");
                    None
                }
            }
        })
    }
}

// ============================================================================
// Shared closing step
// ============================================================================

/// Close every unmatched container of `text`.
///
/// Drops trailing whitespace and dangling commas at the end, appends one
/// closer per unmatched opener (innermost first), then removes any comma left
/// directly before a closer. Returns `None` when `text` ends inside a string
/// literal, where appended closers would land in the literal.
#[must_use]
pub fn close_containers(text: &str) -> Option<String> {
    let trimmed = text.trim_end_matches(|c: char| c == ',' || c.is_whitespace());
    let state = scan(trimmed);

    if state.unterminated_string.is_some() {
        return None;
    }

    let mut closed = String::with_capacity(trimmed.len() + state.open.len());
    closed.push_str(trimmed);
    closed.extend(state.open.iter().rev().map(|opener| opener.kind.closer()));

    Some(strip_commas_before_closers(&closed))
}

/// Remove commas outside strings that are followed (ignoring whitespace) by `}` or `]`
fn strip_commas_before_closers(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut kept = Vec::with_capacity(bytes.len());
    let mut in_string = false;
    let mut escaped = false;

    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
        } else if byte == b'"' {
            in_string = true;
        } else if byte == b',' {
            let next = bytes[i + 1..].iter().find(|b| !b.is_ascii_whitespace());
            if matches!(next, Some(b'}' | b']')) {
                continue;
            }
        }
        kept.push(byte);
    }

    // Only ASCII commas were removed, so the bytes are still valid UTF-8
    String::from_utf8(kept).unwrap_or_else(|_| text.to_owned())
}

// ============================================================================
// Strategies
// ============================================================================

/// Strategy A: apply the closing step to the span as-is
#[must_use]
pub fn bracket_close(span: &str) -> RepairAttempt {
    close_containers(span).into()
}

/// Strategy B: cut after the last fully formed record, then close
#[must_use]
pub fn truncate_to_last_complete_record(span: &str) -> RepairAttempt {
    let Some(pattern) = COMPLETE_RECORD_PATTERN.as_ref() else {
        return RepairAttempt::NotApplicable;
    };

    pattern
        .find_iter(span)
        .last()
        .and_then(|record| close_containers(&span[..record.end()]))
        .into()
}

/// Strategy C: cut at the record boundary nearest before the parser error.
///
/// Only record ends inside an array that is still open at the error offset are
/// considered, and the `}` must be followed by `,` or `]`. Reliable for one
/// level of array nesting; deeper nesting is best effort.
#[must_use]
pub fn truncate_at_error_offset(span: &str, diagnostic: &ParseDiagnostic) -> RepairAttempt {
    let Some(offset) = diagnostic.offset else {
        return RepairAttempt::NotApplicable;
    };
    if diagnostic.kind != DiagnosticKind::IncompleteArrayElement {
        return RepairAttempt::NotApplicable;
    }

    let state = scan_prefix(span, offset);
    let bytes = span.as_bytes();

    state
        .record_ends
        .iter()
        .rev()
        .filter(|end| {
            state
                .open
                .iter()
                .any(|opener| opener.offset == end.array_offset)
        })
        .find(|end| {
            let next = bytes[end.offset + 1..]
                .iter()
                .find(|b| !b.is_ascii_whitespace());
            matches!(next, Some(b',' | b']'))
        })
        .and_then(|end| close_containers(&span[..=end.offset]))
        .into()
}

/// Strategy D: drop the key/value pair cut off inside a string literal, then close.
///
/// Deletes back to the last `,`, `{` or `[` before the dangling literal. A
/// comma is removed with the pair; an opening character is kept.
#[must_use]
pub fn remove_incomplete_property(span: &str) -> RepairAttempt {
    let state = scan(span);
    if state.unterminated_string.is_none() {
        return RepairAttempt::NotApplicable;
    }

    let cut = match state.last_separator {
        Some((offset, b',')) => offset,
        Some((offset, _)) => offset + 1,
        None => return RepairAttempt::NotApplicable,
    };

    close_containers(&span[..cut]).into()
}
