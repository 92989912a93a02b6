// ABOUTME: Normalizes raw model output into a candidate JSON span
// ABOUTME: Strips code fences and surrounding prose, trailing commas, and single quotes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Content Sanitizer
//!
//! Deterministic, side-effect-free normalization applied once per generation
//! attempt:
//!
//! 1. Remove code fence markers (any language tag, any case) and trim.
//! 2. Slice from the first `{` to the last `}` when the last one follows the first.
//! 3. Otherwise, when an opening brace exists, keep everything from it to the
//!    end of the text so a truncated document loses only its leading prose.
//!    This departs from a plain greedy `{...}` match, which would find nothing
//!    here and pass the trimmed text through unchanged.
//! 4. Drop commas directly followed (ignoring whitespace) by `}` or `]`.
//! 5. Replace every `'` with `"`.
//!
//! Step 5 is a known-unsafe blanket transform: an apostrophe inside a text
//! value becomes a quote and breaks that value. The prompt tells the model not
//! to use single quotes, and the repair engine gets a chance at the damage.
//! Step 4 does not look at string boundaries either.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    // ```json, ```JSON, ```js, bare ```
    Regex::new(r"(?i)```[a-z0-9_+.\-]*\s*").ok()
});

static TRAILING_COMMA_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r",(?:\s*,)*(\s*[}\]])").ok());

/// Output normalizer for generated documents
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentSanitizer;

impl ContentSanitizer {
    /// Normalize raw service output into a best-effort candidate span.
    ///
    /// The result is not guaranteed to parse.
    #[must_use]
    pub fn sanitize(raw: &str) -> String {
        let unfenced = strip_fences(raw);
        let span = brace_span(unfenced.trim());
        let without_commas = strip_trailing_commas(span);
        without_commas.replace('\'', "\"")
    }
}

fn strip_fences(text: &str) -> String {
    FENCE_PATTERN.as_ref().map_or_else(
        || text.replace("```", ""),
        |pattern| pattern.replace_all(text, "").into_owned(),
    )
}

fn brace_span(text: &str) -> &str {
    match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if end > start => &text[start..=end],
        (Some(start), _) => &text[start..],
        _ => text,
    }
}

fn strip_trailing_commas(text: &str) -> String {
    TRAILING_COMMA_PATTERN.as_ref().map_or_else(
        || text.to_owned(),
        |pattern| pattern.replace_all(text, "$1").into_owned(),
    )
}
