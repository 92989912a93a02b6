// ABOUTME: Builds parse diagnostics from serde_json errors on sanitized spans
// ABOUTME: Converts line/column to a byte offset and classifies the failure for repair selection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::errors::{DiagnosticKind, ParseDiagnostic};

use super::scan::{scan, scan_prefix};

/// Describe why `text` failed to parse
#[must_use]
pub fn diagnose(text: &str, error: &serde_json::Error) -> ParseDiagnostic {
    let offset = byte_offset(text, error.line(), error.column());
    let message = error.to_string();
    let kind = classify(text, &message, offset);

    ParseDiagnostic::new(message, offset, kind)
}

/// Byte offset just past the character at `line`/`column` (both 1-based)
fn byte_offset(text: &str, line: usize, column: usize) -> Option<usize> {
    if line == 0 {
        return None;
    }

    let line_start = if line == 1 {
        0
    } else {
        text.match_indices('\n')
            .nth(line - 2)
            .map_or(text.len(), |(index, _)| index + 1)
    };

    Some((line_start + column).min(text.len()))
}

fn classify(text: &str, message: &str, offset: Option<usize>) -> DiagnosticKind {
    if message.contains("EOF while parsing a string") || scan(text).unterminated_string.is_some() {
        return DiagnosticKind::UnterminatedString;
    }

    if message.contains("expected `,` or `]`") || message.contains("EOF while parsing a list") {
        return DiagnosticKind::IncompleteArrayElement;
    }

    match offset {
        Some(offset) if scan_prefix(text, offset).inside_open_array() => {
            DiagnosticKind::IncompleteArrayElement
        }
        _ => DiagnosticKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnose_str(text: &str) -> ParseDiagnostic {
        match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => unreachable!("{text} unexpectedly parsed as {value}"),
            Err(e) => diagnose(text, &e),
        }
    }

    #[test]
    fn test_unterminated_string() {
        let diagnostic = diagnose_str(r#"{"a":[{"b":"trunc"#);
        assert_eq!(diagnostic.kind, DiagnosticKind::UnterminatedString);
    }

    #[test]
    fn test_incomplete_array_element() {
        let diagnostic = diagnose_str(r#"{"a":[{"b":1},{"c":"#);
        assert_eq!(diagnostic.kind, DiagnosticKind::IncompleteArrayElement);
        assert!(diagnostic.offset.is_some());
    }

    #[test]
    fn test_error_outside_arrays_is_other() {
        let diagnostic = diagnose_str(r#"{"a":1 "b":2}"#);
        assert_eq!(diagnostic.kind, DiagnosticKind::Other);
    }

    #[test]
    fn test_offset_spans_lines() {
        assert_eq!(byte_offset("ab\ncd", 2, 1), Some(4));
        assert_eq!(byte_offset("ab\ncd", 2, 10), Some(5));
        assert_eq!(byte_offset("ab", 0, 0), None);
    }
}
