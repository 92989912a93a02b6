// ABOUTME: Integration tests for the content sanitizer
// ABOUTME: Covers fence stripping, prose removal, trailing commas, quote normalization, and idempotence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use pierre_plan_forge::parsing::ContentSanitizer;
use serde_json::{json, Value};

#[test]
fn test_strips_code_fences_with_language_tag() {
    let raw = "```json\n{\"a\": 1}\n```";
    assert_eq!(ContentSanitizer::sanitize(raw), "{\"a\": 1}");
}

#[test]
fn test_fence_tag_is_case_insensitive() {
    let raw = "```JSON\n{\"a\": 1}\n```\n";
    assert_eq!(ContentSanitizer::sanitize(raw), "{\"a\": 1}");
}

#[test]
fn test_drops_prose_around_the_object() {
    let raw = "Here is your personalized plan:\n{\"a\": [1, 2]}\nGood luck with your training!";
    assert_eq!(ContentSanitizer::sanitize(raw), "{\"a\": [1, 2]}");
}

#[test]
fn test_truncated_object_keeps_tail() {
    let raw = "Sure! {\"a\": [1, 2";
    assert_eq!(ContentSanitizer::sanitize(raw), "{\"a\": [1, 2");
}

#[test]
fn test_text_without_braces_is_returned_trimmed() {
    assert_eq!(
        ContentSanitizer::sanitize("  I cannot help with that.  "),
        "I cannot help with that."
    );
}

#[test]
fn test_removes_trailing_commas() {
    let sanitized = ContentSanitizer::sanitize("{\"a\": [1, 2,], \"b\": {\"c\": 3,},}");
    let value: Value = serde_json::from_str(&sanitized).unwrap();
    assert_eq!(value, json!({"a": [1, 2], "b": {"c": 3}}));
}

#[test]
fn test_removes_runs_of_trailing_commas() {
    assert_eq!(ContentSanitizer::sanitize("{\"a\": [1,, ]}"), "{\"a\": [1 ]}");
}

#[test]
fn test_normalizes_single_quotes() {
    let sanitized = ContentSanitizer::sanitize("{'name': 'Squat', 'sets': 3}");
    let value: Value = serde_json::from_str(&sanitized).unwrap();
    assert_eq!(value, json!({"name": "Squat", "sets": 3}));
}

#[test]
fn test_apostrophes_inside_values_are_rewritten_too() {
    // Quote normalization is blind to string context
    let sanitized = ContentSanitizer::sanitize("{\"tip\": \"don't skip warmups\"}");
    assert_eq!(sanitized, "{\"tip\": \"don\"t skip warmups\"}");
    assert!(serde_json::from_str::<Value>(&sanitized).is_err());
}

#[test]
fn test_sanitize_is_idempotent() {
    let inputs = [
        "```json\n{\"a\": [1, 2,],}\n```",
        "Plan below:\n{'x': {'y': [true, false,]}}\nThanks",
        "{\"a\": [1,, ,]}",
        "prefix {\"open\": [1, 2",
        "no structure here",
        "",
    ];

    for input in inputs {
        let once = ContentSanitizer::sanitize(input);
        let twice = ContentSanitizer::sanitize(&once);
        assert_eq!(once, twice, "sanitize not idempotent for {input:?}");
    }
}

#[test]
fn test_fenced_plan_parses_after_sanitizing() {
    let raw = format!("```json\n{}\n```", minimal_plan());
    let sanitized = ContentSanitizer::sanitize(&raw);
    assert!(serde_json::from_str::<Value>(&sanitized).is_ok());
}

fn minimal_plan() -> &'static str {
    r#"{"workoutPlan": [], "dietPlan": {"breakfast": {"name": "Oats"}, "lunch": {"name": "Soup"}, "dinner": {"name": "Rice"}}, "tips": {"tips": [], "motivation": [],}}"#
}
