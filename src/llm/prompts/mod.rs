// ABOUTME: Prompt templates for plan and motivation generation loaded at compile time
// ABOUTME: Renders the user profile ahead of the fixed output contract for the model
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Prompts
//!
//! The fixed parts of each prompt live in markdown files next to this module
//! and are embedded at compile time. A plan prompt is rendered once per request
//! and reused unchanged by every retry iteration.

use std::fmt::Write;

use crate::models::UserProfile;

/// Output contract appended after the user details: exact JSON shape, strict
/// rules, and the critical formatting instructions
pub const PLAN_FORMAT_INSTRUCTIONS: &str = include_str!("plan_format.md");

/// Complete prompt for one motivational quote
pub const MOTIVATION_PROMPT: &str = include_str!("motivation.md");

/// Render the plan prompt for a user profile
#[must_use]
pub fn plan_prompt(profile: &UserProfile) -> String {
    let mut prompt = String::from(
        "You are an expert fitness coach and nutritionist. \
         Create a short, valid JSON fitness plan for the user below.\n\n\
         User Details:\n",
    );

    // Writing into a String cannot fail
    let _ = writeln!(prompt, "- Name: {}", profile.name);
    let _ = writeln!(prompt, "- Age: {}", profile.age);
    let _ = writeln!(prompt, "- Gender: {}", profile.gender);
    let _ = writeln!(prompt, "- Height: {} cm", profile.height);
    let _ = writeln!(prompt, "- Weight: {} kg", profile.weight);
    let _ = writeln!(prompt, "- Fitness Goal: {}", profile.fitness_goal);
    let _ = writeln!(prompt, "- Fitness Level: {}", profile.fitness_level);
    let _ = writeln!(prompt, "- Workout Location: {}", profile.workout_location);
    let _ = writeln!(
        prompt,
        "- Dietary Preferences: {}",
        profile.dietary_preferences
    );
    if let Some(history) = non_blank(profile.medical_history.as_deref()) {
        let _ = writeln!(prompt, "- Medical History: {history}");
    }
    if let Some(stress) = non_blank(profile.stress_level.as_deref()) {
        let _ = writeln!(prompt, "- Stress Level: {stress}");
    }

    prompt.push('\n');
    prompt.push_str(PLAN_FORMAT_INSTRUCTIONS);
    prompt
}

/// Prompt for a single motivational quote
#[must_use]
pub const fn motivation_prompt() -> &'static str {
    MOTIVATION_PROMPT
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
