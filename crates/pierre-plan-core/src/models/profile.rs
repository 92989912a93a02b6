// ABOUTME: User profile the plan is generated for
// ABOUTME: Body metrics, goals, and preferences supplied by the request-handling layer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

/// Input to plan generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,
    /// Age in years
    pub age: u32,
    /// Gender as entered by the user
    pub gender: String,
    /// Height in centimeters
    pub height: f64,
    /// Weight in kilograms
    pub weight: f64,
    /// Goal, e.g. "Weight Loss"
    pub fitness_goal: String,
    /// Experience level, e.g. "Beginner"
    pub fitness_level: String,
    /// Where workouts happen, e.g. "Home"
    pub workout_location: String,
    /// Diet, e.g. "Vegetarian"
    pub dietary_preferences: String,
    /// Relevant medical history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_history: Option<String>,
    /// Self-reported stress level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stress_level: Option<String>,
}
