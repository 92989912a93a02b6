// ABOUTME: Plan document wire shape produced by the generation pipeline
// ABOUTME: Workout days, diet plan, and tips, deserialized from repaired model output
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Document
//!
//! A `PlanDocument` is only ever built by deserializing text that parsed as a
//! well-formed structured value of exactly this shape. Required fields stay
//! required: a repaired document that lost one fails to deserialize rather than
//! being filled with invented values.

use serde::{Deserialize, Deserializer, Serialize};

/// The complete generated plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDocument {
    /// Ordered workout days
    pub workout_plan: Vec<WorkoutDay>,
    /// Meals for a typical day
    pub diet_plan: DietPlan,
    /// Tips, motivation, and lifestyle advice
    pub tips: TipsAndMotivation,
}

/// One day of the workout schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutDay {
    /// Day label, e.g. "Day 1 - Monday"
    pub day: String,
    /// Exercises in the order they should be performed
    pub exercises: Vec<Exercise>,
    /// Session length label, e.g. "45 min"
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_optional_text"
    )]
    pub duration: Option<String>,
    /// Free-form notes for the day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A single exercise record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    /// Exercise name
    pub name: String,
    /// Number of sets
    pub sets: u32,
    /// Repetition spec, e.g. "10-12"
    #[serde(deserialize_with = "lenient_text")]
    pub reps: String,
    /// Rest between sets, e.g. "60s"
    #[serde(deserialize_with = "lenient_text")]
    pub rest_time: String,
    /// Short coaching cue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Meals for one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    /// Breakfast
    pub breakfast: Meal,
    /// Lunch
    pub lunch: Meal,
    /// Dinner
    pub dinner: Meal,
    /// Optional snacks in order
    #[serde(default)]
    pub snacks: Vec<Meal>,
}

/// One meal or snack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// Meal name
    pub name: String,
    /// Approximate calories
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Macro breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macronutrients: Option<Macronutrients>,
    /// Preparation or content notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Macro breakdown of a meal, as free-form amounts ("30g")
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Macronutrients {
    /// Protein amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<String>,
    /// Carbohydrate amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<String>,
    /// Fat amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<String>,
}

/// Tips section of the plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsAndMotivation {
    /// Practical tips
    pub tips: Vec<String>,
    /// Motivational lines
    pub motivation: Vec<String>,
    /// Lifestyle advice
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle_advice: Option<Vec<String>>,
}

impl PlanDocument {
    /// Total number of exercises across all workout days
    #[must_use]
    pub fn exercise_count(&self) -> usize {
        self.workout_plan.iter().map(|day| day.exercises.len()).sum()
    }
}

/// Text field the service sometimes emits as a bare number (`"reps": 10`)
#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
