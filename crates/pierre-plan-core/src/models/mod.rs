// ABOUTME: Core data models for fitness plan generation
// ABOUTME: Re-exports the plan document wire shape and the user profile
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

mod plan;
mod profile;

pub use plan::{DietPlan, Exercise, Macronutrients, Meal, PlanDocument, TipsAndMotivation, WorkoutDay};
pub use profile::UserProfile;
