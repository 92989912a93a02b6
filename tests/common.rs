// ABOUTME: Shared test utilities for plan forge integration tests
// ABOUTME: Provides quiet logging, a sample profile, canned plan text, and a scripted generation service
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `pierre_plan_forge`
//!
//! [`ScriptedService`] stands in for the remote generative service: each
//! model gets a queue of canned responses, and every call is recorded so
//! tests can assert exactly which models were tried and in what order.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;

use async_trait::async_trait;
use pierre_plan_forge::errors::ServiceError;
use pierre_plan_forge::llm::{GenerationRequest, ModelDescriptor, TextGenerationService};
use pierre_plan_forge::models::UserProfile;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        // TEST_LOG selects the level; default stays quiet
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// A complete, well-formed plan document as the service would return it
pub const VALID_PLAN: &str = r#"{"workoutPlan":[{"day":"Day 1 - Monday","exercises":[{"name":"Squat","sets":3,"reps":"10","restTime":"60s","description":"Keep back straight"},{"name":"Plank","sets":3,"reps":"30s","restTime":"45s"}],"duration":"45 min"}],"dietPlan":{"breakfast":{"name":"Oats","calories":400},"lunch":{"name":"Lentil bowl","calories":550},"dinner":{"name":"Tofu stir fry","calories":500}},"tips":{"tips":["Sleep 8 hours"],"motivation":["Keep going"],"lifestyleAdvice":["Walk daily","Stretch after work"]}}"#;

/// [`VALID_PLAN`] cut off inside the last lifestyle advice entry
pub fn truncated_plan() -> String {
    let cut = VALID_PLAN.find("Walk daily").unwrap() + "Walk da".len();
    VALID_PLAN[..cut].to_owned()
}

/// A profile with every optional field set
pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Ana".to_owned(),
        age: 29,
        gender: "Female".to_owned(),
        height: 168.0,
        weight: 61.5,
        fitness_goal: "Weight Loss".to_owned(),
        fitness_level: "Beginner".to_owned(),
        workout_location: "Home".to_owned(),
        dietary_preferences: "Vegetarian".to_owned(),
        medical_history: Some("Mild knee pain".to_owned()),
        stress_level: Some("Moderate".to_owned()),
    }
}

type Scripted = Result<String, ServiceError>;

/// Scripted stand-in for a generative text service
pub struct ScriptedService {
    listing: Result<Vec<ModelDescriptor>, ServiceError>,
    responses: Mutex<HashMap<String, VecDeque<Scripted>>>,
    default_error: ServiceError,
    delay: Option<Duration>,
    configured: bool,
    calls: Mutex<Vec<String>>,
    prompts: Mutex<Vec<String>>,
    list_calls: AtomicUsize,
}

impl ScriptedService {
    /// Service with an empty model listing; unscripted models answer "not found"
    pub fn new() -> Self {
        Self {
            listing: Ok(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            default_error: ServiceError::model_not_found("model is not found for API version v1beta")
                .with_status(404),
            delay: None,
            configured: true,
            calls: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            list_calls: AtomicUsize::new(0),
        }
    }

    /// List these identifiers, all generation-capable
    pub fn with_models(mut self, identifiers: &[&str]) -> Self {
        self.listing = Ok(identifiers
            .iter()
            .map(|id| ModelDescriptor::new(*id, true))
            .collect());
        self
    }

    /// List these descriptors as given
    pub fn with_descriptors(mut self, descriptors: Vec<ModelDescriptor>) -> Self {
        self.listing = Ok(descriptors);
        self
    }

    /// Fail the listing call
    pub fn with_listing_error(mut self, error: ServiceError) -> Self {
        self.listing = Err(error);
        self
    }

    /// Error returned once a model's queue is empty
    pub fn with_default_error(mut self, error: ServiceError) -> Self {
        self.default_error = error;
        self
    }

    /// Sleep before answering each generation call
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Report no credential
    pub const fn unconfigured(mut self) -> Self {
        self.configured = false;
        self
    }

    /// Queue a response for `model`
    pub fn respond(self, model: &str, response: Scripted) -> Self {
        self.responses
            .lock()
            .unwrap()
            .entry(model.to_owned())
            .or_default()
            .push_back(response);
        self
    }

    /// Models called, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    /// Number of listing calls
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

impl Default for ScriptedService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedService {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, ServiceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.listing.clone()
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerationRequest,
    ) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push(model.to_owned());
        self.prompts.lock().unwrap().push(request.prompt.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .responses
            .lock()
            .unwrap()
            .get_mut(model)
            .and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| Err(self.default_error.clone()))
    }
}
