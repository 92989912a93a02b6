// ABOUTME: End-to-end plan generation with a bounded retry loop
// ABOUTME: Composes catalog, orchestrator, sanitizer, and last-chance structural repair
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Plan Generator
//!
//! One call runs at most `max_retries` generation+parse cycles:
//!
//! ```text
//! SelectingModel -> Generating -> Sanitizing -> Parsing -> Success
//!                                                  |
//!                                   final attempt? +-> Repairing -> Success | ParseFailure
//!                                                  |
//!                                    otherwise ----+-> SelectingModel (next attempt)
//! ```
//!
//! The catalog is consulted once per call and the prompt is identical across
//! attempts. When every candidate model fails, the loop stops at once: model
//! unavailability does not resolve itself within one request. Repair is
//! reserved for the final attempt.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::config::PlanForgeConfig;
use crate::constants::diagnostics::{PARSE_PREVIEW_CHARS, RAW_LOG_PREVIEW_CHARS};
use crate::errors::ClassifiedError;
use crate::generation::{
    preview, GenerationOrchestrator, GenerationOutcome, ModelCatalog, ModelId,
};
use crate::llm::{prompts, GenerationBudget, GenerationRequest, TextGenerationService};
use crate::models::{PlanDocument, UserProfile};
use crate::parsing::{diagnose, ContentSanitizer, RepairStrategyKind, StructuralRepair};

/// A generated plan with its generation metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    /// The plan document
    #[serde(flatten)]
    pub plan: PlanDocument,
    /// When generation finished
    pub generated_at: DateTime<Utc>,
    /// Profile the plan was generated for
    pub user_data: UserProfile,
    /// Model that produced the accepted text
    pub model_used: ModelId,
    /// Generation+parse cycles performed
    pub attempts: u32,
    /// Repair strategy that salvaged the document, if one was needed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repair_strategy: Option<RepairStrategyKind>,
}

/// Bounded retry orchestration for plan documents
#[derive(Clone)]
pub struct PlanGenerator {
    orchestrator: GenerationOrchestrator,
    catalog: ModelCatalog,
    budget: GenerationBudget,
    max_retries: u32,
    deadline: Option<Duration>,
}

impl PlanGenerator {
    /// Create a generator using the configured budget, retry cap, and deadline
    #[must_use]
    pub fn new(service: Arc<dyn TextGenerationService>, config: &PlanForgeConfig) -> Self {
        Self {
            orchestrator: GenerationOrchestrator::new(service),
            catalog: ModelCatalog::for_plans(),
            budget: config.plan_budget,
            max_retries: config.max_retries.max(1),
            deadline: config.deadline,
        }
    }

    /// Create a generator with default settings
    #[must_use]
    pub fn with_defaults(service: Arc<dyn TextGenerationService>) -> Self {
        Self::new(service, &PlanForgeConfig::default())
    }

    /// Override the retry cap (at least 1)
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Override the candidate catalog
    #[must_use]
    pub fn with_catalog(mut self, catalog: ModelCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Override the end-to-end deadline
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Retry cap in effect
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Generate a plan for `profile`.
    ///
    /// When a deadline is configured and elapses, in-flight work is dropped.
    ///
    /// # Errors
    ///
    /// - `Unauthorized` if no credential is configured, or every candidate rejected it
    /// - `QuotaExceeded` if every candidate reported an exhausted quota
    /// - `ModelsExhausted` if every candidate failed for mixed reasons
    /// - `ParseFailure` if the final attempt could not be parsed or repaired
    /// - `DeadlineExceeded` if the configured deadline elapsed
    pub async fn generate_plan(
        &self,
        profile: &UserProfile,
    ) -> Result<GeneratedPlan, ClassifiedError> {
        let Some(limit) = self.deadline else {
            return self.run(profile).await;
        };

        tokio::time::timeout(limit, self.run(profile))
            .await
            .unwrap_or_else(|_| {
                warn!(deadline_secs = limit.as_secs(), "Plan generation deadline exceeded");
                Err(ClassifiedError::DeadlineExceeded {
                    after_secs: limit.as_secs(),
                })
            })
    }

    #[instrument(skip_all, fields(request_id = %Uuid::new_v4(), max_retries = self.max_retries))]
    async fn run(&self, profile: &UserProfile) -> Result<GeneratedPlan, ClassifiedError> {
        let service = self.orchestrator.service();
        if !service.is_configured() {
            error!(service = service.name(), "No API key configured");
            return Err(ClassifiedError::Unauthorized {
                message: "API key is not configured".to_owned(),
            });
        }

        let candidates = self.catalog.list_candidates(service).await;
        let request = GenerationRequest::new(prompts::plan_prompt(profile), self.budget);

        for attempt in 1..=self.max_retries {
            let is_final = attempt == self.max_retries;
            info!(attempt, is_final, "Plan generation attempt");

            let (raw_text, model_used) = match self.orchestrator.attempt(&candidates, &request).await
            {
                GenerationOutcome::Success {
                    raw_text,
                    model_used,
                } => (raw_text, model_used),
                GenerationOutcome::Failure(failure) => {
                    error!(attempt, error = %failure, "All candidate models failed");
                    return Err(failure.propagate_uniform_cause());
                }
            };

            info!(
                attempt,
                model = %model_used,
                chars = raw_text.len(),
                preview = preview(&raw_text, RAW_LOG_PREVIEW_CHARS),
                "Received plan text"
            );

            let span = ContentSanitizer::sanitize(&raw_text);
            let parse_error = match serde_json::from_str::<PlanDocument>(&span) {
                Ok(plan) => return Ok(Self::envelope(plan, profile, model_used, attempt, None)),
                Err(e) => e,
            };

            let diagnostic = diagnose(&span, &parse_error);
            warn!(
                attempt,
                diagnostic = %diagnostic,
                kind = ?diagnostic.kind,
                "Plan text failed to parse"
            );

            if is_final {
                if let Some(repaired) = StructuralRepair::repair::<PlanDocument>(&span, &diagnostic)
                {
                    info!(attempt, strategy = %repaired.strategy, "Recovered plan via structural repair");
                    return Ok(Self::envelope(
                        repaired.value,
                        profile,
                        model_used,
                        attempt,
                        Some(repaired.strategy),
                    ));
                }

                error!(attempt, "Every repair strategy failed");
                return Err(ClassifiedError::ParseFailure {
                    diagnostic,
                    preview: preview(&span, PARSE_PREVIEW_CHARS).to_owned(),
                    attempts: attempt,
                });
            }
        }

        // max_retries is at least 1, so the loop always returns
        Err(ClassifiedError::Unknown {
            message: format!("no generation attempt ran (max_retries = {})", self.max_retries),
        })
    }

    fn envelope(
        plan: PlanDocument,
        profile: &UserProfile,
        model_used: ModelId,
        attempts: u32,
        repair_strategy: Option<RepairStrategyKind>,
    ) -> GeneratedPlan {
        info!(
            model = %model_used,
            attempts,
            workout_days = plan.workout_plan.len(),
            exercises = plan.exercise_count(),
            "Plan generated"
        );

        GeneratedPlan {
            plan,
            generated_at: Utc::now(),
            user_data: profile.clone(),
            model_used,
            attempts,
            repair_strategy,
        }
    }
}
