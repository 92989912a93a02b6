// ABOUTME: Motivational quote generation with a fixed fallback quote
// ABOUTME: Reuses the model catalog and orchestrator with its own fallback list and budget
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::{info, warn};

use crate::constants::messages::FALLBACK_MOTIVATION_QUOTE;
use crate::generation::{GenerationOrchestrator, GenerationOutcome, ModelCatalog};
use crate::llm::{prompts, GenerationBudget, GenerationRequest, TextGenerationService};

/// Produces one short motivational quote
#[derive(Clone)]
pub struct MotivationService {
    orchestrator: GenerationOrchestrator,
    catalog: ModelCatalog,
}

impl MotivationService {
    /// Create a service over `service`
    #[must_use]
    pub fn new(service: Arc<dyn TextGenerationService>) -> Self {
        Self {
            orchestrator: GenerationOrchestrator::new(service),
            catalog: ModelCatalog::for_motivation(),
        }
    }

    /// A motivational quote. Falls back to a fixed quote on any failure.
    pub async fn quote(&self) -> String {
        let service = self.orchestrator.service();
        if !service.is_configured() {
            warn!("No API key configured, using fallback quote");
            return FALLBACK_MOTIVATION_QUOTE.to_owned();
        }

        let candidates = self.catalog.list_candidates(service).await;
        let request = GenerationRequest::new(prompts::motivation_prompt(), GenerationBudget::motivation());

        match self.orchestrator.attempt(&candidates, &request).await {
            GenerationOutcome::Success {
                raw_text,
                model_used,
            } => {
                let quote = raw_text.trim();
                if quote.is_empty() {
                    warn!(model = %model_used, "Empty quote returned, using fallback quote");
                    FALLBACK_MOTIVATION_QUOTE.to_owned()
                } else {
                    info!(model = %model_used, "Motivational quote generated");
                    quote.to_owned()
                }
            }
            GenerationOutcome::Failure(error) => {
                warn!(error = %error, "Quote generation failed, using fallback quote");
                FALLBACK_MOTIVATION_QUOTE.to_owned()
            }
        }
    }
}
