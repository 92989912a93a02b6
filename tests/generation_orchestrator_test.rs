// ABOUTME: Integration tests for sequential model fallback
// ABOUTME: Verifies first-success-wins ordering and exhaustion reporting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use common::ScriptedService;
use pierre_plan_forge::errors::{ClassifiedError, ServiceError, ServiceErrorKind};
use pierre_plan_forge::generation::{
    GenerationOrchestrator, GenerationOutcome, ModelCandidate, ModelId,
};
use pierre_plan_forge::llm::{GenerationBudget, GenerationRequest};

fn candidates(ids: &[&str]) -> Vec<ModelCandidate> {
    ids.iter()
        .enumerate()
        .map(|(rank, id)| ModelCandidate {
            id: ModelId::new(id),
            rank,
        })
        .collect()
}

fn request() -> GenerationRequest {
    GenerationRequest::new("Generate a plan", GenerationBudget::plan())
}

#[tokio::test]
async fn test_first_success_stops_the_sweep() {
    common::init_test_logging();
    let service = Arc::new(
        ScriptedService::new()
            .respond("a", Err(ServiceError::model_not_found("models/a is not found")))
            .respond("b", Ok("{\"ok\": true}".to_owned()))
            .respond("c", Ok("never used".to_owned())),
    );
    let orchestrator = GenerationOrchestrator::new(service.clone());

    let outcome = orchestrator
        .attempt(&candidates(&["a", "b", "c"]), &request())
        .await;

    assert!(outcome.is_success());
    let GenerationOutcome::Success {
        raw_text,
        model_used,
    } = outcome
    else {
        panic!("expected success");
    };
    assert_eq!(raw_text, "{\"ok\": true}");
    assert_eq!(model_used.as_str(), "b");
    assert_eq!(service.calls(), ["a", "b"]);
}

#[tokio::test]
async fn test_all_failures_report_every_candidate() {
    common::init_test_logging();
    let service = Arc::new(
        ScriptedService::new()
            .respond("a", Err(ServiceError::model_not_found("models/a is not found")))
            .respond("b", Err(ServiceError::other("internal error").with_status(500)))
            .respond("c", Err(ServiceError::quota_exceeded("slow down").with_status(429))),
    );
    let orchestrator = GenerationOrchestrator::new(service.clone());

    let outcome = orchestrator
        .attempt(&candidates(&["a", "b", "c"]), &request())
        .await;

    let GenerationOutcome::Failure(ClassifiedError::ModelsExhausted {
        tried,
        failures,
        last_error,
    }) = outcome
    else {
        panic!("expected exhausted sweep");
    };
    assert_eq!(tried, ["a", "b", "c"]);
    assert_eq!(service.calls(), ["a", "b", "c"]);
    assert!(failures[0].model_unavailable);
    assert!(!failures[1].model_unavailable);
    assert_eq!(failures[2].kind, ServiceErrorKind::QuotaExceeded);
    assert_eq!(last_error.kind, ServiceErrorKind::QuotaExceeded);
}

#[tokio::test]
async fn test_empty_candidate_list_is_exhausted() {
    common::init_test_logging();
    let service = Arc::new(ScriptedService::new());
    let orchestrator = GenerationOrchestrator::new(service.clone());

    let outcome = orchestrator.attempt(&[], &request()).await;

    let GenerationOutcome::Failure(error) = outcome else {
        panic!("expected failure");
    };
    assert!(error.is_models_exhausted());
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_same_request_is_sent_to_each_candidate() {
    common::init_test_logging();
    let service = Arc::new(ScriptedService::new().respond("b", Ok("done".to_owned())));
    let orchestrator = GenerationOrchestrator::new(service.clone());

    orchestrator.attempt(&candidates(&["a", "b"]), &request()).await;

    assert_eq!(service.prompts(), ["Generate a plan", "Generate a plan"]);
}
