// ABOUTME: HTTP-level tests for the Gemini client against a mock server
// ABOUTME: Verifies request shape, response extraction, error mapping, and an end-to-end plan run
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use pierre_plan_forge::errors::{ClassifiedError, ServiceErrorKind};
use pierre_plan_forge::generation::ModelCatalog;
use pierre_plan_forge::llm::{
    GeminiClient, GenerationBudget, GenerationRequest, TextGenerationService,
};
use pierre_plan_forge::services::{MotivationService, PlanGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";
const GENERATE_PATH: &str = "/models/gemini-1.5-flash:generateContent";

fn text_response(parts: &[&str]) -> serde_json::Value {
    let parts: Vec<_> = parts.iter().map(|text| json!({ "text": text })).collect();
    json!({
        "candidates": [{
            "content": { "parts": parts, "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

fn request() -> GenerationRequest {
    GenerationRequest::new("Generate a plan", GenerationBudget::plan())
}

async fn mock_generate_error(mock_server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(status)
                .set_body_json(json!({ "error": { "code": status, "message": message } })),
        )
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_list_models_reports_generation_support() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                {
                    "name": "models/gemini-1.5-flash",
                    "supportedGenerationMethods": ["generateContent", "countTokens"]
                },
                {
                    "name": "models/embedding-001",
                    "supportedGenerationMethods": ["embedContent"]
                }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let models = client.list_models().await.unwrap();

    assert_eq!(models.len(), 2);
    assert_eq!(models[0].identifier, "models/gemini-1.5-flash");
    assert!(models[0].supports_generation);
    assert!(!models[1].supports_generation);
}

#[tokio::test]
async fn test_generate_sends_budget_and_joins_parts() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .and(body_partial_json(json!({
            "contents": [{ "parts": [{ "text": "Generate a plan" }] }],
            "generationConfig": {
                "temperature": 0.7,
                "maxOutputTokens": 4096,
                "topP": 0.8,
                "topK": 40
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["{\"a\":", "1}"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let text = client.generate("gemini-1.5-flash", &request()).await.unwrap();

    assert_eq!(text, "{\"a\":1}");
}

#[tokio::test]
async fn test_not_found_maps_to_model_not_found() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;
    mock_generate_error(
        &mock_server,
        404,
        "models/gemini-1.5-flash is not found for API version v1beta",
    )
    .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let error = client.generate("gemini-1.5-flash", &request()).await.unwrap_err();

    assert_eq!(error.kind, ServiceErrorKind::ModelNotFound);
    assert_eq!(error.status, Some(404));
    assert!(error.is_model_unavailable());
}

#[tokio::test]
async fn test_rate_limit_maps_to_quota_with_retry_hint() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;
    mock_generate_error(
        &mock_server,
        429,
        "You exceeded your current quota. Please retry in 2.5s.",
    )
    .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let error = client.generate("gemini-1.5-flash", &request()).await.unwrap_err();

    assert_eq!(error.kind, ServiceErrorKind::QuotaExceeded);
    assert_eq!(
        error.message,
        "AI service quota exceeded. Please try again in 3 seconds."
    );
}

#[tokio::test]
async fn test_forbidden_maps_to_unauthorized() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;
    mock_generate_error(&mock_server, 403, "Permission denied").await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let error = client.generate("gemini-1.5-flash", &request()).await.unwrap_err();

    assert_eq!(error.kind, ServiceErrorKind::Unauthorized);
}

#[tokio::test]
async fn test_server_error_maps_to_other() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;
    mock_generate_error(&mock_server, 500, "Internal error encountered.").await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let error = client.generate("gemini-1.5-flash", &request()).await.unwrap_err();

    assert_eq!(error.kind, ServiceErrorKind::Other);
    assert!(!error.is_model_unavailable());
    assert!(error.message.contains("Internal error encountered."));
}

#[tokio::test]
async fn test_empty_candidate_is_returned_as_empty_text() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "finishReason": "SAFETY" }]
        })))
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    let text = client.generate("gemini-1.5-flash", &request()).await.unwrap();

    assert!(text.is_empty());
}

#[tokio::test]
async fn test_empty_reply_is_retried_on_same_model() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent"] },
                { "name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"] }
            ]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(2)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&[common::VALID_PLAN])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeminiClient::with_base_url(API_KEY, mock_server.uri()));
    let error = PlanGenerator::with_defaults(client)
        .with_max_retries(2)
        .generate_plan(&common::sample_profile())
        .await
        .unwrap_err();

    assert!(matches!(
        error,
        ClassifiedError::ParseFailure { attempts: 2, .. }
    ));
}

#[tokio::test]
async fn test_api_key_is_sent_as_header_only() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&["{}"])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = GeminiClient::with_base_url(API_KEY, mock_server.uri());
    client.generate("gemini-1.5-flash", &request()).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    assert!(!received[0].url.as_str().contains(API_KEY));
}

#[tokio::test]
async fn test_transport_failure_never_exposes_api_key() {
    common::init_test_logging();
    let secret = "SECRET-KEY-0123456789";
    let client = Arc::new(GeminiClient::with_base_url(secret, "http://127.0.0.1:9"));

    let direct = client
        .generate("gemini-1.5-flash", &request())
        .await
        .unwrap_err();
    assert!(direct.message.starts_with("HTTP request failed"));
    assert!(!direct.message.contains(secret));
    assert!(!direct.message.contains("127.0.0.1:9"));

    let error = PlanGenerator::with_defaults(client)
        .with_catalog(ModelCatalog::new(["gemini-1.5-flash", "gemini-pro"]))
        .generate_plan(&common::sample_profile())
        .await
        .unwrap_err();

    assert!(!error.user_message().contains(secret));
    assert!(!format!("{error:?}").contains(secret));
    assert!(!error.to_string().contains(secret));
}

#[tokio::test]
async fn test_plan_generation_over_http() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "models": [
                { "name": "models/gemini-1.5-pro", "supportedGenerationMethods": ["generateContent"] },
                { "name": "models/gemini-1.5-flash", "supportedGenerationMethods": ["generateContent"] }
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fenced = format!("```json\n{}\n```", common::VALID_PLAN);
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(&[fenced.as_str()])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeminiClient::with_base_url(API_KEY, mock_server.uri()));
    let generated = PlanGenerator::with_defaults(client)
        .generate_plan(&common::sample_profile())
        .await
        .unwrap();

    assert_eq!(generated.model_used.as_str(), "gemini-1.5-flash");
    assert_eq!(generated.attempts, 1);
}

#[tokio::test]
async fn test_motivation_falls_back_when_every_model_fails() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "code": 404, "message": "model is not found" }
        })))
        .expect(2)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeminiClient::with_base_url(API_KEY, mock_server.uri()));
    let quote = MotivationService::new(client).quote().await;

    assert_eq!(quote, "Your journey to fitness starts today! 💪");
}

#[tokio::test]
async fn test_motivation_quote_is_trimmed() {
    common::init_test_logging();
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": [] })))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_partial_json(json!({
            "generationConfig": { "temperature": 0.9, "maxOutputTokens": 100 }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(text_response(&["  Every rep counts.\n"])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(GeminiClient::with_base_url(API_KEY, mock_server.uri()));
    let quote = MotivationService::new(client).quote().await;

    assert_eq!(quote, "Every rep counts.");
}

#[tokio::test]
async fn test_client_without_key_is_unconfigured() {
    let client = GeminiClient::with_base_url("", "http://127.0.0.1:9");
    assert!(!client.is_configured());

    let quote = MotivationService::new(Arc::new(client)).quote().await;
    assert_eq!(quote, "Your journey to fitness starts today! 💪");
}
