// ABOUTME: Environment configuration for the plan generation pipeline
// ABOUTME: Reads credential, endpoint, retry cap, sampling budget, and timeouts from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use serde_json::json;
use tracing::info;

use crate::constants::api::{GEMINI_API_BASE_URL, GEMINI_API_KEY_ENV};
use crate::constants::generation::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_MAX_RETRIES};
use crate::errors::{AppError, AppResult};
use crate::llm::GenerationBudget;

/// Environment variable overriding the API base URL
pub const API_BASE_URL_ENV: &str = "PLAN_FORGE_API_BASE_URL";
/// Environment variable for the retry cap
pub const MAX_RETRIES_ENV: &str = "PLAN_FORGE_MAX_RETRIES";
/// Environment variable for the output token cap
pub const MAX_OUTPUT_TOKENS_ENV: &str = "PLAN_FORGE_MAX_OUTPUT_TOKENS";
/// Environment variable for the sampling temperature
pub const TEMPERATURE_ENV: &str = "PLAN_FORGE_TEMPERATURE";
/// Environment variable for top-p
pub const TOP_P_ENV: &str = "PLAN_FORGE_TOP_P";
/// Environment variable for top-k
pub const TOP_K_ENV: &str = "PLAN_FORGE_TOP_K";
/// Environment variable for the per-call HTTP timeout
pub const HTTP_TIMEOUT_SECS_ENV: &str = "PLAN_FORGE_HTTP_TIMEOUT_SECS";
/// Environment variable for the end-to-end deadline of one plan request
pub const DEADLINE_SECS_ENV: &str = "PLAN_FORGE_DEADLINE_SECS";

/// Plan forge configuration
#[derive(Debug, Clone)]
pub struct PlanForgeConfig {
    /// Gemini API key, if set and non-blank
    pub api_key: Option<String>,
    /// Generative language API base URL
    pub api_base_url: String,
    /// Timeout applied to every outbound HTTP call
    pub http_timeout: Duration,
    /// Generation+parse cycles per plan request, at least 1
    pub max_retries: u32,
    /// Budget for plan generation calls
    pub plan_budget: GenerationBudget,
    /// End-to-end deadline for one plan request
    pub deadline: Option<Duration>,
}

impl Default for PlanForgeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: GEMINI_API_BASE_URL.to_owned(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
            plan_budget: GenerationBudget::plan(),
            deadline: None,
        }
    }
}

impl PlanForgeConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error naming the variable when a numeric value does not parse.
    pub fn from_env() -> AppResult<Self> {
        let defaults = GenerationBudget::plan();

        let plan_budget = GenerationBudget {
            max_output_tokens: parse_env_or(MAX_OUTPUT_TOKENS_ENV, defaults.max_output_tokens)?,
            temperature: parse_env_or(TEMPERATURE_ENV, defaults.temperature)?,
            top_p: parse_env_optional(TOP_P_ENV)?.or(defaults.top_p),
            top_k: parse_env_optional(TOP_K_ENV)?.or(defaults.top_k),
        };

        Ok(Self {
            api_key: env::var(GEMINI_API_KEY_ENV)
                .ok()
                .filter(|key| !key.trim().is_empty()),
            api_base_url: env_var_or(API_BASE_URL_ENV, GEMINI_API_BASE_URL),
            http_timeout: Duration::from_secs(parse_env_or(
                HTTP_TIMEOUT_SECS_ENV,
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            max_retries: parse_env_or(MAX_RETRIES_ENV, DEFAULT_MAX_RETRIES)?.max(1),
            plan_budget,
            deadline: parse_env_optional::<u64>(DEADLINE_SECS_ENV)?.map(Duration::from_secs),
        })
    }

    /// Whether an API key is available
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Log a configuration summary without the credential
    pub fn log_summary(&self) {
        let summary = json!({
            "api_base_url": self.api_base_url,
            "api_key_configured": self.has_api_key(),
            "http_timeout_secs": self.http_timeout.as_secs(),
            "max_retries": self.max_retries,
            "max_output_tokens": self.plan_budget.max_output_tokens,
            "temperature": self.plan_budget.temperature,
            "deadline_secs": self.deadline.map(|d| d.as_secs()),
        });

        info!("Plan forge configuration loaded: {}", summary);
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an optional environment variable, rejecting malformed values
fn parse_env_optional<T: FromStr>(key: &str) -> AppResult<Option<T>> {
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| AppError::config_invalid(key, &raw)),
        _ => Ok(None),
    }
}

fn parse_env_or<T: FromStr>(key: &str, default: T) -> AppResult<T> {
    Ok(parse_env_optional(key)?.unwrap_or(default))
}
