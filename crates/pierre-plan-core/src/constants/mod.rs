// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Generation defaults, fallback model lists, and service endpoints for plan generation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large list.

/// Generative language API endpoint
pub mod api {
    /// Base URL for the Gemini generative language API
    pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
    /// Generation method a model must advertise to be a plan candidate
    pub const GENERATE_CONTENT_METHOD: &str = "generateContent";
    /// Environment variable holding the API credential
    pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
}

/// Candidate model ordering
pub mod models {
    /// Substring marking the lower latency/cost tier preferred when capability is unknown
    pub const PREFERRED_TIER_MARKER: &str = "flash";

    /// Known-good identifiers spanning two capability generations, used when discovery fails
    pub const FALLBACK_PLAN_MODELS: &[&str] = &[
        "gemini-1.5-flash",
        "gemini-1.5-flash-latest",
        "gemini-pro",
        "gemini-1.0-pro",
        "gemini-1.5-pro",
        "gemini-1.5-pro-latest",
        "gemini-2.0-flash",
        "gemini-2.5-flash",
    ];

    /// Shorter fallback list for the motivational quote path
    pub const FALLBACK_MOTIVATION_MODELS: &[&str] = &["gemini-1.5-flash", "gemini-pro"];
}

/// Sampling and budget defaults
pub mod generation {
    /// Default end-to-end retry cap for one plan request
    pub const DEFAULT_MAX_RETRIES: u32 = 2;
    /// Output token budget; kept small so the service truncates less often
    pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 4096;
    /// Default sampling temperature
    pub const DEFAULT_TEMPERATURE: f32 = 0.7;
    /// Default nucleus sampling threshold
    pub const DEFAULT_TOP_P: f32 = 0.8;
    /// Default top-k sampling cutoff
    pub const DEFAULT_TOP_K: u32 = 40;
    /// Default HTTP timeout for one outbound call, in seconds
    pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

    /// Motivation quote temperature
    pub const MOTIVATION_TEMPERATURE: f32 = 0.9;
    /// Motivation quote token budget
    pub const MOTIVATION_MAX_OUTPUT_TOKENS: u32 = 100;
}

/// Diagnostic limits
pub mod diagnostics {
    /// Characters of failing text kept in a parse failure preview
    pub const PARSE_PREVIEW_CHARS: usize = 300;
    /// Characters of raw service output logged per attempt
    pub const RAW_LOG_PREVIEW_CHARS: usize = 200;
    /// Characters of an upstream error message logged per failed candidate
    pub const ERROR_LOG_PREVIEW_CHARS: usize = 100;
}

/// User-facing fallback text
pub mod messages {
    /// Quote returned whenever the motivation path cannot produce one
    pub const FALLBACK_MOTIVATION_QUOTE: &str = "Your journey to fitness starts today! 💪";
}

/// Service names for structured logging
pub mod service_names {
    /// Plan forge service
    pub const PLAN_FORGE: &str = "pierre-plan-forge";
}
