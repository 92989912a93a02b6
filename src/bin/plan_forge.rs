// ABOUTME: Plan forge CLI - generate fitness plans, inspect models, and fetch quotes
// ABOUTME: Thin command-line driver over the plan and motivation services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Generate a plan from a profile file and print it
//! plan-forge generate --profile profile.json
//!
//! # Write the plan to a file instead
//! plan-forge generate --profile profile.json --output plan.json
//!
//! # Show which models would be tried, in order
//! plan-forge models
//!
//! # Print a motivational quote
//! plan-forge motivation
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use pierre_plan_forge::{
    config::PlanForgeConfig,
    errors::{AppError, AppResult},
    generation::ModelCatalog,
    llm::GeminiClient,
    logging::LoggingConfig,
    models::UserProfile,
    services::{MotivationService, PlanGenerator},
};
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "plan-forge",
    about = "Pierre Plan Forge",
    long_about = "Generate personalized fitness plans from a generative model, salvaging malformed output."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Generate a plan for a user profile
    Generate {
        /// Path to a JSON user profile
        #[arg(long)]
        profile: PathBuf,

        /// Write the generated plan here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// List candidate models in try order
    Models,

    /// Print one motivational quote
    Motivation,
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.with_level("debug");
    }
    logging
        .init()
        .map_err(|e| AppError::config(format!("Failed to initialize logging: {e}")))?;

    let config = PlanForgeConfig::from_env()?;
    config.log_summary();

    let client = Arc::new(GeminiClient::from_config(&config)?);

    match cli.command {
        Command::Generate { profile, output } => generate(client, &config, &profile, output).await,
        Command::Models => models(client.as_ref()).await,
        Command::Motivation => {
            let quote = MotivationService::new(client).quote().await;
            println!("{quote}");
            Ok(())
        }
    }
}

async fn generate(
    client: Arc<GeminiClient>,
    config: &PlanForgeConfig,
    profile_path: &Path,
    output: Option<PathBuf>,
) -> AppResult<()> {
    let raw_profile = tokio::fs::read_to_string(profile_path).await?;
    let profile: UserProfile = serde_json::from_str(&raw_profile).map_err(|e| {
        AppError::invalid_input(format!(
            "Invalid profile {}: {e}",
            profile_path.display()
        ))
    })?;

    info!(name = %profile.name, goal = %profile.fitness_goal, "Generating plan");

    let generator = PlanGenerator::new(client, config);
    let generated = match generator.generate_plan(&profile).await {
        Ok(generated) => generated,
        Err(failure) => {
            error!(status = failure.http_status(), error = %failure, "Plan generation failed");
            eprintln!("{}", failure.user_message());
            return Err(failure.into());
        }
    };

    let rendered = serde_json::to_string_pretty(&generated)?;
    match output {
        Some(path) => {
            tokio::fs::write(&path, rendered).await?;
            info!(path = %path.display(), "Plan written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

async fn models(client: &GeminiClient) -> AppResult<()> {
    let report = ModelCatalog::for_plans().report(client).await;

    println!("Models listed: {}", report.listed_total);
    println!(
        "Generation-capable: {}",
        report.generation_capable.len()
    );
    if let Some(discovery_error) = &report.discovery_error {
        println!("Discovery failed: {discovery_error}");
    }
    if report.used_fallback {
        println!("Using fallback model list");
    }
    println!("\nTry order:");
    for candidate in &report.candidates {
        println!("  {:>2}. {}", candidate.rank + 1, candidate.id);
    }

    Ok(())
}
