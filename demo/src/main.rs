//! Open Ground city reference runtime demo CLI.
//!
//! Runs one or all of the mission scenarios. Each scenario drives a real
//! `MissionAgent` wired to stub city tools, a scripted planner, the response
//! validator, and a hash-chained journal.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- full-completion
//!   cargo run -p demo -- --policy policies/open-ground.toml weather-adaptation

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use openground_contracts::error::MissionResult;
use openground_policy::TomlMissionPolicy;
use openground_ref_city::{
    default_policy,
    scenarios::{
        concurrent_missions, double_verification, full_completion, incomplete_verification,
        tool_failure, weather_adaptation,
    },
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Open Ground adaptive urban mission orchestrator demo.
///
/// Each subcommand runs one or all of the reference scenarios, showing tool
/// sequencing, photo verification, adaptation, and journal integrity.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Open Ground city reference runtime demo",
    long_about = "Runs Open Ground mission scenarios showing context gathering,\n\
                  step verification, policy-driven adaptation, and journal integrity."
)]
struct Cli {
    /// Mission policy TOML. Defaults to the bundled policies/open-ground.toml.
    #[arg(long, global = true, value_name = "PATH")]
    policy: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// Scenario 1: plan and verify every step.
    FullCompletion,
    /// Scenario 2: a blurry photo, then a clear one.
    IncompleteVerification,
    /// Scenario 3: submitting a finished step twice.
    DoubleVerification,
    /// Scenario 4: weather fault, then clock and places outages.
    ToolFailure,
    /// Scenario 5: rain trips a policy trigger mid-mission.
    WeatherAdaptation,
    /// Scenario 6: independent missions on one runtime.
    Concurrent,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() {
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match load_policy(cli.policy) {
        Ok(policy) => run(cli.command, &policy).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

fn load_policy(path: Option<PathBuf>) -> MissionResult<TomlMissionPolicy> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "loading mission policy");
            TomlMissionPolicy::from_file(&path)
        }
        None => default_policy(),
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

async fn run(command: Command, policy: &TomlMissionPolicy) -> MissionResult<()> {
    match command {
        Command::RunAll => run_all(policy).await,
        Command::FullCompletion => full_completion::run_scenario(policy).await,
        Command::IncompleteVerification => incomplete_verification::run_scenario(policy).await,
        Command::DoubleVerification => double_verification::run_scenario(policy).await,
        Command::ToolFailure => tool_failure::run_scenario(policy).await,
        Command::WeatherAdaptation => weather_adaptation::run_scenario(policy).await,
        Command::Concurrent => concurrent_missions::run_scenario(policy).await,
    }
}

async fn run_all(policy: &TomlMissionPolicy) -> MissionResult<()> {
    full_completion::run_scenario(policy).await?;
    incomplete_verification::run_scenario(policy).await?;
    double_verification::run_scenario(policy).await?;
    tool_failure::run_scenario(policy).await?;
    weather_adaptation::run_scenario(policy).await?;
    concurrent_missions::run_scenario(policy).await?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Open Ground: Adaptive Urban Mission Orchestrator");
    println!("City Reference Demo");
    println!("=================================================");
    println!();
    println!("Mission lifecycle per agent:");
    println!("  [1] Gather context: location → weather → time → nearby places");
    println!("  [2] Planning service proposes a plan; validator checks its shape");
    println!("  [3] Each step is verified from a completion photo");
    println!("  [4] Policy triggers turn weather changes into adaptations");
    println!("  [5] Every event is appended to a SHA-256 hash-chained journal");
    println!();
}
