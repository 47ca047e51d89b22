use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use farm_core::enhanced::{calculate_enhanced_score, UsageMetrics};
use farm_core::io::scenario::Scenario;
use farm_core::io::seed::Seed;
use farm_core::levels::{level_checkpoint, level_config};
use farm_core::vegetables::{self, LocationType};
use farm_core::{calculate_achievements, simulate, SimulationResult};
use serde_json::json;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "farmstep",
    about = "Batch runner emitting per-day NDJSON reports for a farm scenario"
)]
struct Args {
    /// Path to the scenario JSON document.
    #[arg(long, value_name = "PATH")]
    scenario: PathBuf,

    /// Replace the scenario's seed with a standalone seed document.
    #[arg(long = "seed-file", value_name = "PATH")]
    seed_file: Option<PathBuf>,

    /// Override the number of simulated days.
    #[arg(long, value_name = "DAYS", conflicts_with = "level")]
    days: Option<u32>,

    /// Play the scenario's actions as a campaign level, using that level's
    /// starting resources and duration.
    #[arg(long, value_name = "LEVEL", value_parser = clap::value_parser!(u32).range(1..=5))]
    level: Option<u32>,

    /// Output NDJSON file path, one line per simulated day.
    #[arg(long)]
    out: PathBuf,

    /// Optional path to write the final scores and achievements as JSON.
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Optional usage-metrics JSON document; adds the enhanced score to the summary.
    #[arg(long, value_name = "PATH", requires = "summary")]
    usage: Option<PathBuf>,

    /// Location type the summary's super vegetable is grown for.
    #[arg(long, value_name = "TYPE", default_value = "temperate")]
    location: LocationType,
}

/// Apply the command-line overrides to a loaded scenario.
fn prepare(mut scenario: Scenario, args: &Args) -> Result<(Scenario, u32)> {
    if let Some(path) = &args.seed_file {
        scenario.seed = Seed::load_from_path(path)
            .with_context(|| format!("failed to read seed {:?}", path))?;
        scenario
            .seed
            .validate()
            .with_context(|| format!("seed {:?} rejected", path))?;
    }

    let mut level = 1;
    if let Some(id) = args.level {
        let config = level_config(id).with_context(|| format!("unknown level {id}"))?;
        scenario.initial_resources = config.initial_resources;
        scenario.total_days = config.duration;
        level = id;
    }
    if let Some(days) = args.days {
        scenario.total_days = days;
    }
    Ok((scenario, level))
}

fn run(scenario: &Scenario) -> SimulationResult {
    simulate(
        &scenario.actions,
        &scenario.seed,
        scenario.initial_resources,
        scenario.total_days,
        &scenario.environment,
    )
}

fn load_usage(path: &Path) -> Result<UsageMetrics> {
    let file = File::open(path).with_context(|| format!("failed to open usage file {:?}", path))?;
    serde_json::from_reader(file).context("invalid usage json")
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = Args::parse();

    let scenario = Scenario::load_from_path(&args.scenario)
        .with_context(|| format!("failed to read scenario {:?}", args.scenario))?;
    let (scenario, level) = prepare(scenario, &args)?;
    debug!(
        seed = %scenario.seed.id,
        days = scenario.total_days,
        actions = scenario.actions.len(),
        "scenario loaded"
    );

    let mut result = run(&scenario);
    result.final_state.current_level = level;

    let report_file =
        File::create(&args.out).with_context(|| format!("failed to create {:?}", args.out))?;
    let mut report_writer = BufWriter::new(report_file);
    for day in &result.days {
        report_writer.write_all(day.to_ndjson()?.as_bytes())?;
    }
    report_writer.flush()?;

    if let Some(path) = &args.summary {
        let now = Utc::now();
        let achievements = calculate_achievements(&result.final_state, &result.scores, &[], now);
        let vegetable =
            vegetables::from_game_state(&result.final_state, "local", args.location, now);
        let checkpoint = level_checkpoint(&result.final_state, &scenario.seed);
        let enhanced = match &args.usage {
            Some(usage_path) => Some(calculate_enhanced_score(
                &result.scores,
                &load_usage(usage_path)?,
            )),
            None => None,
        };
        let summary = json!({
            "seed": scenario.seed.id,
            "level": level,
            "days": scenario.total_days,
            "appliedActions": result.actions.len(),
            "scores": result.scores,
            "finalResources": result.final_state.resources,
            "achievements": achievements,
            "checkpoint": checkpoint,
            "enhanced": enhanced,
            "vegetable": vegetable,
            "battlePower": vegetables::battle_power(&vegetable),
        });
        let file = File::create(path)
            .with_context(|| format!("failed to create summary file at {:?}", path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &summary)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
    }

    info!(
        total = result.scores.total,
        days = result.days.len(),
        "scenario complete"
    );
    Ok(())
}
