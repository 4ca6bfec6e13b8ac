//! wavepack: Mirage IFF/8SVX sample library to ES5503 wave ROM
//!
//! Pipeline:
//!   wavepack-iff   8SVX parsing, signed -> unsigned transcoding
//!   wavepack-rom   candidate scan, budgeted selection, ROM packing

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wavepack_common::{PackingStrategy, RomConfig};
use wavepack_iff::ParsedVoice;
use wavepack_rom::{RomError, StopReason};

#[derive(Parser, Debug)]
#[command(name = "wavepack")]
#[command(about = "Convert Ensoniq Mirage IFF/8SVX samples to an ES5503 wave ROM")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults are used for missing keys)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Sample library root containing one directory per group
    #[arg(short, long, default_value = "public/roms/Mirage4Amiga")]
    source: PathBuf,

    /// Output directory for the ROM and its sample map
    #[arg(short, long, default_value = "public/roms/es5503")]
    output: PathBuf,

    /// Sample data budget in bytes (header pages excluded)
    #[arg(short, long)]
    budget: Option<usize>,

    /// Candidate group, highest priority first (repeatable)
    #[arg(short, long = "group")]
    groups: Vec<String>,

    /// What to do with a sample that does not fit
    #[arg(long, value_parser = parse_strategy)]
    strategy: Option<PackingStrategy>,

    /// Parse a single 8SVX file and print its header instead of building
    #[arg(long, value_name = "FILE")]
    inspect: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_strategy(name: &str) -> std::result::Result<PackingStrategy, String> {
    PackingStrategy::from_name(name).ok_or_else(|| {
        format!(
            "unknown strategy '{}' (expected {} or {})",
            name,
            PackingStrategy::HaltOnOverflow.name(),
            PackingStrategy::SkipOnOverflow.name()
        )
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "wavepack=debug" } else { "wavepack=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    if let Some(path) = &cli.inspect {
        return inspect(path);
    }

    let config = resolve_config(&cli)?;

    if !cli.source.is_dir() {
        bail!("Mirage samples not found at {}", cli.source.display());
    }

    println!("Converting Ensoniq Mirage samples to ES5503 format...");
    println!("Source: {}", cli.source.display());
    println!("Output: {}", cli.output.display());
    println!();

    let report = match wavepack_rom::build(&config, &cli.source, &cli.output) {
        Ok(report) => report,
        Err(RomError::NoSamples) => bail!("No samples selected from {}", cli.source.display()),
        Err(e) => return Err(e).context("Building wave ROM"),
    };

    if let StopReason::BudgetReached { total, rejected } = &report.selection.stop {
        tracing::debug!("Stopped at {} with {} of {} bytes used", rejected, total, config.budget);
    }

    println!();
    println!("Created {}: {} bytes", report.rom_path.display(), report.rom_size);
    println!("Sample map: {}", report.map_path.display());
    println!("Total samples: {}", report.sample_count);
    Ok(())
}

/// Config file first, then command-line overrides
fn resolve_config(cli: &Cli) -> Result<RomConfig> {
    let mut config = match &cli.config {
        Some(path) => RomConfig::load(path)
            .with_context(|| format!("Loading config {}", path.display()))?,
        None => RomConfig::default(),
    };

    if let Some(budget) = cli.budget {
        config.budget = budget;
    }
    if !cli.groups.is_empty() {
        config.groups = cli.groups.clone();
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy;
    }

    config.validate().context("Invalid configuration")?;
    tracing::debug!(
        "Budget {} bytes, {} groups, strategy {}",
        config.budget,
        config.groups.len(),
        config.strategy.name()
    );
    Ok(config)
}

fn inspect(path: &Path) -> Result<()> {
    let voice = ParsedVoice::open(path).with_context(|| format!("Parsing {}", path.display()))?;
    println!("{}", path.display());
    println!("  Sample rate: {} Hz", voice.sample_rate);
    println!("  One-shot:    {} bytes", voice.one_shot_length);
    println!("  Body:        {} bytes ({:.3} s)", voice.pcm.len(), voice.duration_secs());
    Ok(())
}
