mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use cli::{Cli, DEFAULT_SAMPLES};
use waveprint::{analyze_file, AnalysisOptions, WaveformAnalysis};

#[derive(Serialize)]
struct Report {
    input: String,
    #[serde(flatten)]
    analysis: WaveformAnalysis,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect waveprint.toml / global config
    let config_path = cli.config.clone().or_else(find_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            // Merge: config values apply only when CLI is at its default
            if cli.samples == DEFAULT_SAMPLES { cli.samples = cfg.analysis.samples; }
            if cli.fft_bands.is_none() { cli.fft_bands = cfg.analysis.fft_bands; }
            if !cli.pretty { cli.pretty = cfg.output.pretty; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    if cli.samples == 0 {
        anyhow::bail!("Sample count must be greater than zero");
    }

    let mut options = AnalysisOptions::new(cli.samples);
    if let Some(bands) = cli.fft_bands {
        options = options.with_fft_bands(bands);
    }

    log::info!("waveprint - waveform sample extraction");
    log::info!("Inputs: {}", cli.inputs.len());
    log::info!(
        "Samples: {}, FFT bands: {}",
        options.target_samples,
        options.fft_bands.filter(|&b| b > 0).map_or("off".to_string(), |b| b.to_string())
    );

    let pb = ProgressBar::new(cli.inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")
            .unwrap()
            .progress_chars("=>-"),
    );

    // Each analysis owns its buffers, so files can be processed in parallel
    let results: Vec<(&PathBuf, Result<WaveformAnalysis>)> = cli
        .inputs
        .par_iter()
        .map(|input| {
            let result = analyze_file(input, &options)
                .with_context(|| format!("Failed to analyze {}", input.display()));
            pb.inc(1);
            (input, result)
        })
        .collect();

    pb.finish_with_message("Analysis complete");

    let mut reports = Vec::with_capacity(results.len());
    let mut failures = 0;
    for (input, result) in results {
        match result {
            Ok(analysis) => reports.push(Report {
                input: input.display().to_string(),
                analysis,
            }),
            Err(err) => {
                log::error!("{:#}", err);
                failures += 1;
            }
        }
    }

    write_reports(&reports, cli.output.as_deref(), cli.pretty)?;

    if failures > 0 {
        anyhow::bail!("{} of {} inputs failed", failures, cli.inputs.len());
    }

    log::info!("Done! Analyzed {} file(s)", reports.len());
    Ok(())
}

fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("waveprint.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("waveprint").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("waveprint").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

fn write_reports(reports: &[Report], output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(reports)?
    } else {
        serde_json::to_string(reports)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write output: {}", path.display()))?;
            log::info!("Output: {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json).context("Failed to write to stdout")?;
        }
    }
    Ok(())
}
