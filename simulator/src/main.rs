use anyhow::{anyhow, Context};
use clap::Parser;
use log::info;
use gui_bridge::bridge::GuiBridge;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{run_cadence, CycleResult, Runner};

mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Drives the Objectify detection stabilizer on a fixed cadence")]
struct Args {
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Milliseconds between detection batches
    #[arg(long)]
    cadence_ms: Option<u64>,
    /// Stop after this many detection cycles
    #[arg(long)]
    cycles: Option<usize>,
    /// Run cycles back to back on a logical clock instead of waiting for the cadence
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Append per-cycle JSON lines to this file
    #[arg(long)]
    report: Option<PathBuf>,
    /// Serve the overlay over HTTP; raw batches arrive on POST /ingest instead of the synthetic scene
    #[arg(long, default_value_t = false, conflicts_with = "offline")]
    serve: bool,
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Synthetic scene, back to back on a logical clock.
    Offline,
    /// Synthetic scene on the wall-clock cadence.
    Cadence,
    /// Posted batches are the only source.
    Serve,
}

impl Args {
    fn mode(&self) -> Mode {
        if self.offline {
            Mode::Offline
        } else if self.serve {
            Mode::Serve
        } else {
            Mode::Cadence
        }
    }
}

fn print_cycle(result: &CycleResult) {
    let labels = result
        .detections
        .iter()
        .map(|detection| format!("{} [{}]", detection.label(), detection.summary()))
        .collect::<Vec<_>>();
    println!(
        "cycle {} -> raw {}, stable {}: {}",
        result.cycle,
        result.raw_count,
        result.detections.len(),
        if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        }
    );
}

fn append_report(path: &Path, results: &[CycleResult]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    for result in results {
        let line = serde_json::to_string(result).context("serializing cycle report")?;
        writeln!(file, "{}", line)?;
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let base_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::default()
    };
    let config = base_config.with_overrides(args.cadence_ms, args.cycles, args.bind);
    config.validate()?;

    let runner: Arc<Mutex<Runner>> = Arc::new(Mutex::new(Runner::from_config(&config)?));

    let runtime = match args.mode() {
        Mode::Offline => {
            let cycles = config.cycles.unwrap_or(config.stability.window_size * 2);
            let results = runner
                .lock()
                .map_err(|_| anyhow!("runner lock poisoned"))?
                .run_offline(cycles)?;
            results.iter().for_each(print_cycle);
            if let Some(path) = &args.report {
                append_report(path, &results)?;
            }
            return Ok(());
        }
        Mode::Serve => {
            let gui_bridge = GuiBridge::new(runner.clone(), config.bind);
            gui_bridge.publish_status(&format!(
                "HTTP bridge on http://{} (POST /ingest, GET /detections, Ctrl+C to stop)...",
                config.bind
            ));
            let runtime = TokioBuilder::new_current_thread()
                .enable_all()
                .build()
                .context("creating runtime for signal handling")?;
            runtime.block_on(async {
                signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
                Ok::<(), anyhow::Error>(())
            })?;
            let metrics = runner
                .lock()
                .map_err(|_| anyhow!("runner lock poisoned"))?
                .engine()
                .metrics();
            info!(
                "overlay bridge stopped after {} ingested batches ({} stable, last showed {})",
                metrics.batches,
                metrics.stable_emitted,
                gui_bridge.latest().overlays.len()
            );
            return Ok(());
        }
        Mode::Cadence => TokioBuilder::new_multi_thread()
            .enable_all()
            .build()
            .context("creating runtime for the detection loop")?,
    };
    let mut results = Vec::new();
    let completed = runtime.block_on(run_cadence(runner.clone(), config.cycles, |result| {
        print_cycle(result);
        if args.report.is_some() {
            results.push(result.clone());
        }
    }))?;

    if let Some(path) = &args.report {
        append_report(path, &results)?;
    }
    let metrics = runner
        .lock()
        .map_err(|_| anyhow!("runner lock poisoned"))?
        .engine()
        .metrics();
    info!(
        "detection loop finished after {} cycles ({} raw, {} stable)",
        completed, metrics.raw_detections, metrics.stable_emitted
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_mode_skips_the_synthetic_cadence() {
        let args = Args::try_parse_from(["simulator", "--serve"]).unwrap();
        assert_eq!(args.mode(), Mode::Serve);

        let args = Args::try_parse_from(["simulator", "--cycles", "3"]).unwrap();
        assert_eq!(args.mode(), Mode::Cadence);

        let args = Args::try_parse_from(["simulator", "--offline"]).unwrap();
        assert_eq!(args.mode(), Mode::Offline);
    }

    #[test]
    fn offline_and_serve_are_mutually_exclusive() {
        assert!(Args::try_parse_from(["simulator", "--offline", "--serve"]).is_err());
    }
}
