//! CLI entry point for spf-harness.

mod cli;

use std::path::Path;

use clap::Parser;
use serde::Serialize;
use spf_harness::build_info;
use spf_harness::config::{load_config_with_source, validate_config};
use spf_harness::error::HarnessError;
use spf_harness::manager::{build_manager, Backend, ManagerState, TargetManager};
use spf_harness::script::{run_steps, Step};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// What the run observed just before the target was closed.
#[derive(Debug, Serialize)]
struct RunReport {
    version: String,
    backend: Backend,
    target: String,
    steps: usize,
    state: ManagerState,
    running: bool,
    runtime_info: String,
}

fn main() {
    let args = cli::Args::parse();
    init_tracing(args.verbose);

    let report = match run(&args) {
        Ok(report) => report,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("error: failed to encode report: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", report.runtime_info);
        println!("running: {}", report.running);
    }
}

/// `SPF_HARNESS_LOG` wins over `RUST_LOG`; `-v` raises the fallback to debug.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("SPF_HARNESS_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &cli::Args) -> Result<RunReport, HarnessError> {
    let loaded = load_config_with_source(args.config.as_deref())?;
    debug!(source = %loaded.source, "loaded config");
    let mut config = loaded.config;

    // CLI flags override file and env values.
    if let Some(target) = &args.target {
        config.target.path = target.clone();
    }
    if let Some(dir) = &args.dir {
        config.target.start_dir = Some(dir.clone());
    }
    validate_config(&config)?;
    let backend = args.backend.unwrap_or(config.harness.backend);
    info!(%backend, target = %config.target.path.display(), "starting harness run");

    let mut manager = build_manager(&config, backend);
    let outcome = drive(
        manager.as_mut(),
        config.target.start_dir.as_deref(),
        &args.steps,
    );
    let report = RunReport {
        version: build_info::short_version(),
        backend,
        target: config.target.path.display().to_string(),
        steps: args.steps.len(),
        running: manager.is_running(),
        state: manager.state(),
        runtime_info: manager.runtime_info(),
    };
    let closed = manager.close();
    outcome?;
    closed?;
    Ok(report)
}

fn drive(
    manager: &mut dyn TargetManager,
    start_dir: Option<&Path>,
    steps: &[Step],
) -> Result<(), HarnessError> {
    manager.start(start_dir)?;
    run_steps(manager, steps)
}
