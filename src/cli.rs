//! CLI argument parsing via clap.

use std::path::PathBuf;

use clap::Parser;
use spf_harness::build_info;
use spf_harness::manager::Backend;
use spf_harness::script::{parse_step, Step};

/// Drive the spf file manager under automated control.
///
/// Starts the target, runs STEPs in order, prints diagnostics and closes it.
#[derive(Debug, Parser)]
#[command(
    name = "spf-harness",
    version = build_info::VERSION,
    long_version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Steps to run: text:<s>, chars:<s>, key:<hotkey>, wait:<ms>.
    #[arg(value_name = "STEP", value_parser = parse_step)]
    pub steps: Vec<Step>,

    /// Path to config file (default: ./spf-harness.toml or
    /// ~/.config/spf-harness/spf-harness.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Control backend: tmux or injection.
    #[arg(short = 'b', long = "backend")]
    pub backend: Option<Backend>,

    /// Override the target program path.
    #[arg(short = 't', long = "target")]
    pub target: Option<PathBuf>,

    /// Directory the target opens in.
    #[arg(short = 'd', long = "dir")]
    pub dir: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Print the run report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}
