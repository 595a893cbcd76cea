//! sift - Entry Point

use clap::{ArgAction, Parser};
use sift::integration::{prepare, StartupOptions};
use sift::model::StartupError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

/// sift - interactive viewer for JSON-per-line log files
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version, disable_version_flag = true)]
#[command(about = "Interactive TUI viewer for JSONL logs with jq filters and live tailing")]
pub struct Args {
    /// Path to the JSONL log file
    pub file: PathBuf,

    /// Filter expression (jq syntax); repeat for several filters
    #[arg(short, long = "filter", value_name = "EXPR")]
    pub filters: Vec<String>,

    /// View transform expression (jq syntax)
    #[arg(short = 'V', long, value_name = "EXPR")]
    pub view: Option<String>,

    /// Start in tail-follow mode
    #[arg(short, long)]
    pub tail: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Color theme for the detail view
    #[arg(long, value_name = "NAME")]
    pub theme: Option<String>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), StartupError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = sift::config::load_config_with_precedence(args.config.clone())?;
        let merged = sift::config::merge_config(config_file);
        let with_env = sift::config::apply_env_overrides(merged);
        sift::config::apply_cli_overrides(with_env, args.theme.clone(), args.tail)
    };

    sift::logging::init(&config.log_file_path)?;

    info!(config = ?config, "Configuration loaded and resolved");

    if !sift::view::is_valid_theme(&config.theme) {
        warn!(
            theme = %config.theme,
            valid = ?sift::view::VALID_THEMES,
            "Unknown theme, using default"
        );
    }

    let options = StartupOptions {
        path: args.file,
        filters: args.filters,
        view: args.view,
    };
    let state = prepare(&options, &config)?;

    sift::view::run(state, &config)?;
    Ok(())
}
