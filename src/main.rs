//! dzbar - Entry Point

use clap::{ArgAction, Parser};
use dzbar::config::loader::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
};
use dzbar::config::{parse_flags, FlagOutcome};
use dzbar::model::AppError;
use std::path::PathBuf;
use tracing::info;

/// Status bar and menu fed from standard input.
///
/// Long options come first; everything after them is read as dzen-style
/// flags (`-l 10 -e 'button3=exit' -ta l ...`).
#[derive(Parser, Debug)]
#[command(name = "dzbar")]
#[command(version)]
#[command(disable_help_flag = true)]
#[command(about = "Status bar and menu fed from standard input")]
pub struct Cli {
    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Path to log file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// dzen-style flags
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("dzbar: {e}");
            std::process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32, AppError> {
    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = load_config_with_precedence(cli.config)?;
        let merged = merge_config(config_file)?;
        let with_env = apply_env_overrides(merged);
        apply_cli_overrides(with_env, cli.log_file)
    };

    let options = match parse_flags(&cli.args, config.options)? {
        FlagOutcome::Run(options) => options,
        FlagOutcome::Version => {
            println!("dzbar-{}", env!("CARGO_PKG_VERSION"));
            return Ok(0);
        }
    };

    dzbar::logging::init(&config.log_file_path)?;
    info!(?options, "Configuration loaded and resolved");

    dzbar::run(&options)
}
