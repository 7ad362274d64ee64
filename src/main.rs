//! cpi-menu CLI
//!
//! Run the single-button menu in a terminal simulator, or replay a scripted
//! button sequence headlessly.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cpi_menu::Result;
use cpi_menu::config;
use cpi_menu::display::MemoryDisplay;
use cpi_menu::input::ScriptedInput;
use cpi_menu::logging::{self, LogTarget};
use cpi_menu::session::Session;
use cpi_menu::tui;
use cpi_menu::types::SessionConfig;

#[derive(Parser)]
#[command(name = "cpi-menu")]
#[command(about = "Single-button menu for a two-line character display")]
#[command(version)]
struct Cli {
    /// Configuration file (default: <config dir>/cpi-menu/config.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal simulator (s/Space/Enter tap, d double, l long, q quit)
    Run,

    /// Replay a button script headlessly, printing every frame
    Replay {
        /// Tokens: s (tap), d (double), l (long), . (idle wheel period), w<ms> (wait)
        script: String,

        /// Override how long messages stay up, in milliseconds
        #[arg(long)]
        hold_ms: Option<u64>,

        /// Run the auto-scroll thread during replay
        #[arg(long)]
        auto_scroll: bool,
    },

    /// Print the effective configuration as JSON
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run => cmd_run(cli.config, &cli.log_level, cli.log_file),
        Commands::Replay {
            script,
            hold_ms,
            auto_scroll,
        } => cmd_replay(cli.config, &cli.log_level, cli.log_file, &script, hold_ms, auto_scroll),
        Commands::Config => cmd_config(cli.config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

fn cmd_run(config_path: Option<PathBuf>, log_level: &str, log_file: Option<PathBuf>) -> Result<()> {
    // stderr shares the terminal with the simulator.
    let target = match &log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Off,
    };
    logging::init(log_level, target)?;

    let config = config::load(config_path.as_deref())?;
    tui::run(config)
}

fn cmd_replay(
    config_path: Option<PathBuf>,
    log_level: &str,
    log_file: Option<PathBuf>,
    script: &str,
    hold_ms: Option<u64>,
    auto_scroll: bool,
) -> Result<()> {
    let target = match &log_file {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr,
    };
    logging::init(log_level, target)?;

    let mut config = config::load(config_path.as_deref())?;
    if let Some(ms) = hold_ms {
        config.dial_hold_ms = ms;
        config.notice_hold_ms = ms;
    }
    let input = ScriptedInput::parse(script)?;
    let display = MemoryDisplay::with_echo(config.display_columns);

    let mut session = Session::new(config, display, input);
    if auto_scroll {
        session.start()?;
    } else {
        session.draw_menu()?;
    }
    let result = session.run();
    session.stop();
    result
}

fn cmd_config(config_path: Option<PathBuf>) -> Result<()> {
    let config: SessionConfig = config::load(config_path.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
