// SPDX-FileCopyrightText: 2026 Atelier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Atelier - an extensible editor shell.
//!
//! Binary entry point: runs the startup sequence headlessly and reports
//! what was registered.

use std::io::IsTerminal;
use std::path::PathBuf;

use atelier::output;
use atelier::{Shell, StartupReport};
use atelier_config::AtelierConfig;
use atelier_core::{AtelierError, PluginFamily};
use clap::{Parser, Subcommand};
use colored::Colorize;

/// Atelier - an extensible editor shell.
#[derive(Parser, Debug)]
#[command(name = "atelier", version, about, long_about = None)]
struct Cli {
    /// Configuration file to load instead of the XDG hierarchy.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the startup sequence and print a summary.
    Start,
    /// Print the module initialization order without initializing anything.
    Order,
    /// Run startup and list the plugin catalog.
    Plugins {
        /// Only list one family (dev-tool, renderer, generation-ui, node-type).
        #[arg(long)]
        family: Option<PluginFamily>,
    },
    /// Run startup and list every module with its final status.
    Modules,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => atelier_config::load_and_validate_path(path),
        None => atelier_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            atelier_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.shell.log_level);
    if !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let result = match cli.command.unwrap_or(Commands::Start) {
        Commands::Start => run_start(config).await,
        Commands::Order => run_order(config),
        Commands::Plugins { family } => run_plugins(config, family).await,
        Commands::Modules => run_modules(config).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e}", "error:".red().bold());
        std::process::exit(1);
    }
}

async fn started(config: AtelierConfig) -> Result<(Shell, StartupReport), AtelierError> {
    let mut shell = Shell::with_builtin_modules(config)?;
    let report = shell.start().await?;
    Ok((shell, report))
}

async fn run_start(config: AtelierConfig) -> Result<(), AtelierError> {
    let name = config.shell.name.clone();
    let (shell, report) = started(config).await?;

    let headline = if report.bootstrap.is_clean() {
        "started".green().bold()
    } else {
        "started with errors".yellow().bold()
    };
    println!("{} {headline}", name.bold());
    for line in output::startup_summary(&report) {
        println!("{line}");
    }
    println!("  plugins     {} registered", shell.catalog().len());
    Ok(())
}

fn run_order(config: AtelierConfig) -> Result<(), AtelierError> {
    let shell = Shell::with_builtin_modules(config)?;
    let order = shell.modules().resolve_order()?;
    println!("{}", "Initialization order".bold());
    for line in output::order_lines(shell.modules(), &order) {
        println!("{line}");
    }
    Ok(())
}

async fn run_plugins(config: AtelierConfig, family: Option<PluginFamily>) -> Result<(), AtelierError> {
    let (shell, _) = started(config).await?;
    let entries = shell.catalog().entries(family);
    println!("{} ({})", "Plugin catalog".bold(), entries.len());
    for line in output::plugin_lines(&entries) {
        println!("{line}");
    }
    Ok(())
}

async fn run_modules(config: AtelierConfig) -> Result<(), AtelierError> {
    let (shell, _) = started(config).await?;
    println!("{}", "Modules".bold());
    for line in output::module_lines(shell.modules()) {
        println!("{line}");
    }
    Ok(())
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("atelier={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
