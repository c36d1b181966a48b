mod adapter;
mod cli;
mod commands;
mod config;
mod observer;
mod paths;
mod progress;
mod runner;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use reconcile::RunMode;
use std::io;
use std::path::PathBuf;

/// Global context for the application
#[derive(Debug, Clone)]
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    /// Registry file given with `--config`
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    match cli.command {
        Command::PrintLatest => commands::pass::run(&ctx, RunMode::PRINT_LATEST).map(drop),
        Command::PrintAll => commands::pass::run(&ctx, RunMode::PRINT_ALL).map(drop),
        Command::InstallLatest => commands::pass::run(&ctx, RunMode::INSTALL_LATEST).map(drop),
        Command::InstallAll => commands::pass::run(&ctx, RunMode::INSTALL_ALL).map(drop),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "taip", &mut io::stdout());
            Ok(())
        }
    }
}
