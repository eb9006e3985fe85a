mod cli;
mod commands;
mod dotenv;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::path::Path;
use std::process::ExitCode;

/// Environment variable pointing at an env file other than `./.env`.
const ENV_FILE_VAR: &str = "ADK_DEPLOY_ENV_FILE";

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> Result<ExitCode> {
    // Must run before parsing so clap's env defaults see .env values
    let dotenv = match std::env::var_os(ENV_FILE_VAR) {
        Some(path) => dotenv::load_from(Path::new(&path)),
        None => dotenv::load(),
    };

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

    dotenv.log();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
    };

    match cli.command {
        None => commands::deploy::run(&ctx, cli.deploy),
        Some(Command::Deploy(args)) => commands::deploy::run(&ctx, args),
        Some(Command::Doctor(args)) => commands::doctor::run(&ctx, args),
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "adk-deploy", &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}
