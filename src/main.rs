//! Rockety - frontend project scaffolding
//!
//! CLI entry point that dispatches to subcommands.

use clap::{CommandFactory, Parser};
use console::style;
use rockety::cli::{commands, Cli, Commands};
use rockety::config::ConfigManager;
use rockety::error::{RocketyError, RocketyResult};
use rockety::ui;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> RocketyResult<ExitCode> {
    let cli = Cli::parse();

    let manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    ui::init_theme();

    match cli.command {
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| RocketyError::io("printing help", e))?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Create(args)) => {
            commands::create(args, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Tasks) => {
            let code = commands::proxy(vec!["tasks".to_string()], &config).await?;
            Ok(exit_code(code))
        }
        Some(Commands::External(args)) => {
            let code = commands::proxy(args, &config).await?;
            Ok(exit_code(code))
        }
        Some(Commands::Cache(args)) => {
            commands::cache(args, &config).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Config(args)) => {
            commands::config(args, &config, &manager).await?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "rockety", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// 0 = warn (ui output only), 1 = info, 2+ = debug
fn init_logging(verbose: u8, format: &str) {
    let filter = match verbose {
        0 => EnvFilter::new("rockety=warn"),
        1 => EnvFilter::new("rockety=info"),
        _ => EnvFilter::new("rockety=debug"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time();

    if format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Child exit status as our own; signals and out-of-range codes become 1
fn exit_code(code: i32) -> ExitCode {
    match u8::try_from(code) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(code) => ExitCode::from(code),
        Err(_) => ExitCode::FAILURE,
    }
}
