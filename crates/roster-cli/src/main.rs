//! Roster ingest CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use roster_cli::config::load_config;
use roster_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod progress;
mod summary;
mod types;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    resolve_config_path, run_config, run_fields, run_multi_upload, run_template, run_upload,
};
use crate::types::UploadOutcome;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let config_path = match resolve_config_path(cli.config.as_deref()) {
        Ok(path) => path,
        Err(error) => {
            eprintln!("error: {error:#}");
            std::process::exit(1);
        }
    };
    let config = load_config(&config_path).with_base_url(cli.base_url.as_deref());

    let exit_code = match &cli.command {
        Command::Upload(args) => match run_upload(args, &config).await {
            Ok(outcome) => {
                report_outcome(&outcome);
                outcome.exit_code()
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::UploadMulti(args) => match run_multi_upload(args, &config).await {
            Ok(outcome) => {
                report_outcome(&outcome);
                outcome.exit_code()
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Template(args) => match run_template(args, &config).await {
            Ok(path) => {
                println!("Template written to {}", path.display());
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Fields => {
            run_fields();
            0
        }
        Command::Config(args) => match run_config(args, &config_path, &config) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

fn report_outcome(outcome: &UploadOutcome) {
    match outcome {
        UploadOutcome::Rejected(message) | UploadOutcome::UploadFailed(message) => {
            eprintln!("error: {message}");
        }
        UploadOutcome::Blocked(_) => {
            eprintln!("error: please map all required fields before processing");
        }
        UploadOutcome::DryRun { ready } => {
            println!("Dry run: mapping {}, nothing submitted.", if *ready { "ready" } else { "blocked" });
        }
        UploadOutcome::ProcessingFailed(message) => {
            eprintln!("error: {message}");
            eprintln!("The mapping was kept; fix it and run the upload again.");
        }
        UploadOutcome::Processed(_) | UploadOutcome::Merged(_) => {}
    }
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        log_data: cli.log_data,
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
