mod commands;
mod envelope;

use anyhow::{Context, Result};
use clap::Parser;
use commands::{execute, Command};
use envelope::{render, ErrorEnvelope, MISSING_COMMAND};
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use supersonic_core::{init_logging, AppDirs, Config, LoggingGuard};
use ytmusic_provider::YtMusicCatalog;

#[derive(Debug, Parser)]
#[command(
    name = "music-api",
    about = "Music catalog lookups that print one JSON document per call",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Config file (defaults to config.toml in the platform config directory).
    /// Only recognised before the command name.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Command name followed by its positional arguments, taken verbatim
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

fn emit(document: &Value) {
    let mut stdout = std::io::stdout().lock();
    if let Err(err) = writeln!(stdout, "{document}").and_then(|()| stdout.flush()) {
        tracing::error!("failed to write response: {err}");
    }
}

/// Flattens an error chain into one line. Causes already quoted by the
/// message above them are not repeated.
fn startup_message(err: &anyhow::Error) -> String {
    let mut message = String::new();
    for cause in err.chain() {
        let text = cause.to_string();
        if message.ends_with(&text) {
            continue;
        }
        if !message.is_empty() {
            message.push_str(": ");
        }
        message.push_str(&text);
    }
    message
}

fn bootstrap(config_path: Option<&Path>) -> Result<(Config, LoggingGuard)> {
    let explicit = config_path.map(Config::load_from).transpose()?;
    let dirs = AppDirs::discover().context("failed to resolve application directories")?;
    let config = match explicit {
        Some(config) => config,
        None => Config::load_or_default(&dirs)?,
    };
    let guard = init_logging(&config.logging, &dirs).context("failed to initialize logging")?;
    Ok((config, guard))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let message = err.to_string();
            let first_line = message.lines().next().unwrap_or_default();
            emit(&ErrorEnvelope::new(first_line.trim_start_matches("error: ")).to_value());
            return ExitCode::FAILURE;
        }
    };

    let Some((name, args)) = cli.argv.split_first() else {
        emit(&ErrorEnvelope::new(MISSING_COMMAND).to_value());
        return ExitCode::FAILURE;
    };

    let command = match Command::from_args(name, args) {
        Ok(command) => command,
        Err(err) => {
            emit(&render(Err(err)));
            return ExitCode::SUCCESS;
        }
    };

    let (config, _logging) = match bootstrap(cli.config.as_deref()) {
        Ok(ready) => ready,
        Err(err) => {
            emit(&ErrorEnvelope::new(startup_message(&err)).to_value());
            return ExitCode::SUCCESS;
        }
    };

    let catalog = match YtMusicCatalog::new(&config.catalog) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!("failed to build catalog client: {err}");
            emit(&ErrorEnvelope::new(err.to_string()).to_value());
            return ExitCode::SUCCESS;
        }
    };

    tracing::info!(
        command = command.name(),
        base_url = %config.catalog.base_url,
        "dispatching command"
    );
    emit(&render(execute(&command, &catalog, &config.trending).await));
    ExitCode::SUCCESS
}
