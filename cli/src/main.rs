//! CLI entrypoint for agentflow
//!
//! Wires configuration, logging and the domain/infrastructure adapters
//! behind a few inspection commands.

mod cli;

use agentflow_application::SessionStore;
use agentflow_domain::Severity;
use agentflow_infrastructure::{ConfigLoader, FileConfig, JsonFileSessionStore};
use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command, SessionAction};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_deref()).context("failed to load configuration")?
    };

    let _log_guard = init_logging(cli.verbose, config.logging.directory.as_deref());
    info!("Starting agentflow");

    for issue in config.validate() {
        match issue.severity {
            Severity::Error => warn!("Config error: {}", issue.message),
            Severity::Warning => warn!("Config warning: {}", issue.message),
        }
    }

    match cli.command {
        Command::Check { text } => check(&config, &read_text(text)?, cli.json),
        Command::Sanitize { text } => {
            let gate = config.to_engine_config().safety_gate();
            println!("{}", gate.sanitize_output(&read_text(text)?));
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { sources, validate } => {
            show_config(&config, cli.config.as_deref(), sources, validate, cli.json)
        }
        Command::Sessions { action } => sessions(&config, action, cli.json).await,
    }
}

/// Initialize logging based on verbosity level; `RUST_LOG` takes precedence.
///
/// With a log directory configured, records are also written to a daily
/// rolling file. The returned guard must live until exit to flush it.
fn init_logging(verbose: u8, directory: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "agentflow.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(writer),
                )
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

fn read_text(text: Option<String>) -> Result<String> {
    match text {
        Some(text) => Ok(text),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
        }
    }
}

fn check(config: &FileConfig, text: &str, json: bool) -> Result<ExitCode> {
    let gate = config.to_engine_config().safety_gate();
    let result = gate.check_input(text);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.is_safe() {
        println!("SAFE: {}", result.details());
    } else {
        let kinds: Vec<&str> = result.violations().iter().map(|v| v.as_str()).collect();
        println!("UNSAFE [{}]: {}", kinds.join(", "), result.details());
    }

    Ok(if result.is_safe() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn show_config(
    config: &FileConfig,
    explicit: Option<&Path>,
    sources: bool,
    validate: bool,
    json: bool,
) -> Result<ExitCode> {
    if sources {
        ConfigLoader::print_config_sources(explicit);
        println!();
    }

    let issues = config.validate();
    if validate {
        if issues.is_empty() {
            println!("Configuration OK");
        }
        for issue in &issues {
            let label = match issue.severity {
                Severity::Error => "error",
                Severity::Warning => "warning",
            };
            println!("{}: {}", label, issue.message);
        }
    } else if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
    }

    Ok(if issues.iter().any(|i| i.is_error()) {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

async fn sessions(config: &FileConfig, action: SessionAction, json: bool) -> Result<ExitCode> {
    let Some(directory) = config.session.resolved_directory() else {
        bail!("no session directory configured and no platform data directory available");
    };
    let store = JsonFileSessionStore::new(
        directory,
        config.session.namespace.clone(),
        config.session.ttl(),
    );

    match action {
        SessionAction::List => {
            let ids = store.list_sessions().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ids)?);
            } else {
                for id in ids {
                    println!("{}", id);
                }
            }
        }
        SessionAction::Show { id } => {
            let Some(messages) = store.load(&id).await? else {
                bail!("session '{}' not found", id);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&messages)?);
            } else {
                for message in messages {
                    println!("[{}] {}", message.role.as_str(), message.content);
                }
            }
        }
        SessionAction::Delete { id } => {
            if store.delete(&id).await? {
                println!("Deleted session '{}'", id);
            } else {
                bail!("session '{}' not found", id);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
