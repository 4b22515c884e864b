// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! kiractl - the Kira personal assistant's command-line surface.

mod commands;
mod compose;
mod llm;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use commands::Invocation;
use compose::App;
use kira_core::KiraError;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kiractl", version, about = "Kira personal assistant CLI")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(long, global = true, default_value = "~/.kira/config.toml")]
    config: String,

    /// Override the vault root from the config file.
    #[arg(long, global = true)]
    vault: Option<PathBuf>,

    /// Emit machine-readable JSON instead of a human-readable line.
    #[arg(long, global = true)]
    json: bool,

    /// Correlate this invocation's audit entries and events under a fixed id.
    #[arg(long = "trace-id", global = true)]
    trace_id: Option<String>,

    /// Compute and report the effect without writing anything.
    #[arg(long = "dry-run", global = true)]
    dry_run: bool,

    /// Confirm a destructive or confirmation-gated action.
    #[arg(long = "yes", global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage tasks directly (bypassing the agent).
    Task {
        #[command(subcommand)]
        command: TaskCommand,
    },
    /// Publish an inbound message for ingestion into the vault.
    Run {
        /// The message text.
        text: String,
        /// The adapter or channel the message arrived on (e.g. "telegram").
        #[arg(long, default_value = "cli")]
        source: String,
        /// A source-scoped id used for dedupe (e.g. the provider's message id).
        #[arg(long = "external-id")]
        external_id: String,
    },
    /// Run environment and vault health checks.
    Doctor,
    /// Vault backup and restore.
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },
    /// Ask the agent to handle a request.
    Agent {
        #[command(subcommand)]
        command: AgentCommand,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Create a new task.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Update an existing task's status or title.
    Update {
        id: String,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete a task.
    Delete { id: String },
    /// Show one task.
    Get { id: String },
    /// List all tasks.
    List,
}

#[derive(Subcommand)]
enum BackupCommand {
    /// Create a new backup archive.
    Create,
    /// Restore a backup archive.
    Restore {
        backup_path: PathBuf,
        restore_path: PathBuf,
        #[arg(long)]
        overwrite: bool,
    },
    /// List backup archives.
    List,
    /// Delete backups beyond the configured retention count.
    Cleanup,
}

#[derive(Subcommand)]
enum AgentCommand {
    /// Send a message to the agent and print its reply.
    Ask {
        message: String,
        /// A canned JSON plan the fake provider returns when asked to plan.
        #[arg(long, default_value = "[]")]
        plan: String,
        /// A canned reply the fake provider returns for the final response.
        #[arg(long, default_value = "Done.")]
        reply: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let json = cli.json;
    let trace_id = cli.trace_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());

    if matches!(cli.command, Commands::Doctor) {
        return run_doctor(cli, &trace_id, json);
    }

    match run(cli, &trace_id).await {
        Ok(value) => {
            output::emit(json, &value, || "ok".to_string());
        }
        Err(err) => {
            let value = output::error(&trace_id, &err);
            output::emit(json, &value, || format!("error: {err}"));
            std::process::exit(err.exit_code());
        }
    }
}

/// `doctor` reports its own three-way exit code (0 ok / 1 fail / 2 warn)
/// rather than the shared `KiraError` table, so it is dispatched before
/// `run()`'s uniform error handling takes over.
fn run_doctor(cli: Cli, trace_id: &str, json: bool) {
    let config_path = compose::expand_tilde(&cli.config);
    let app = match App::bootstrap(&config_path, cli.vault.as_deref()) {
        Ok(app) => app,
        Err(err) => {
            let value = output::error(trace_id, &err);
            output::emit(json, &value, || format!("error: {err}"));
            std::process::exit(err.exit_code());
        }
    };

    let audit_dir = PathBuf::from("artifacts").join("audit");
    let report = commands::doctor::run(&app.vault_path, &audit_dir, Some(&config_path));
    let exit_code = report.exit_code();
    let value = output::success(trace_id, serde_json::to_value(&report).unwrap_or(serde_json::Value::Null));
    output::emit(json, &value, || format!("doctor: {:?}", report.summary.overall));
    std::process::exit(exit_code);
}

async fn run(cli: Cli, trace_id: &str) -> Result<serde_json::Value, KiraError> {
    let config_path = compose::expand_tilde(&cli.config);
    let app = App::bootstrap(&config_path, cli.vault.as_deref())?;

    let inv = Invocation {
        trace_id,
        json: cli.json,
        confirmed: cli.yes,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Task { command } => match command {
            TaskCommand::Create { title, tags, content } => {
                commands::task::create(&app.host, &app.policy, app.audit.as_ref(), inv, &title, &tags, content.as_deref())
            }
            TaskCommand::Update { id, status, title } => {
                commands::task::update(&app.host, &app.policy, app.audit.as_ref(), inv, &id, status.as_deref(), title.as_deref())
            }
            TaskCommand::Delete { id } => commands::task::delete(&app.host, &app.policy, app.audit.as_ref(), inv, &id),
            TaskCommand::Get { id } => commands::task::get(&app.host, &app.policy, inv, &id),
            TaskCommand::List => commands::task::list(&app.host, &app.policy, inv),
        },
        Commands::Run { text, source, external_id } => {
            commands::run::register_inbox_subscriber(
                &app.bus,
                app.host.clone(),
                app.dedupe.clone(),
                app.audit.clone(),
                app.clock.clone(),
            );
            commands::run::ingest(&app.bus, inv, &text, &source, &external_id)
        }
        Commands::Doctor => {
            let audit_dir = PathBuf::from("artifacts").join("audit");
            let report = commands::doctor::run(&app.vault_path, &audit_dir, Some(&config_path));
            let exit_code = report.exit_code();
            let value = serde_json::to_value(&report).unwrap_or(serde_json::Value::Null);
            if exit_code != 0 {
                return Err(KiraError::Validation(format!("doctor reported failures (exit {exit_code})")));
            }
            Ok(value)
        }
        Commands::Backup { command } => {
            let backup_dir = compose::expand_tilde(&app.config.backup.dir);
            match command {
                BackupCommand::Create => {
                    commands::backup::create(&app.vault_path, &backup_dir, app.config.backup.compress, app.clock.as_ref())
                }
                BackupCommand::Restore { backup_path, restore_path, overwrite } => {
                    commands::backup::restore(&backup_path, &restore_path, overwrite)
                }
                BackupCommand::List => commands::backup::list(&backup_dir),
                BackupCommand::Cleanup => commands::backup::cleanup(&backup_dir, app.config.backup.retention_count),
            }
        }
        Commands::Agent { command } => match command {
            AgentCommand::Ask { message, plan, reply } => {
                commands::agent::ask(&app, Arc::clone(&app.host), inv, &message, &plan, &reply).await
            }
        },
    }
}
