// crates/cli/src/main.rs
//! Provenance operator binary.
//!
//! `provenance recompute` rebuilds the global stat tables once; with
//! `--every SECS` (or `PROVENANCE_RECOMPUTE_INTERVAL_SECS`) it keeps doing
//! so until interrupted. Runs never overlap: the next sleep starts only after
//! the previous run has finished, and a failed run is logged and retried on
//! the next tick.

mod cli;
mod render;

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use provenance_db::Database;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::cli::{Cli, Command, OutputFormat};

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn open_db(cli: &Cli) -> Result<Database> {
    let db = match &cli.db {
        Some(path) => Database::new(path).await,
        None => Database::open_default().await,
    };
    db.context("Failed to open database")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// One recompute, logged. Returns whether it succeeded.
///
/// The store logs the completed run; this only adds the scheduler context.
async fn run_recompute_logged(db: &Database, label: &str) -> bool {
    let start = Instant::now();
    tracing::debug!(run_type = label, "Starting global stats recompute");

    match db.recompute_global_stats().await {
        Ok(_) => {
            tracing::debug!(
                run_type = label,
                elapsed_secs = start.elapsed().as_secs_f64(),
                "Scheduled recompute finished"
            );
            true
        }
        Err(e) => {
            tracing::error!(run_type = label, error = %e, "Recompute failed");
            false
        }
    }
}

/// Recompute now, then every `every` until `shutdown` resolves.
///
/// `shutdown` is polled across iterations, so a signal that arrives during a
/// run stops the loop as soon as that run finishes. Returns the number of
/// runs started.
async fn recompute_loop<F>(db: &Database, every: Duration, shutdown: F) -> usize
where
    F: Future<Output = ()>,
{
    tracing::info!(interval_secs = every.as_secs(), "Recompute scheduler started");
    tokio::pin!(shutdown);

    let mut runs = 1;
    run_recompute_logged(db, "initial").await;
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                tracing::info!(runs, "Recompute scheduler stopped");
                return runs;
            }
            _ = tokio::time::sleep(every) => {
                runs += 1;
                run_recompute_logged(db, "periodic").await;
            }
        }
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;
    let db = open_db(&cli).await?;

    match &cli.command {
        Command::Recompute { .. } => match cli.command.recompute_interval() {
            Some(every) => {
                recompute_loop(&db, every, ctrl_c()).await;
            }
            None => {
                let report = db.recompute_global_stats().await?;
                match cli.format {
                    OutputFormat::Json => print_json(&report)?,
                    OutputFormat::Text => print!("{}", render::recompute(&report)),
                }
            }
        },

        Command::Summary { repo } => {
            let repo = db
                .find_repo(repo)
                .await?
                .with_context(|| format!("Unknown repository: {repo}"))?;
            let summary = db.repo_attribution_summary(&repo.id, None).await?;
            let share = db.repo_human_share(&repo.id).await?;
            match cli.format {
                OutputFormat::Json => print_json(&serde_json::json!({
                    "repo": repo,
                    "attribution": summary,
                    "humanShare": share,
                }))?,
                OutputFormat::Text => {
                    print!("{}", render::summary(&repo, &summary, share.as_ref()))
                }
            }
        }

        Command::Weeks { limit } => {
            let rows = db.global_weekly_stats().await?;
            let recent = &rows[rows.len().saturating_sub(*limit)..];
            let share = db.global_human_share().await?;
            match cli.format {
                OutputFormat::Json => print_json(&recent)?,
                OutputFormat::Text => print!("{}", render::weeks(recent, share.as_ref())),
            }
        }

        Command::Unspecified => {
            let rows = db.unspecified_inventory().await?;
            match cli.format {
                OutputFormat::Json => print_json(&rows)?,
                OutputFormat::Text => print!("{}", render::unspecified(&rows)),
            }
        }
    }

    Ok(())
}
