//! run command - provision the configured users and groups

use super::CommandContext;
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use colored::Colorize;
use edir_client::{plan, Batch, BatchProvisioner, ProvisionError, RunReport, SessionClient};
use edir_core::{EntryKind, Journal, ProvisionConfig, Tone};
use tracing::info;

pub async fn execute(ctx: &CommandContext, dry_run: bool) -> Result<()> {
    let config = &ctx.config;

    if dry_run {
        let batches = batches(config);
        if batches.is_empty() {
            return Err(anyhow!(
                "No input files configured (input.users_file or input.groups_file)"
            ));
        }
        let journal = Journal::disabled(ctx.console());
        journal.say(Tone::Notice, "Dry run: no requests will be sent");
        let report = plan(&journal, batches);
        return print_summary(ctx, &report, true);
    }

    config.validate()?;
    let credentials = config.credentials()?;
    let client = SessionClient::new(&config.api)?;
    let journal = Journal::open(&config.logging.directory, ctx.console()).with_context(|| {
        format!(
            "Failed to open log directory: {}",
            config.logging.directory.display()
        )
    })?;

    journal.say(
        Tone::Detail,
        format!(
            "[{}] Starting the Script...",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
    );
    info!(logs = %config.logging.directory.display(), "Starting provisioning run");

    let result = BatchProvisioner::new(&client, &journal)
        .run(&credentials, batches(config))
        .await;

    match result {
        Ok(report) => {
            journal.say(Tone::Success, "Execution Completed!");
            print_summary(ctx, &report, false)
        }
        Err(ProvisionError::Teardown { source, report }) => {
            print_summary(ctx, &report, false)?;
            Err(ProvisionError::Teardown { source, report }.into())
        }
        Err(e) => Err(e.into()),
    }
}

/// Users first, then groups, skipping kinds with no configured file
fn batches(config: &ProvisionConfig) -> Vec<Batch> {
    [
        (EntryKind::User, &config.input.users_file),
        (EntryKind::Group, &config.input.groups_file),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.as_ref().map(|p| Batch::from_file(kind, p)))
    .collect()
}

fn print_summary(ctx: &CommandContext, report: &RunReport, dry_run: bool) -> Result<()> {
    if ctx.is_json() {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    println!();
    println!("{}", "Summary:".bold());
    for batch in &report.batches {
        let label = format!("{:<8}", batch.kind.plural());
        if let Some(err) = &batch.read_error {
            println!("  {} {}", label.cyan(), err.red());
            continue;
        }
        if dry_run {
            println!(
                "  {} {} valid, {} invalid",
                label.cyan(),
                batch.found,
                batch.rejected.len()
            );
        } else {
            println!(
                "  {} {} found, {} created, {} failed, {} invalid",
                label.cyan(),
                batch.found,
                batch.succeeded().to_string().green(),
                failed_count(batch.failed()),
                batch.rejected.len()
            );
        }
    }

    Ok(())
}

fn failed_count(failed: usize) -> String {
    if failed == 0 {
        failed.to_string()
    } else {
        failed.to_string().red().to_string()
    }
}
