use anyhow::{bail, Context, Result};

use mnemon_core::error::CoreError;
use mnemon_core::rehydrate::rehydrate_project;

use crate::backend::open_local;
use crate::config::Config;
use crate::state::load_active_project;

pub fn run() -> Result<()> {
    let project = load_active_project()?.context("no active project set")?;

    let cfg = Config::load()?;
    let ledger = open_local(&cfg)?;
    let report = match rehydrate_project(ledger.store(), &project) {
        Ok(report) => report,
        Err(CoreError::CheckpointNotFound(_)) => {
            bail!("no checkpoint found for active project")
        }
        Err(err) => return Err(err.into()),
    };

    println!("Project: {}", report.project);
    println!("Latest Checkpoint:");
    println!("* CreatedAt: {}", report.latest_checkpoint.created_at);
    println!("* Summary: {}", report.latest_checkpoint.summary);
    println!("Artifacts Since Checkpoint:");
    if report.intents_since.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for (i, intent) in report.intents_since.iter().enumerate() {
        println!("{}. {} {} intent", i + 1, intent.id, intent.created_at);
    }
    Ok(())
}
