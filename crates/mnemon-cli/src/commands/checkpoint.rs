use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::backend::open_ledger;
use crate::config::Config;
use crate::state::load_active_project;

#[derive(Args)]
pub struct CheckpointArgs {
    #[command(subcommand)]
    pub command: CheckpointCommand,
}

#[derive(Subcommand)]
pub enum CheckpointCommand {
    /// Create a checkpoint for the active project
    Create {
        /// Checkpoint summary
        #[arg(long)]
        summary: String,
    },
    /// List the active project's checkpoints, newest first
    List,
}

pub fn run(args: &CheckpointArgs) -> Result<()> {
    let project = load_active_project()?.context("no active project set")?;

    match &args.command {
        CheckpointCommand::Create { summary } => {
            let cfg = Config::load()?;
            let ledger = open_ledger(&cfg)?;
            let checkpoint = ledger.create_checkpoint(&project, summary, Vec::new())?;
            println!("id: {}", checkpoint.hash);
            println!("summary: {}", checkpoint.summary);
        }
        CheckpointCommand::List => {
            let cfg = Config::load()?;
            let ledger = open_ledger(&cfg)?;
            let checkpoints = ledger.list_checkpoints(&project)?;
            println!("Index\tCreatedAt\tSummary");
            for (i, checkpoint) in checkpoints.iter().enumerate() {
                println!("{}\t{}\t{}", i + 1, checkpoint.created_at, checkpoint.summary);
            }
        }
    }
    Ok(())
}
