use anyhow::Result;
use clap::Args;

use crate::backend::open_ledger;
use crate::config::Config;
use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct ChainArgs {
    /// Head intent id; the chain is walked backward from here
    pub id: String,
}

pub fn run(args: &ChainArgs, fmt: OutputFormat) -> Result<()> {
    let cfg = Config::load()?;
    let ledger = open_ledger(&cfg)?;
    let report = ledger.chain_intent(&args.id)?;
    print!("{}", format::format_chain(&report, fmt));
    Ok(())
}
