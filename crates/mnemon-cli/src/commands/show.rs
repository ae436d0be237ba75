use anyhow::Result;
use clap::Args;

use crate::backend::open_ledger;
use crate::config::Config;
use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct ShowArgs {
    /// Intent id
    pub id: String,
}

pub fn run(args: &ShowArgs, fmt: OutputFormat) -> Result<()> {
    let cfg = Config::load()?;
    let ledger = open_ledger(&cfg)?;
    let intent = ledger.get_intent(&args.id)?;
    print!("{}", format::format_intent_full(&intent, fmt));
    Ok(())
}
