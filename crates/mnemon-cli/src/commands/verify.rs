use anyhow::Result;
use clap::Args;

use crate::backend::open_ledger;
use crate::config::Config;
use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct VerifyArgs {
    /// Intent id to verify
    pub id: String,
}

pub fn run(args: &VerifyArgs, fmt: OutputFormat) -> Result<()> {
    let cfg = Config::load()?;
    let ledger = open_ledger(&cfg)?;
    let report = ledger.verify_intent(&args.id)?;
    print!("{}", format::format_verify(&report, fmt));
    Ok(())
}
