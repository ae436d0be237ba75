use anyhow::Result;
use clap::Args;

use mnemon_core::store::{ListOptions, DEFAULT_LIST_LIMIT};

use crate::backend::open_ledger;
use crate::commands::capture::parse_meta_pairs;
use crate::config::Config;
use crate::output::{format, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    /// Filter by author (exact match)
    #[arg(long)]
    pub author: Option<String>,

    /// Filter by source type (exact match)
    #[arg(long)]
    pub source: Option<String>,

    /// Maximum records to return
    #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
    pub limit: usize,

    /// Meta filter key=value (repeatable; exact match; AND)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    pub meta: Vec<String>,
}

pub fn run(args: &ListArgs, fmt: OutputFormat) -> Result<()> {
    let meta = parse_meta_pairs(&args.meta)?.unwrap_or_default();

    let cfg = Config::load()?;
    let ledger = open_ledger(&cfg)?;
    let intents = ledger.list_intents(&ListOptions {
        author: args.author.clone(),
        source: args.source.clone(),
        meta,
        limit: Some(args.limit),
    })?;
    print!("{}", format::format_intent_list(&intents, fmt));
    Ok(())
}
