use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;

use mnemon_core::hash::now_utc;
use mnemon_core::timeline::project_timeline;

use crate::backend::open_local;
use crate::config::Config;
use crate::output::format::render_markdown_log;
use crate::state::load_active_project;

const EXPORT_FILE: &str = "MNEMON_LOG.md";

#[derive(Args)]
pub struct ExportArgs {
    /// Export format (markdown)
    #[arg(long)]
    pub format: String,
}

pub fn run(args: &ExportArgs) -> Result<()> {
    if args.format.trim() != "markdown" {
        bail!("usage: mnemon export --format markdown");
    }

    let project = load_active_project()?.context("no active project set")?;

    let cfg = Config::load()?;
    let ledger = open_local(&cfg)?;
    let timeline = project_timeline(ledger.store(), &project)?;

    let content = render_markdown_log(&timeline, env!("CARGO_PKG_VERSION"), &now_utc());
    let path = Path::new(".").join(EXPORT_FILE);
    std::fs::write(&path, content)
        .with_context(|| format!("write export file: {}", path.display()))?;

    println!("Exported {}", path.display());
    Ok(())
}
