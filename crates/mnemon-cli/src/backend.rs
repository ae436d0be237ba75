//! One-time backend selection: construct the ledger implementation the
//! config names and hand commands a `Box<dyn Ledger>`.

use anyhow::{bail, Context, Result};
use tracing::debug;

use mnemon_client::RemoteLedger;
use mnemon_core::ledger::{Ledger, LocalLedger};

use crate::config::{Config, Mode};

pub fn open_ledger(cfg: &Config) -> Result<Box<dyn Ledger>> {
    match cfg.mode {
        Mode::Local => Ok(Box::new(open_local(cfg)?)),
        Mode::Http => {
            let base_url = cfg
                .base_url
                .as_deref()
                .context("base_url is required when mode=http")?;
            debug!("using http ledger backend at {base_url}");
            let remote = RemoteLedger::new(base_url)?;
            Ok(Box::new(remote))
        }
    }
}

/// Open the local ledger directly, for operations that only exist in
/// local mode (rehydrate, export).
pub fn open_local(cfg: &Config) -> Result<LocalLedger> {
    if cfg.mode != Mode::Local {
        bail!("this command is only available in local mode");
    }
    let path = cfg
        .db_path
        .as_deref()
        .context("db_path is required when mode=local")?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create data dir: {}", parent.display()))?;
    }
    debug!("using local ledger backend at {}", path.display());
    LocalLedger::open(path).with_context(|| format!("open ledger at {}", path.display()))
}
