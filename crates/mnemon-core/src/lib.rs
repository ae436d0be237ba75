//! Core engine of the mnemon ledger: content-addressed intent records,
//! hash-chained checkpoints, SQLite persistence and the backend contract
//! shared by local and remote ledgers.

pub mod chain;
pub mod error;
pub mod hash;
pub mod ledger;
pub mod model;
pub mod rehydrate;
pub mod store;
pub mod timeline;
pub mod verify;

pub use chain::{resolve_chain, ChainReport};
pub use error::CoreError;
pub use ledger::{Ledger, LocalLedger, NewIntent};
pub use model::{Checkpoint, IntentId, IntentRecord, Meta, Project, META_PROJECT_KEY};
pub use rehydrate::{rehydrate_project, RehydrateReport};
pub use store::{LedgerStore, ListOptions, DEFAULT_LIST_LIMIT};
pub use timeline::{merge_chronological, project_timeline, Timeline, TimelineEntry, TimelineEvent};
pub use verify::{verify_intent, VerifyReport};
