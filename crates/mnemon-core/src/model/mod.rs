pub mod checkpoint;
pub mod intent;
pub mod project;

pub use checkpoint::Checkpoint;
pub use intent::{IntentId, IntentRecord, Meta, META_PROJECT_KEY};
pub use project::Project;
