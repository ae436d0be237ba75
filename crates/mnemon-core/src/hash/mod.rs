//! Canonical hashing: normalize a record, render its fixed-order JSON
//! preimage and digest it with SHA-256 (lowercase hex).
//!
//! The preimage key order is load-bearing; changing it changes every
//! stored hash. The orders are pinned by tests in the submodules.

pub mod checkpoint;
pub mod intent;
pub mod normalize;
pub mod project;

mod preimage;

pub use checkpoint::hash_checkpoint;
pub use intent::hash_intent;
pub use normalize::{canonical_timestamp, normalize_newlines, now_utc};
pub use project::hash_project;
