use sha2::{Digest, Sha256};

/// Compute the integrity hash stored in the projects table:
/// `sha256(name + "\n" + description + "\n" + created_at)`.
pub fn hash_project(name: &str, description: &str, created_at: &str) -> String {
    let preimage = format!("{name}\n{description}\n{created_at}");
    format!("{:x}", Sha256::digest(preimage.as_bytes()))
}
