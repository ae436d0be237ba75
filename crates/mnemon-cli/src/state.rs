//! Mutable CLI state under `~/.mnemon`: the active project and the hash
//! of the last captured intent.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::state_dir;

#[derive(Debug, Default, Serialize, Deserialize)]
struct ProjectState {
    #[serde(default)]
    active_project: String,
}

fn state_path() -> Result<PathBuf> {
    Ok(state_dir()?.join("state.json"))
}

/// The active project name, or `None` when unset.
pub fn load_active_project() -> Result<Option<String>> {
    let path = state_path()?;
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(err).with_context(|| format!("read state file: {}", path.display()))
        }
    };
    if text.trim().is_empty() {
        return Ok(None);
    }
    let state: ProjectState = serde_json::from_str(&text)
        .with_context(|| format!("invalid state file: {}", path.display()))?;
    let active = state.active_project.trim().to_string();
    Ok(if active.is_empty() { None } else { Some(active) })
}

pub fn save_active_project(name: &str) -> Result<()> {
    let dir = state_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create state dir: {}", dir.display()))?;
    let state = ProjectState {
        active_project: name.to_string(),
    };
    let text = serde_json::to_string_pretty(&state).context("encode state")?;
    std::fs::write(state_path()?, text).context("write state file")
}

/// Record the hash of the most recently captured intent, for chaining.
pub fn save_last_hash(hash: &str) -> Result<()> {
    let dir = state_dir()?;
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create state dir: {}", dir.display()))?;
    std::fs::write(dir.join("last_hash"), format!("{hash}\n")).context("write last hash")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Serializing the state struct pins the on-disk shape.
    #[test]
    fn test_state_shape() {
        let state = ProjectState {
            active_project: "alpha".into(),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["active_project"], "alpha");
    }

    #[test]
    fn test_blank_active_project_reads_as_none() {
        let state: ProjectState = serde_json::from_str(r#"{"active_project": "  "}"#).unwrap();
        assert!(state.active_project.trim().is_empty());
    }
}
