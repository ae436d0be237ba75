//! CLI configuration loaded from `~/.mnemon/config.yaml`.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Local,
    Http,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Local => write!(f, "local"),
            Mode::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default = "default_mode")]
    pub mode: Mode,
    #[serde(default)]
    pub db_path: Option<PathBuf>,
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_mode() -> Mode {
    Mode::Local
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::Local,
            db_path: None,
            base_url: None,
        }
    }
}

impl Config {
    /// Read the config file, falling back to defaults when it is missing.
    pub fn load() -> Result<Self> {
        let path = config_path()?;
        let mut cfg = match std::fs::read_to_string(&path) {
            Ok(text) => serde_yaml::from_str::<Config>(&text)
                .with_context(|| format!("invalid config: {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Config::default(),
            Err(err) => {
                return Err(err).with_context(|| format!("read config: {}", path.display()))
            }
        };
        cfg.normalize()?;
        Ok(cfg)
    }

    fn normalize(&mut self) -> Result<()> {
        if let Some(url) = &self.base_url {
            let url = url.trim().to_string();
            self.base_url = if url.is_empty() { None } else { Some(url) };
        }
        match self.mode {
            Mode::Local => {
                if self.db_path.is_none() {
                    self.db_path = Some(default_db_path()?);
                }
            }
            Mode::Http => {
                if self.base_url.is_none() {
                    bail!("base_url is required when mode=http");
                }
            }
        }
        Ok(())
    }

    /// Write the config file, creating `~/.mnemon` if needed.
    pub fn save(&self) -> Result<()> {
        let dir = state_dir()?;
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("create config dir: {}", dir.display()))?;
        let path = config_path()?;
        let text = serde_yaml::to_string(self).context("encode config")?;
        std::fs::write(&path, text).with_context(|| format!("write config: {}", path.display()))
    }
}

/// The `~/.mnemon` directory holding config, state and the default db.
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MNEMON_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = dirs::home_dir().context("resolve home directory")?;
    Ok(home.join(".mnemon"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(state_dir()?.join("config.yaml"))
}

pub fn default_db_path() -> Result<PathBuf> {
    Ok(state_dir()?.join("mnemon.db"))
}
