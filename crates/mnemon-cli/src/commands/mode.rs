use anyhow::Result;
use clap::Args;

use crate::config::{default_db_path, Config, Mode};

#[derive(Args)]
pub struct ModeArgs {
    /// Mode to switch to; omit to show the current mode
    #[arg(value_enum)]
    pub mode: Option<ModeChoice>,

    /// Remote base URL, used when switching to http
    #[arg(long, default_value = "http://localhost:8080")]
    pub base_url: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ModeChoice {
    Local,
    Http,
}

pub fn run(args: &ModeArgs) -> Result<()> {
    let Some(choice) = args.mode else {
        let cfg = Config::load()?;
        match cfg.mode {
            Mode::Local => println!("Current mode: local"),
            Mode::Http => println!(
                "Current mode: http ({})",
                cfg.base_url.as_deref().unwrap_or("")
            ),
        }
        return Ok(());
    };

    match choice {
        ModeChoice::Local => {
            let cfg = Config {
                mode: Mode::Local,
                db_path: Some(default_db_path()?),
                base_url: None,
            };
            cfg.save()?;
            println!("Mode set to local.");
        }
        ModeChoice::Http => {
            let cfg = Config {
                mode: Mode::Http,
                db_path: None,
                base_url: Some(args.base_url.clone()),
            };
            cfg.save()?;
            println!("Mode set to http ({}).", args.base_url);
        }
    }
    Ok(())
}
