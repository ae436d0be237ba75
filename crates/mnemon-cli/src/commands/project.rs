use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use crate::backend::open_ledger;
use crate::config::Config;
use crate::state::{load_active_project, save_active_project};

#[derive(Args)]
pub struct ProjectArgs {
    #[command(subcommand)]
    pub command: ProjectCommand,
}

#[derive(Subcommand)]
pub enum ProjectCommand {
    /// Create a project
    Create {
        name: String,
        /// Optional description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// List projects, oldest first
    List,
    /// Set the active project
    Use { name: String },
    /// Show the active project
    Current,
}

pub fn run(args: &ProjectArgs) -> Result<()> {
    match &args.command {
        ProjectCommand::Create { name, description } => {
            let cfg = Config::load()?;
            let ledger = open_ledger(&cfg)?;
            let project = ledger.create_project(name, description)?;
            println!("Project created: {}", project.name);
        }
        ProjectCommand::List => {
            let cfg = Config::load()?;
            let ledger = open_ledger(&cfg)?;
            let projects = ledger.list_projects()?;
            println!("Name\tCreatedAt\tDescription");
            for project in projects {
                println!(
                    "{}\t{}\t{}",
                    project.name, project.created_at, project.description
                );
            }
        }
        ProjectCommand::Use { name } => {
            let cfg = Config::load()?;
            let ledger = open_ledger(&cfg)?;
            let known = ledger
                .list_projects()?
                .iter()
                .any(|project| project.name == *name);
            if !known {
                bail!("project not found: {name}");
            }
            save_active_project(name)?;
            println!("Active project set to {name}.");
        }
        ProjectCommand::Current => match load_active_project()? {
            Some(active) => println!("Active project: {active}"),
            None => println!("No active project"),
        },
    }
    Ok(())
}
