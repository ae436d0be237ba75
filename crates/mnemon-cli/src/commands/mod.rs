pub mod capture;
pub mod chain;
pub mod checkpoint;
pub mod export;
pub mod list;
pub mod mode;
pub mod project;
pub mod rehydrate;
pub mod show;
pub mod verify;
pub mod version;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Capture a prompt/response pair as a new intent
    Capture(capture::CaptureArgs),
    /// Recompute an intent's hash and compare to the stored one
    Verify(verify::VerifyArgs),
    /// Walk an intent's prev-hash chain, oldest to newest
    Chain(chain::ChainArgs),
    /// List intents (most recent first)
    List(list::ListArgs),
    /// Show full details of an intent
    Show(show::ShowArgs),
    /// Show or set the backend mode (local|http)
    Mode(mode::ModeArgs),
    /// Manage projects
    Project(project::ProjectArgs),
    /// Manage checkpoints for the active project
    Checkpoint(checkpoint::CheckpointArgs),
    /// Print the active project's latest checkpoint and intents since
    Rehydrate,
    /// Export the active project's history to a markdown log
    Export(export::ExportArgs),
    /// Print version information
    Version,
}
