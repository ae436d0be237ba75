use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod backend;
mod commands;
mod config;
mod output;
mod state;

#[derive(Parser)]
#[command(
    name = "mnemon",
    version,
    about = "Personal hash-chained ledger of agent intents"
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Output format
    // Stored as a raw string because the `export` subcommand overrides the
    // same `format` id with its own string-valued `--format`; clap requires
    // the shared id to carry one value type. Parsed via `parse_format` where
    // an `OutputFormat` is needed.
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: commands::Commands,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_format(raw: &str) -> Result<output::OutputFormat> {
    <output::OutputFormat as clap::ValueEnum>::from_str(raw, false)
        .map_err(|_| anyhow::anyhow!("invalid value '{raw}' for '--format' (expected text | json)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        commands::Commands::Capture(args) => commands::capture::run(args),
        commands::Commands::Verify(args) => commands::verify::run(args, parse_format(&cli.format)?),
        commands::Commands::Chain(args) => commands::chain::run(args, parse_format(&cli.format)?),
        commands::Commands::List(args) => commands::list::run(args, parse_format(&cli.format)?),
        commands::Commands::Show(args) => commands::show::run(args, parse_format(&cli.format)?),
        commands::Commands::Mode(args) => commands::mode::run(args),
        commands::Commands::Project(args) => commands::project::run(args),
        commands::Commands::Checkpoint(args) => commands::checkpoint::run(args),
        commands::Commands::Rehydrate => commands::rehydrate::run(),
        commands::Commands::Export(args) => commands::export::run(args),
        commands::Commands::Version => commands::version::run(),
    }
}
