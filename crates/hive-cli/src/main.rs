//! Hive CLI - run and inspect a swarm from the terminal.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hive")]
#[command(author, version, about = "Hive - stigmergic swarm coordination", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default hive.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing hive.toml
        #[arg(long)]
        force: bool,
    },

    /// Run a simulated hive
    Run {
        /// Number of ticks to run (default: from hive.toml)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Number of flowers to plant (default: from hive.toml)
        #[arg(short, long)]
        flowers: Option<usize>,

        /// RNG seed, overriding hive.toml
        #[arg(short, long)]
        seed: Option<u64>,

        /// Tick on the wall clock instead of simulated time
        #[arg(long)]
        realtime: bool,

        /// Stream events to stdout as JSON lines
        #[arg(short, long)]
        events: bool,
    },

    /// Run a simulated hive and print its emergent decision as JSON
    Decide {
        /// Trail-type context, or "all"
        #[arg(default_value = "all")]
        context: String,

        /// Number of ticks to run first (default: from hive.toml)
        #[arg(short, long)]
        ticks: Option<u64>,

        /// RNG seed, overriding hive.toml
        #[arg(short, long)]
        seed: Option<u64>,
    },
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Run {
            ticks,
            flowers,
            seed,
            realtime,
            events,
        } => commands::run::run(
            commands::run::RunOptions {
                ticks,
                flowers,
                seed,
                realtime,
                events,
            },
            cli.verbose,
        ),
        Commands::Decide {
            context,
            ticks,
            seed,
        } => commands::decide::run(&context, ticks, seed),
    }
}
