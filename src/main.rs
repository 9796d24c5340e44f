use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, trace};
use tracing_subscriber::EnvFilter;

use directrix::commands;
use directrix::config::DirectrixConfig;
use directrix::storage::StateStore;
use directrix::subprocess::production_runner;

/// Stand up and tear down BOSH directors
#[derive(Parser)]
#[command(name = "directrix")]
#[command(about = "Create and delete BOSH directors on provisioned AWS or GCP infrastructure", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory holding the environment state
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or update the director of the environment
    CreateDirector,
    /// Delete the director of the environment
    DeleteDirector,
    /// Show the load balancers in front of the environment
    Lbs {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let log_level = match verbose {
        0 => "info",
        1 => "debug",
        2 => "trace",
        _ => "trace,hyper=debug,tower=debug",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose >= 2)
        .with_thread_ids(verbose >= 3)
        .with_line_number(verbose >= 3)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    debug!("directrix started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = DirectrixConfig::load(cli.config.as_deref(), cli.state_dir.as_deref())?;
    let store = StateStore::new(&config.state_dir);
    let state = store
        .load()
        .with_context(|| format!("Failed to load state from {}", store.path().display()))?;
    let runner = production_runner();

    match cli.command {
        Commands::CreateDirector => {
            let manager = commands::build_manager(&config, &state, runner);
            let updated = commands::create_director(&manager, &store, &state).await?;
            println!(
                "director created: {} at {}",
                updated.bosh.director_name, updated.bosh.director_address
            );
        }
        Commands::DeleteDirector => {
            let manager = commands::build_manager(&config, &state, runner);
            if commands::delete_director(&manager, &store, &state).await? {
                println!("director deleted");
            } else {
                println!("no director to delete");
            }
        }
        Commands::Lbs { json } => {
            let terraform = commands::terraform(&config, runner);
            let report = commands::lbs(&terraform, &state).await?;
            if json {
                println!("{}", report.to_json()?);
            } else {
                for line in report.lines() {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
