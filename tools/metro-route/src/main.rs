use std::io;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{ArgAction, Parser, Subcommand};
use metro_route::report::{format_route, run_checks};
use metro_route::{load_graph, Console};
use metro_routing::{find_shortest, Metric};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "metro-route")]
#[command(version)]
#[command(about = "Optimal metro routes by time or distance, with minimal interchanges", long_about = None)]
struct Cli {
    /// TOML network file (defaults to the built-in sample network)
    #[arg(long, global = true)]
    network: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the best route between two stations (name or id)
    Route {
        from: String,
        to: String,
        /// Cost to minimise: "time" or "distance"; anything else means time
        #[arg(short, long, default_value = "time")]
        metric: String,
    },
    /// Print every station and its outgoing routes
    Show,
    /// Run the sample route checks
    Check,
    /// Interactive console menu
    Interactive,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let graph = load_graph(cli.network.as_deref())?;

    match cli.command {
        Commands::Route { from, to, metric } => {
            let route = find_shortest(&graph, &from, &to, Metric::from(metric.as_str()))?;
            println!("{}", format_route(&route));
        }
        Commands::Show => {
            print!("{graph}");
        }
        Commands::Check => {
            if !run_checks(&graph, &mut io::stdout().lock())? {
                bail!("Sample checks failed");
            }
        }
        Commands::Interactive => {
            let stdin = io::stdin();
            Console::new(graph, stdin.lock(), io::stdout()).run()?;
        }
    }

    Ok(())
}
