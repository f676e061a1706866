use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use mortgage_sim::api::{self, DEFAULT_PORT};
use mortgage_sim::core::{
    DEFAULT_RUNS, MonteCarloConfig, default_conditions, default_inputs, run_conditions,
};
use mortgage_sim::report::{comparison_rows, render_table};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mortgage-sim",
    about = "Monte Carlo comparison of fixed, mixed and variable mortgage offers"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the simulation HTTP API
    Serve {
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Run a JSON simulation request and print the response
    Simulate {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, help = "Overrides the runs field of the request")]
        runs: Option<usize>,
        #[arg(long, help = "Overrides the seed field of the request")]
        seed: Option<u64>,
    },
    /// Compare the built-in offers
    Compare {
        #[arg(long, default_value_t = DEFAULT_RUNS)]
        runs: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, help = "Print rows as JSON instead of a table")]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Serve { port } => api::run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
        Command::Simulate { input, runs, seed } => simulate_file(&input, runs, seed),
        Command::Compare { runs, seed, json } => compare(runs, seed, json),
    };

    if let Err(e) = outcome {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOGGING_LEVEL").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn simulate_file(path: &Path, runs: Option<usize>, seed: Option<u64>) -> Result<(), String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {e}", path.display()))?;
    let mut request = api::request_from_json(&contents).map_err(|e| e.to_string())?;
    if runs.is_some() {
        request.runs = runs;
    }
    if seed.is_some() {
        request.seed = seed;
    }

    let response = api::run_simulation(&request).map_err(|e| e.to_string())?;
    let json = serde_json::to_string_pretty(&response).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn compare(runs: usize, seed: Option<u64>, json: bool) -> Result<(), String> {
    if runs == 0 {
        return Err("--runs must be > 0".to_string());
    }

    let results = run_conditions(
        &default_inputs(),
        &default_conditions(),
        MonteCarloConfig { runs, seed },
    )
    .map_err(|e| e.to_string())?;
    let rows = comparison_rows(&results);

    if json {
        let out = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
        println!("{out}");
    } else {
        println!("{}", render_table(&rows));
    }
    Ok(())
}
