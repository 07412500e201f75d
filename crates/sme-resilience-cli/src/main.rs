mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::simulation::{KeyDriversArgs, SimulateArgs};

/// SME resilience scenario simulator
#[derive(Parser)]
#[command(
    name = "smers",
    version,
    about = "Baseline vs. sustainability-investment simulator for SMEs",
    long_about = "Projects a small or medium-sized enterprise over a multi-year horizon \
                  under a baseline and a sustainability-investment scenario, then derives \
                  scores, financial and environmental indicators, a risk heatmap, alerts \
                  and the key drivers of each outcome. All arithmetic is decimal."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level written to stderr (RUST_LOG overrides)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full simulation and print the result envelope
    Simulate(SimulateArgs),
    /// Rank the inputs that move each outcome metric the most
    KeyDrivers(KeyDriversArgs),
    /// Print the default input record
    Defaults,
    /// Print the methodology constants and assumption statements
    Methodology,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::KeyDrivers(args) => commands::simulation::run_key_drivers(args),
        Commands::Defaults => commands::simulation::run_defaults(),
        Commands::Methodology => commands::simulation::run_methodology(),
        Commands::Version => {
            println!("smers {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
