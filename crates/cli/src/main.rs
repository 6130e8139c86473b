//! Platform simulator CLI.
//!
//! This binary drives one simulation run. It performs:
//! 1. **Load:** Reads the top-level PLATFORM file and every component it references.
//! 2. **Run:** Simulates the number of cycles given by `--cycles`, or prompted on stdin.
//! 3. **Report:** Prints the component tree, the registry and the run statistics.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use plasim_core::Simulator;
use plasim_core::sim::FsProvider;
use plasim_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "plasim",
    author,
    version,
    about = "Cycle-stepped toy platform simulator",
    long_about = "Load a PLATFORM description (KEY: VALUE files) and simulate it cycle by cycle.\n\nLog verbosity follows RUST_LOG (default: info).\n\nExamples:\n  plasim demos/platform.txt --cycles 10\n  plasim demos/platform.txt --stats-json"
)]
struct Cli {
    /// Top-level PLATFORM configuration file.
    config: String,

    /// Number of cycles to simulate. Prompted on stdin when absent.
    #[arg(short, long)]
    cycles: Option<u64>,

    /// Print statistics as JSON instead of the text report.
    #[arg(long)]
    stats_json: bool,

    /// Restrict the text report to these sections (summary, processing, dataflow).
    #[arg(long = "stats", value_parser = clap::builder::PossibleValuesParser::new(STATS_SECTIONS))]
    stats_sections: Vec<String>,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let provider = FsProvider::for_config(&cli.config);
    let mut sim = Simulator::new();
    if let Err(error) = sim.load_platform(&provider, &cli.config) {
        tracing::error!(path = %cli.config, %error, "could not load platform");
        return ExitCode::FAILURE;
    }

    let cycles = cli.cycles.unwrap_or_else(prompt_cycles);
    sim.run(cycles);

    println!("\n=== Components ===");
    print!("{}", sim.describe_tree());
    println!("\n=== Registry ===");
    for entry in sim.registry().entries() {
        println!("  {:<16} {}", entry.label, entry.handle);
    }

    if cli.stats_json {
        match serde_json::to_string_pretty(sim.stats()) {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::error!(%error, "could not serialize statistics"),
        }
    } else {
        sim.stats().print_sections(&cli.stats_sections);
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Asks for a cycle count on stdin. Unparsable input runs a single cycle.
fn prompt_cycles() -> u64 {
    print!("Enter number of cycles to simulate: ");
    let _ = io::stdout().flush();
    let mut line = String::new();
    if let Err(error) = io::stdin().lock().read_line(&mut line) {
        tracing::warn!(%error, "could not read cycle count; running 1 cycle");
        return 1;
    }
    line.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(input = line.trim(), "invalid cycle count; running 1 cycle");
        1
    })
}
