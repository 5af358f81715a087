//! Unrandom CLI
//!
//! Driver harness for the glibc `random()` state-reconstruction solver.
//!
//! # Usage
//! ```bash
//! # Reconstruct a generator from its own output stream
//! unrandom reconstruct 42
//!
//! # Check the reference generator against the raw additive sequence
//! unrandom compare 42 100000
//!
//! # Stress-sweep reconstruction across random seeds
//! unrandom sweep --count 10000 --export results/sweep.csv
//! ```

mod compare;
mod reconstruct;
mod sweep;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "unrandom")]
#[command(about = "Reconstructs glibc random() internal state from its output")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconstruct a generator seeded with <SEED> from its output stream
    Reconstruct {
        /// Non-zero generator seed
        seed: u32,
    },

    /// Compare generator output against the raw additive sequence
    Compare {
        /// Non-zero generator seed
        seed: u32,

        /// Number of outputs to check
        count: u64,
    },

    /// Reconstruct many randomly seeded generators and summarize
    Sweep {
        /// Number of random seeds to test
        #[arg(long, default_value = "1000")]
        count: usize,

        /// Seed for the sweep's own RNG (for reproducible sweeps)
        #[arg(long)]
        rng_seed: Option<u64>,

        /// Export per-seed results to CSV
        #[arg(long)]
        export: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Reconstruct { seed } => reconstruct::run(seed),
        Commands::Compare { seed, count } => compare::run(seed, count),
        Commands::Sweep {
            count,
            rng_seed,
            export,
        } => sweep::run(count, rng_seed, export),
    }
}
