use clap::{Parser, Subcommand};
use cogroute_replay::Objective;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cogroute")]
#[command(version)]
#[command(about = "Attention-aware routing of agent work to human operators")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Replay historical records under one policy or a grid of policies
    Evaluate {
        /// Historical records JSON array
        #[arg(long)]
        data: PathBuf,

        /// Policy overrides: a JSON file path or an inline JSON object
        #[arg(long)]
        policy: Option<String>,

        /// Policy grid JSON; takes precedence over --policy
        #[arg(long)]
        grid: Option<PathBuf>,

        /// Write the JSON result(s) here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Rank a policy grid against historical records
    Optimize {
        #[arg(long)]
        data: PathBuf,

        #[arg(long)]
        grid: PathBuf,

        /// human_rate, human_reduction or priority
        #[arg(long, default_value = "human_rate")]
        objective: Objective,

        /// Drop candidates whose router human rate exceeds this value
        #[arg(long)]
        max_router_rate: Option<f64>,

        /// Write the ranked candidates here
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Convert an incident CSV export into a historical records file
    Ingest {
        #[arg(long)]
        csv: PathBuf,

        #[arg(long)]
        out: PathBuf,

        /// Column mapping JSON; canonical header names are assumed otherwise
        #[arg(long)]
        mapping: Option<PathBuf>,
    },

    /// Route synthetic tasks through an in-memory pipeline
    Simulate {
        /// Number of task intents to generate
        #[arg(long, default_value_t = 5)]
        tasks: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Print version information
    Version,
}
