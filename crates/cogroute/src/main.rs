mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Evaluate {
            data,
            policy,
            grid,
            out,
        } => commands::evaluate::run(&data, policy.as_deref(), grid.as_deref(), out.as_deref()),
        Commands::Optimize {
            data,
            grid,
            objective,
            max_router_rate,
            out,
        } => commands::optimize::run(&data, &grid, objective, max_router_rate, out.as_deref()),
        Commands::Ingest { csv, out, mapping } => {
            commands::ingest::run(&csv, &out, mapping.as_deref())
        }
        Commands::Simulate { tasks, seed } => commands::simulate::run(tasks, seed),
        Commands::Version => commands::version::run(),
    }
}
