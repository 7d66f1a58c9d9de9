mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{analyze, classify};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match &cli.command {
        Commands::Analyze(args) => analyze::run(&cli, args),
        Commands::Classify(args) => classify::run(&cli, args),
    }
}

fn main() -> anyhow::Result<()> { run() }
