use anyhow::Result;
use clap::Parser;
use log_analyzer::cli::Cli;
use log_analyzer::commands;

fn main() -> Result<()> {
    // Parse CLI arguments first so --verbose can raise the filter
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "log_analyzer=debug"
    } else {
        "log_analyzer=info"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    commands::execute(cli)
}
