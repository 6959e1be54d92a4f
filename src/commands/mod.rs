use crate::cli::{Cli, Commands};
use anyhow::{Context, Result};

mod install;
mod uninstall;
mod watch;

pub fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Install { shell }) => install::execute(shell.as_deref()),

        Some(Commands::Uninstall) => uninstall::execute(),

        None => {
            // clap guarantees the positional when no subcommand is given.
            let log_file = cli.log_file.context("missing log file argument")?;
            watch::execute(log_file, cli.log_type, cli.severity)
        }
    }
}
