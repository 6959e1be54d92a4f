use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::parser::{LogType, Severity};

/// Real-time log analyzer
///
/// Monitors a log file from its current end, parses new lines using a
/// named format profile (syslog, apache, nginx, custom), and presents
/// filtered entries plus rolling statistics in a full-screen terminal
/// UI. `log-analyzer install` copies the binary to `~/.local/bin` and
/// registers it on PATH.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
pub struct Cli {
    /// Path to the log file to monitor
    #[arg(value_name = "LOG_FILE", required = true)]
    pub log_file: Option<PathBuf>,

    /// Log format type (defaults to config file value, then syslog)
    #[arg(short = 't', long = "type", value_name = "TYPE", value_enum)]
    pub log_type: Option<LogType>,

    /// Minimum severity level to display (defaults to config file value, then DEBUG)
    #[arg(long, value_name = "LEVEL", value_enum, ignore_case = true)]
    pub severity: Option<Severity>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install log-analyzer to ~/.local/bin and register it on PATH
    ///
    /// Creates ~/.local/bin and ~/.config/log-analyzer if absent,
    /// copies the running executable, marks it executable, and appends
    /// a PATH export to the shell startup file when needed.
    Install {
        /// Shell type (auto-detects from $SHELL if not specified)
        #[arg(short, long, value_name = "SHELL")]
        shell: Option<String>,
    },

    /// Remove the installed binary (config is preserved)
    Uninstall,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_asserts() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_watch_invocation() {
        let cli = Cli::parse_from([
            "log-analyzer",
            "/var/log/syslog",
            "-t",
            "apache",
            "--severity",
            "error",
        ]);
        assert_eq!(cli.log_file, Some(PathBuf::from("/var/log/syslog")));
        assert_eq!(cli.log_type, Some(LogType::Apache));
        assert_eq!(cli.severity, Some(Severity::Error));
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_requires_log_file_without_subcommand() {
        assert!(Cli::try_parse_from(["log-analyzer"]).is_err());
    }

    #[test]
    fn test_parse_install_subcommand() {
        let cli = Cli::parse_from(["log-analyzer", "install", "--shell", "bash"]);
        assert!(cli.log_file.is_none());
        match cli.command {
            Some(Commands::Install { shell }) => assert_eq!(shell.as_deref(), Some("bash")),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_severity_is_case_insensitive() {
        let cli = Cli::parse_from(["log-analyzer", "app.log", "--severity", "WARNING"]);
        assert_eq!(cli.severity, Some(Severity::Warning));
    }
}
