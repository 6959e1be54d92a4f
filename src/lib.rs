// Public API
pub mod cli;
pub mod commands;

// Core domain types
mod config;
mod filter;
mod installer;
mod parser;
mod paths;
mod shell;
mod stats;
mod tail;
mod tui;
mod ui;

// Re-export main types
pub use config::Config;
pub use filter::LogFilter;
pub use parser::{LogEntry, LogParser, LogType, Severity};
pub use shell::Shell;
pub use stats::Stats;
