use anyhow::{Context, Result};
use chrono::Local;
use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Severity taxonomy, ordered most to least severe (syslog ordering).
///
/// The derived `Ord` follows declaration order, so `Emergency` sorts
/// before `Debug` and a threshold comparison reads as "at least this
/// important".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, ValueEnum, Serialize, Deserialize,
)]
#[value(rename_all = "UPPER")]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Info,
    Debug,
}

/// All severities, most severe first. Scan order matters for the
/// fallback parser: a line mentioning both CRITICAL and INFO is
/// classified as CRITICAL.
pub const ALL_SEVERITIES: [Severity; 8] = [
    Severity::Emergency,
    Severity::Alert,
    Severity::Critical,
    Severity::Error,
    Severity::Warning,
    Severity::Notice,
    Severity::Info,
    Severity::Debug,
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown severity level '{0}'")]
pub struct UnknownSeverity(pub String);

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
        }
    }

    /// ERROR and above (excluding WARNING) count toward the error rate.
    pub fn is_error(self) -> bool {
        self <= Severity::Error
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "EMERGENCY" => Ok(Severity::Emergency),
            "ALERT" => Ok(Severity::Alert),
            "CRITICAL" => Ok(Severity::Critical),
            "ERROR" => Ok(Severity::Error),
            "WARNING" => Ok(Severity::Warning),
            "NOTICE" => Ok(Severity::Notice),
            "INFO" => Ok(Severity::Info),
            "DEBUG" => Ok(Severity::Debug),
            _ => Err(UnknownSeverity(s.to_string())),
        }
    }
}

/// Named log format profile selecting how lines are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[value(rename_all = "lower")]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    Syslog,
    Apache,
    Nginx,
    Custom,
}

impl LogType {
    pub fn as_str(self) -> &'static str {
        match self {
            LogType::Syslog => "syslog",
            LogType::Apache => "apache",
            LogType::Nginx => "nginx",
            LogType::Custom => "custom",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single parsed log line.
///
/// `level` keeps the raw captured text; unknown levels still flow
/// through stats and filtering (they count under their own name and
/// pass the severity threshold).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: String,
    pub service: String,
    pub message: String,
}

impl LogEntry {
    pub fn severity(&self) -> Option<Severity> {
        self.level.parse().ok()
    }
}

/// Line parser holding one compiled pattern per format profile.
#[derive(Debug)]
pub struct LogParser {
    syslog: Regex,
    apache: Regex,
    nginx: Regex,
    custom: Regex,
}

impl LogParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            syslog: compile(
                r"^(?P<timestamp>\w{3}\s+\d{1,2}\s+\d{2}:\d{2}:\d{2})\s+\w+\s+(?P<service>\w+)\[?\d*\]?:\s+(?P<level>\w+):?\s+(?P<message>.*)",
            )?,
            apache: compile(
                r"^\[(?P<timestamp>.*?)\]\s+\[(?P<level>.*?)\]\s+\[pid \d+\]\s+\[client .*?\]\s+(?P<message>.*)",
            )?,
            nginx: compile(
                r"^(?P<timestamp>\d{4}/\d{2}/\d{2}\s+\d{2}:\d{2}:\d{2})\s+\[(?P<level>.*?)\]\s+\d+#\d+:\s+\*\d+\s+(?P<message>.*)",
            )?,
            custom: compile(
                r"^(?P<timestamp>.*?)\s+-\s+(?P<level>\w+)\s+-\s+(?P<service>\w+)\s+-\s+(?P<message>.*)",
            )?,
        })
    }

    fn pattern(&self, log_type: LogType) -> &Regex {
        match log_type {
            LogType::Syslog => &self.syslog,
            LogType::Apache => &self.apache,
            LogType::Nginx => &self.nginx,
            LogType::Custom => &self.custom,
        }
    }

    /// Parse a raw line into a structured entry.
    ///
    /// Lines that do not match the selected profile fall back to a
    /// severity-name scan; lines with no recognizable severity are
    /// dropped (`None`).
    pub fn parse_line(&self, line: &str, log_type: LogType) -> Option<LogEntry> {
        let line = line.trim();

        if let Some(caps) = self.pattern(log_type).captures(line) {
            let group = |name: &str| {
                caps.name(name)
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default()
            };
            let service = caps
                .name("service")
                .map(|m| m.as_str().to_string())
                .unwrap_or_else(|| "unknown".to_string());

            return Some(LogEntry {
                timestamp: group("timestamp"),
                level: group("level"),
                service,
                message: group("message"),
            });
        }

        // Fallback: classify by any severity name appearing in the line.
        let upper = line.to_uppercase();
        for severity in ALL_SEVERITIES {
            if upper.contains(severity.as_str()) {
                return Some(LogEntry {
                    timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
                    level: severity.as_str().to_string(),
                    service: "unknown".to_string(),
                    message: line.to_string(),
                });
            }
        }

        None
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).with_context(|| format!("Failed to compile log pattern {pattern:?}"))
}
