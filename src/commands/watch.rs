use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;
use tracing::info;

use crate::config::Config;
use crate::filter::LogFilter;
use crate::parser::{LogType, Severity};
use crate::tail::{self, TailControl};
use crate::tui::App;
use crate::{paths, tui};

pub fn execute(
    log_file: PathBuf,
    log_type: Option<LogType>,
    severity: Option<Severity>,
) -> Result<()> {
    if !log_file.exists() {
        anyhow::bail!("Log file '{}' not found", log_file.display());
    }

    let config = Config::load(&paths::config_file()?)?;

    // Precedence: CLI flag, then config file, then built-in default.
    let log_type = log_type.or(config.log_type).unwrap_or(LogType::Syslog);
    let severity = severity.or(config.severity).unwrap_or(Severity::Debug);

    let mut filter = LogFilter::new();
    filter.set_severity(severity);

    info!(
        log_file = %log_file.display(),
        %log_type,
        %severity,
        "starting monitor"
    );

    let control = TailControl::new();
    let (tx, rx) = mpsc::channel();
    let handle = tail::spawn(
        log_file.clone(),
        log_type,
        Duration::from_millis(config.poll_interval_ms),
        control.clone(),
        tx,
    )?;

    let app = App::new(log_file, log_type, filter, config.buffer_size, control);
    tui::run(app, rx, handle)
}
