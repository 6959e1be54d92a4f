use crate::parser::{LogEntry, LogParser, LogType};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;

/// Shared flags controlling the tail thread.
#[derive(Debug, Clone)]
pub struct TailControl {
    paused: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl TailControl {
    pub fn new() -> Self {
        Self {
            paused: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn toggle_pause(&self) -> bool {
        let paused = !self.paused.load(Ordering::Relaxed);
        self.paused.store(paused, Ordering::Relaxed);
        paused
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }
}

impl Default for TailControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Follow `path` from its current end on a dedicated thread, sending
/// parsed entries over `tx`.
///
/// While paused the reader sleeps without consuming, so no lines are
/// lost. The thread exits when `control.stop()` is called or the
/// receiver is dropped; I/O failures terminate it with the error.
pub fn spawn(
    path: PathBuf,
    log_type: LogType,
    poll_interval: Duration,
    control: TailControl,
    tx: Sender<LogEntry>,
) -> Result<JoinHandle<Result<()>>> {
    let parser = LogParser::new()?;

    let handle = thread::Builder::new()
        .name("tail".to_string())
        .spawn(move || tail_loop(&path, log_type, &parser, poll_interval, &control, &tx))
        .context("Failed to spawn tail thread")?;

    Ok(handle)
}

fn tail_loop(
    path: &PathBuf,
    log_type: LogType,
    parser: &LogParser,
    poll_interval: Duration,
    control: &TailControl,
    tx: &Sender<LogEntry>,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open log file {path:?}"))?;
    let mut reader = BufReader::new(file);

    // Start at the end: only new lines are reported.
    reader
        .seek(SeekFrom::End(0))
        .with_context(|| format!("Failed to seek to end of {path:?}"))?;

    debug!(path = %path.display(), %log_type, "tailing log file");

    let mut buf = Vec::new();
    while control.is_running() {
        if control.is_paused() {
            thread::sleep(poll_interval);
            continue;
        }

        // Drain everything currently available, then wait for more.
        loop {
            buf.clear();
            let read = read_line(&mut reader, &mut buf)
                .with_context(|| format!("Failed to read from log file {path:?}"))?;
            if read == 0 {
                break;
            }

            let line = String::from_utf8_lossy(&buf);
            if let Some(entry) = parser.parse_line(&line, log_type) {
                if tx.send(entry).is_err() {
                    // Receiver gone, the UI is shutting down.
                    return Ok(());
                }
            }
        }

        thread::sleep(poll_interval);
    }

    Ok(())
}

/// Read up to the next newline without assuming valid UTF-8.
fn read_line(reader: &mut BufReader<File>, buf: &mut Vec<u8>) -> std::io::Result<usize> {
    use std::io::BufRead;

    let read = reader.by_ref().take(1 << 20).read_until(b'\n', buf)?;
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(read)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::OpenOptions;
    use std::io::Write;
    use std::sync::mpsc;
    use tempfile::TempDir;

    fn append(path: &PathBuf, line: &str) {
        let mut file = OpenOptions::new().append(true).open(path).unwrap();
        writeln!(file, "{line}").unwrap();
    }

    #[test]
    fn test_tail_reports_only_new_lines() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("app.log");
        std::fs::write(&path, "old - ERROR - svc - should not appear\n").unwrap();

        let (tx, rx) = mpsc::channel();
        let control = TailControl::new();
        let handle = spawn(
            path.clone(),
            LogType::Custom,
            Duration::from_millis(10),
            control.clone(),
            tx,
        )
        .unwrap();

        // Give the reader time to seek to the end before appending.
        thread::sleep(Duration::from_millis(100));
        append(&path, "2021-10-11 10:21:52 - ERROR - sshd - auth failure");

        let entry = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(entry.level, "ERROR");
        assert_eq!(entry.service, "sshd");
        assert_eq!(entry.message, "auth failure");

        control.stop();
        handle.join().unwrap().unwrap();
    }

    #[test]
    fn test_tail_missing_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.log");

        let (tx, _rx) = mpsc::channel();
        let control = TailControl::new();
        let handle = spawn(
            path,
            LogType::Syslog,
            Duration::from_millis(10),
            control,
            tx,
        )
        .unwrap();

        let result = handle.join().unwrap();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to open"));
    }

    #[test]
    fn test_pause_toggle() {
        let control = TailControl::new();
        assert!(!control.is_paused());
        assert!(control.toggle_pause());
        assert!(control.is_paused());
        assert!(!control.toggle_pause());
    }
}
