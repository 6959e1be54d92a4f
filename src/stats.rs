use crate::parser::{LogEntry, Severity};
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};

/// Throughput is measured over a trailing window of this length.
const THROUGHPUT_WINDOW: Duration = Duration::from_secs(10);

/// Rolling statistics over the monitored stream.
///
/// Keeps a bounded ring of recent entries for the logs view plus
/// per-level and per-service counters for the summary views.
#[derive(Debug)]
pub struct Stats {
    pub total: u64,
    pub errors: u64,
    pub warnings: u64,
    pub by_level: HashMap<String, u64>,
    pub by_service: HashMap<String, u64>,
    recent: VecDeque<LogEntry>,
    arrivals: VecDeque<Instant>,
    started: Instant,
    buffer_size: usize,
}

impl Stats {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            total: 0,
            errors: 0,
            warnings: 0,
            by_level: HashMap::new(),
            by_service: HashMap::new(),
            recent: VecDeque::with_capacity(buffer_size),
            arrivals: VecDeque::new(),
            started: Instant::now(),
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn record(&mut self, entry: LogEntry) {
        self.total += 1;

        let level = entry.level.to_uppercase();
        *self.by_level.entry(level).or_insert(0) += 1;
        *self.by_service.entry(entry.service.clone()).or_insert(0) += 1;

        match entry.severity() {
            Some(severity) if severity.is_error() => self.errors += 1,
            Some(Severity::Warning) => self.warnings += 1,
            _ => {}
        }

        if self.recent.len() == self.buffer_size {
            self.recent.pop_front();
        }
        self.recent.push_back(entry);

        let now = Instant::now();
        self.prune_arrivals(now);
        self.arrivals.push_back(now);
    }

    /// Entries per second over the trailing window.
    pub fn throughput(&self) -> f64 {
        let now = Instant::now();
        let recent = self
            .arrivals
            .iter()
            .filter(|arrival| now.duration_since(**arrival) <= THROUGHPUT_WINDOW)
            .count();
        recent as f64 / THROUGHPUT_WINDOW.as_secs_f64()
    }

    /// Percentage of entries at ERROR severity or above.
    pub fn error_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.errors as f64 / self.total as f64) * 100.0
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Recent entries, oldest first.
    pub fn recent(&self) -> impl Iterator<Item = &LogEntry> {
        self.recent.iter()
    }

    /// Level counters sorted by count, descending.
    pub fn levels_by_count(&self) -> Vec<(&str, u64)> {
        let mut levels: Vec<_> = self
            .by_level
            .iter()
            .map(|(level, count)| (level.as_str(), *count))
            .collect();
        levels.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        levels
    }

    /// Service counters sorted by count, descending.
    pub fn services_by_count(&self) -> Vec<(&str, u64)> {
        let mut services: Vec<_> = self
            .by_service
            .iter()
            .map(|(service, count)| (service.as_str(), *count))
            .collect();
        services.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        services
    }

    fn prune_arrivals(&mut self, now: Instant) {
        while let Some(front) = self.arrivals.front() {
            if now.duration_since(*front) > THROUGHPUT_WINDOW {
                self.arrivals.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::LogEntry;

    fn entry(level: &str, service: &str) -> LogEntry {
        LogEntry {
            timestamp: "Jan 12 06:25:14".to_string(),
            level: level.to_string(),
            service: service.to_string(),
            message: "message".to_string(),
        }
    }

    #[test]
    fn test_counts_by_class() {
        let mut stats = Stats::new(100);
        stats.record(entry("ERROR", "sshd"));
        stats.record(entry("critical", "sshd"));
        stats.record(entry("WARNING", "nginx"));
        stats.record(entry("INFO", "nginx"));
        stats.record(entry("VERBOSE", "nginx")); // unknown level

        assert_eq!(stats.total, 5);
        assert_eq!(stats.errors, 2);
        assert_eq!(stats.warnings, 1);
        assert_eq!(stats.by_level["ERROR"], 1);
        assert_eq!(stats.by_level["CRITICAL"], 1); // uppercased key
        assert_eq!(stats.by_level["VERBOSE"], 1);
        assert_eq!(stats.by_service["nginx"], 3);
    }

    #[test]
    fn test_error_rate() {
        let mut stats = Stats::new(100);
        assert_eq!(stats.error_rate(), 0.0);

        stats.record(entry("ERROR", "sshd"));
        stats.record(entry("INFO", "sshd"));
        stats.record(entry("INFO", "sshd"));
        stats.record(entry("INFO", "sshd"));

        assert!((stats.error_rate() - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recent_ring_is_bounded() {
        let mut stats = Stats::new(3);
        for i in 0..5 {
            let mut e = entry("INFO", "svc");
            e.message = format!("message {i}");
            stats.record(e);
        }

        let messages: Vec<_> = stats.recent().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["message 2", "message 3", "message 4"]);
        assert_eq!(stats.total, 5);
    }

    #[test]
    fn test_throughput_counts_recent_arrivals() {
        let mut stats = Stats::new(10);
        assert_eq!(stats.throughput(), 0.0);
        for _ in 0..20 {
            stats.record(entry("INFO", "svc"));
        }
        // 20 entries in well under the window.
        assert!((stats.throughput() - 2.0).abs() < 0.01);
    }

    #[test]
    fn test_sorted_counters() {
        let mut stats = Stats::new(10);
        stats.record(entry("INFO", "nginx"));
        stats.record(entry("INFO", "nginx"));
        stats.record(entry("ERROR", "sshd"));

        assert_eq!(stats.levels_by_count()[0], ("INFO", 2));
        assert_eq!(stats.services_by_count()[0], ("nginx", 2));
    }
}
