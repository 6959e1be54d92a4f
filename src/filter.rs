use crate::parser::{LogEntry, Severity};

/// Display filter applied to parsed entries before they reach the
/// logs view.
///
/// Entries whose level is not a known severity always pass the
/// threshold check; service and keyword matching is case-insensitive
/// substring containment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    pub severity_threshold: Severity,
    service: Option<String>,
    keyword: Option<String>,
    exclude_keywords: Vec<String>,
}

impl Default for LogFilter {
    fn default() -> Self {
        Self {
            // Show everything by default.
            severity_threshold: Severity::Debug,
            service: None,
            keyword: None,
            exclude_keywords: Vec::new(),
        }
    }
}

impl LogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum importance to display; entries at or above it pass.
    pub fn set_severity(&mut self, severity: Severity) {
        self.severity_threshold = severity;
    }

    pub fn set_service(&mut self, service: Option<&str>) {
        self.service = service
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());
    }

    pub fn set_keyword(&mut self, keyword: Option<&str>) {
        self.keyword = keyword
            .filter(|s| !s.is_empty())
            .map(|s| s.to_lowercase());
    }

    pub fn add_exclude_keyword(&mut self, keyword: &str) {
        let keyword = keyword.to_lowercase();
        if !keyword.is_empty() && !self.exclude_keywords.contains(&keyword) {
            self.exclude_keywords.push(keyword);
        }
    }

    pub fn service(&self) -> Option<&str> {
        self.service.as_deref()
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    pub fn matches(&self, entry: &LogEntry) -> bool {
        // Unknown levels are never filtered out by the threshold.
        if let Some(severity) = entry.severity() {
            if severity > self.severity_threshold {
                return false;
            }
        }

        if let Some(service) = &self.service {
            if !entry.service.to_lowercase().contains(service) {
                return false;
            }
        }

        let message = entry.message.to_lowercase();
        if let Some(keyword) = &self.keyword {
            if !message.contains(keyword) {
                return false;
            }
        }

        !self
            .exclude_keywords
            .iter()
            .any(|exclude| message.contains(exclude))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(level: &str, service: &str, message: &str) -> LogEntry {
        LogEntry {
            timestamp: "2021-10-11 10:21:52".to_string(),
            level: level.to_string(),
            service: service.to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_default_filter_passes_everything() {
        let filter = LogFilter::new();
        assert!(filter.matches(&entry("DEBUG", "sshd", "x")));
        assert!(filter.matches(&entry("EMERGENCY", "sshd", "x")));
    }

    #[test]
    fn test_severity_threshold() {
        let mut filter = LogFilter::new();
        filter.set_severity(Severity::Warning);

        assert!(filter.matches(&entry("ERROR", "sshd", "x")));
        assert!(filter.matches(&entry("WARNING", "sshd", "x")));
        assert!(!filter.matches(&entry("INFO", "sshd", "x")));
        assert!(!filter.matches(&entry("DEBUG", "sshd", "x")));
    }

    #[test]
    fn test_unknown_level_passes_threshold() {
        let mut filter = LogFilter::new();
        filter.set_severity(Severity::Error);
        assert!(filter.matches(&entry("VERBOSE", "sshd", "x")));
    }

    #[test]
    fn test_service_filter_is_substring() {
        let mut filter = LogFilter::new();
        filter.set_service(Some("SSH"));

        assert!(filter.matches(&entry("INFO", "sshd", "x")));
        assert!(!filter.matches(&entry("INFO", "nginx", "x")));
    }

    #[test]
    fn test_keyword_filter() {
        let mut filter = LogFilter::new();
        filter.set_keyword(Some("Timeout"));

        assert!(filter.matches(&entry("INFO", "sshd", "connection timeout after 30s")));
        assert!(!filter.matches(&entry("INFO", "sshd", "connection closed")));
    }

    #[test]
    fn test_exclude_keywords() {
        let mut filter = LogFilter::new();
        filter.add_exclude_keyword("healthcheck");
        filter.add_exclude_keyword("healthcheck"); // dedup

        assert!(!filter.matches(&entry("INFO", "nginx", "GET /healthcheck 200")));
        assert!(filter.matches(&entry("INFO", "nginx", "GET /index 200")));
    }

    #[test]
    fn test_empty_service_clears_filter() {
        let mut filter = LogFilter::new();
        filter.set_service(Some("sshd"));
        filter.set_service(Some(""));
        assert!(filter.matches(&entry("INFO", "nginx", "x")));
    }
}
