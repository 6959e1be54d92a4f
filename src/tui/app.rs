use crate::filter::LogFilter;
use crate::parser::{LogType, Severity};
use crate::stats::Stats;
use crate::tail::TailControl;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use std::path::PathBuf;

/// Which panel the main area shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Logs,
    Stats,
    Services,
}

/// Two-stage inline filter prompt (severity, then service).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStage {
    Severity,
    Service,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub stage: PromptStage,
    pub buffer: String,
}

/// UI state for the monitor.
pub struct App {
    pub log_file: PathBuf,
    pub log_type: LogType,
    pub filter: LogFilter,
    pub stats: Stats,
    pub control: TailControl,
    pub view: View,
    pub prompt: Option<Prompt>,
    pub running: bool,
}

impl App {
    pub fn new(
        log_file: PathBuf,
        log_type: LogType,
        filter: LogFilter,
        buffer_size: usize,
        control: TailControl,
    ) -> Self {
        Self {
            log_file,
            log_type,
            filter,
            stats: Stats::new(buffer_size),
            control,
            view: View::Logs,
            prompt: None,
            running: true,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.prompt.is_some() {
            self.handle_prompt_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.quit(),
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.control.toggle_pause();
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.view = View::Logs,
            KeyCode::Char('s') | KeyCode::Char('S') => self.view = View::Stats,
            KeyCode::Char('v') | KeyCode::Char('V') => self.view = View::Services,
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.prompt = Some(Prompt {
                    stage: PromptStage::Severity,
                    buffer: String::new(),
                });
            }
            KeyCode::Char('c') | KeyCode::Char('C') => self.filter = LogFilter::new(),
            _ => {}
        }
    }

    pub fn quit(&mut self) {
        self.running = false;
        self.control.stop();
    }

    fn handle_prompt_key(&mut self, code: KeyCode) {
        let Some(mut prompt) = self.prompt.take() else {
            return;
        };

        match code {
            // Cancel: the prompt stays closed.
            KeyCode::Esc => return,
            KeyCode::Backspace => {
                prompt.buffer.pop();
            }
            KeyCode::Char(c) => prompt.buffer.push(c),
            KeyCode::Enter => {
                let buffer = prompt.buffer.trim().to_string();
                match prompt.stage {
                    PromptStage::Severity => {
                        // Invalid input leaves the threshold unchanged.
                        if let Ok(severity) = buffer.parse::<Severity>() {
                            self.filter.set_severity(severity);
                        }
                        prompt.stage = PromptStage::Service;
                        prompt.buffer.clear();
                    }
                    PromptStage::Service => {
                        if !buffer.is_empty() {
                            self.filter.set_service(Some(&buffer));
                        }
                        return;
                    }
                }
            }
            _ => {}
        }

        self.prompt = Some(prompt);
    }

    /// Header filter summary, e.g. `severity>=WARNING, service=sshd`.
    pub fn filter_summary(&self) -> String {
        let mut summary = format!("severity>={}", self.filter.severity_threshold);
        if let Some(service) = self.filter.service() {
            summary.push_str(&format!(", service={service}"));
        }
        if let Some(keyword) = self.filter.keyword() {
            summary.push_str(&format!(", keyword={keyword}"));
        }
        summary
    }
}
