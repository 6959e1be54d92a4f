use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::parser::{LogEntry, Severity};

use super::app::{App, Prompt, PromptStage, View};

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(2), // header + filter line
        Constraint::Min(1),   // active view
        Constraint::Length(1), // footer / prompt
    ])
    .split(f.area());

    draw_header(f, chunks[0], app);

    match app.view {
        View::Logs => draw_logs(f, chunks[1], app),
        View::Stats => draw_stats(f, chunks[1], app),
        View::Services => draw_services(f, chunks[1], app),
    }

    match &app.prompt {
        Some(prompt) => draw_prompt(f, chunks[2], prompt),
        None => draw_footer(f, chunks[2]),
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let mut title = format!(
        "Real-time Log Analyzer - {} - {} logs",
        app.log_file.display(),
        app.log_type.as_str().to_uppercase()
    );
    if app.control.is_paused() {
        title.push_str(" - PAUSED");
    }

    let header = Paragraph::new(vec![
        Line::styled(
            title,
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Line::raw(format!("Filter: {}", app.filter_summary())),
    ]);
    f.render_widget(header, area);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let controls = [
        "Q:Quit",
        "P:Pause/Resume",
        "L:Logs View",
        "S:Stats View",
        "V:Services View",
        "F:Set Filter",
        "C:Clear Filters",
    ]
    .join(" | ");

    let footer = Paragraph::new(controls).style(Style::default().add_modifier(Modifier::REVERSED));
    f.render_widget(footer, area);
}

fn draw_prompt(f: &mut Frame, area: Rect, prompt: &Prompt) {
    let label = match prompt.stage {
        PromptStage::Severity => "Set severity level [DEBUG/INFO/WARNING/ERROR]: ",
        PromptStage::Service => "Filter by service (Enter to skip): ",
    };

    let line = Line::from(vec![
        Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(prompt.buffer.as_str()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn draw_logs(f: &mut Frame, area: Rect, app: &App) {
    let visible = area.height as usize;

    // Newest entries at the top.
    let entries: Vec<&LogEntry> = app
        .stats
        .recent()
        .filter(|entry| app.filter.matches(entry))
        .collect();

    let lines: Vec<Line> = entries
        .iter()
        .rev()
        .take(visible)
        .map(|entry| {
            let text = format!(
                "{:<20} {:<15} {:<8} {}",
                truncate(&entry.timestamp, 20),
                truncate(&entry.service, 15),
                entry.level.to_uppercase(),
                entry.message
            );
            Line::styled(text, severity_style(entry.severity()))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), area);
}

fn draw_stats(f: &mut Frame, area: Rect, app: &App) {
    let stats = &app.stats;
    let mut lines = vec![
        format!("Total Logs: {}", stats.total),
        format!("Errors: {}", stats.errors),
        format!("Warnings: {}", stats.warnings),
        format!("Throughput: {:.1} logs/sec", stats.throughput()),
        format!("Error Rate: {:.1}%", stats.error_rate()),
        format!("Uptime: {}s", stats.uptime().as_secs()),
        String::new(),
        "Severity Distribution:".to_string(),
    ];

    for (level, count) in stats.levels_by_count() {
        let percentage = (count as f64 / stats.total as f64) * 100.0;
        lines.push(format!("  {level:<10}: {count:>6} ({percentage:>5.1}%)"));
    }

    let text: Vec<Line> = lines.into_iter().map(Line::raw).collect();
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Cyan)),
        area,
    );
}

fn draw_services(f: &mut Frame, area: Rect, app: &App) {
    let stats = &app.stats;
    let mut lines = vec![Line::styled(
        "Service Statistics:",
        Style::default()
            .fg(Color::White)
            .bg(Color::Blue)
            .add_modifier(Modifier::BOLD),
    )];
    lines.push(Line::raw(""));

    for (service, count) in stats.services_by_count() {
        let percentage = if stats.total > 0 {
            (count as f64 / stats.total as f64) * 100.0
        } else {
            0.0
        };
        lines.push(Line::raw(format!(
            "  {:<20}: {count:>6} ({percentage:>5.1}%)",
            truncate(service, 20)
        )));
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn severity_style(severity: Option<Severity>) -> Style {
    match severity {
        Some(Severity::Emergency) => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        Some(Severity::Alert) => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        Some(Severity::Critical) => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::BOLD),
        Some(Severity::Error) => Style::default().fg(Color::Red),
        Some(Severity::Warning) => Style::default().fg(Color::Yellow),
        Some(Severity::Notice) => Style::default().fg(Color::Cyan),
        Some(Severity::Info) => Style::default().fg(Color::Green),
        Some(Severity::Debug) => Style::default().fg(Color::Blue),
        None => Style::default().fg(Color::Green),
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
