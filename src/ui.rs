use anstyle::{AnsiColor, Style};
use is_terminal::IsTerminal;
use std::fmt::Display;
use std::io::{self, Write};

const STATUS_WIDTH: usize = 12;

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Success,
    Info,
    Warn,
}

fn supports_color(stderr: bool) -> bool {
    let is_tty = if stderr {
        io::stderr().is_terminal()
    } else {
        io::stdout().is_terminal()
    };
    is_tty && std::env::var_os("NO_COLOR").is_none()
}

fn style_for(kind: StatusKind) -> Style {
    let style = Style::new().bold();
    match kind {
        StatusKind::Success => style.fg_color(Some(AnsiColor::Green.into())),
        StatusKind::Info => style.fg_color(Some(AnsiColor::Blue.into())),
        StatusKind::Warn => style.fg_color(Some(AnsiColor::Yellow.into())),
    }
}

fn write_status(kind: StatusKind, label: &str, message: &str) {
    let use_stderr = matches!(kind, StatusKind::Warn);
    let use_color = supports_color(use_stderr);
    let mut handle: Box<dyn Write> = if use_stderr {
        Box::new(io::stderr().lock())
    } else {
        Box::new(io::stdout().lock())
    };

    let padded_label = if label.is_empty() {
        " ".repeat(STATUS_WIDTH)
    } else {
        format!("{:>width$}", label, width = STATUS_WIDTH)
    };

    let (prefix, suffix) = if use_color {
        let style = style_for(kind);
        (style.render().to_string(), style.render_reset().to_string())
    } else {
        (String::new(), String::new())
    };

    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            let _ = writeln!(handle, "{prefix}{padded_label}{suffix} {line}");
        } else {
            let _ = writeln!(handle, "{:>width$} {line}", "", width = STATUS_WIDTH);
        }
    }
    let _ = handle.flush();
}

pub fn info(message: impl Display) {
    write_status(StatusKind::Info, "Info", &message.to_string());
}

pub fn warn(message: impl Display) {
    write_status(StatusKind::Warn, "Warning", &message.to_string());
}

pub fn success(label: &str, message: impl Display) {
    write_status(StatusKind::Success, label, &message.to_string());
}
