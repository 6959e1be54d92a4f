//! Full-screen monitor UI: alternate screen, 100 ms redraw cadence,
//! entries arriving from the tail thread over a channel.

mod app;
mod render;

pub use app::App;

use anyhow::{anyhow, Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::parser::LogEntry;

const TICK: Duration = Duration::from_millis(100);

/// Run the monitor until the user quits or the tail thread fails.
///
/// The terminal is restored on every exit path; a tail failure is
/// surfaced as the returned error after cleanup.
pub fn run(
    mut app: App,
    rx: Receiver<LogEntry>,
    tail: JoinHandle<Result<()>>,
) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode (is this a real terminal?)")?;

    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(err).context("Failed to enter alternate screen");
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut app, &rx);

    let cleanup = restore_terminal(&mut terminal);

    // Stop and join the tail thread so its error (if any) wins over a
    // bare channel-disconnect observation.
    app.control.stop();
    drop(rx);
    let tail_result = match tail.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("Tail thread panicked")),
    };

    result.and(tail_result).and(cleanup)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &Receiver<LogEntry>,
) -> Result<()> {
    while app.running {
        // Drain everything the tail thread produced since last tick.
        loop {
            match rx.try_recv() {
                Ok(entry) => app.stats.record(entry),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // Tail thread exited; its join result carries the cause.
                    app.running = false;
                    break;
                }
            }
        }

        terminal.draw(|f| render::draw(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
    }

    Ok(())
}
