//! Progress rendering
//!
//! Sinks for the progress events emitted by the sync engine and the
//! deployment sequencer.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::{cursor, terminal, QueueableCommand};
use serde::Serialize;

use crate::domain::ports::{ProgressEvent, ProgressKind, ProgressSink};
use crate::ui::json::write_event;
use crate::ui::terminal::TerminalCapabilities;
use crate::ui::widgets::ProgressBar;

struct ConsoleState {
    out: Box<dyn Write + Send>,
    bar: Option<ProgressBar>,
}

/// Human readable progress.
///
/// On an interactive terminal a single status line is redrawn in place.
/// Otherwise each event becomes its own `[current/total] message` line.
pub struct ConsoleProgress {
    state: Mutex<ConsoleState>,
    animate: bool,
    unicode: bool,
    width: usize,
}

impl ConsoleProgress {
    pub fn new(caps: TerminalCapabilities, animate: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), caps, animate)
    }

    pub fn with_writer(
        out: Box<dyn Write + Send>,
        caps: TerminalCapabilities,
        animate: bool,
    ) -> Self {
        Self {
            state: Mutex::new(ConsoleState { out, bar: None }),
            animate: animate && caps.supports_animation(),
            unicode: caps.supports_unicode,
            width: caps.width.max(20) as usize,
        }
    }

    fn draw(&self, state: &mut ConsoleState, event: &ProgressEvent) -> io::Result<()> {
        if !self.animate {
            return writeln!(
                state.out,
                "[{}/{}] {}",
                event.current, event.total, event.message
            );
        }

        let bar = state.bar.get_or_insert_with(|| {
            let mut bar = ProgressBar::new(event.total as u64);
            bar.set_width(20);
            // Deploy steps vary too much in length for a useful estimate
            bar.set_show_eta(event.kind == ProgressKind::Transfer);
            bar
        });
        bar.set_total(event.total as u64);
        bar.set(event.current as u64);
        bar.set_message(event.message.as_str());
        let line = bar.render(self.unicode, self.width.saturating_sub(1));

        state.out.queue(cursor::MoveToColumn(0))?;
        state
            .out
            .queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
        state.out.write_all(line.as_bytes())?;
        state.out.flush()
    }
}

impl ProgressSink for ConsoleProgress {
    fn on_progress(&self, event: ProgressEvent) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        // Progress output is best effort; a closed stdout must not fail the run
        let _ = self.draw(&mut state, &event);
    }

    fn finish(&self, _kind: ProgressKind) {
        let mut state = self.state.lock().unwrap_or_else(|p| p.into_inner());
        if state.bar.take().is_some() {
            let _ = writeln!(state.out);
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'static str,
    #[serde(flatten)]
    progress: &'a ProgressEvent,
}

/// NDJSON progress for CI: one `{"event":"progress",...}` object per line
pub struct JsonProgress {
    out: Mutex<Box<dyn Write + Send>>,
}

impl JsonProgress {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

impl Default for JsonProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for JsonProgress {
    fn on_progress(&self, event: ProgressEvent) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        let _ = write_event(
            &mut *out,
            &JsonEvent {
                event: "progress",
                progress: &event,
            },
        );
    }
}
