use std::time::{Duration, Instant};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Single-line progress bar: `━━━━──────  4/10 (40%)  message`
#[derive(Debug, Clone)]
pub struct ProgressBar {
    total: u64,
    current: u64,
    width: u16,
    message: String,
    started: Instant,
    show_eta: bool,
}

impl ProgressBar {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            current: 0,
            width: 20,
            message: String::new(),
            started: Instant::now(),
            show_eta: true,
        }
    }

    pub fn set_width(&mut self, width: u16) {
        self.width = width.max(1);
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_show_eta(&mut self, show_eta: bool) {
        self.show_eta = show_eta;
    }

    pub fn set_total(&mut self, total: u64) {
        self.total = total;
    }

    pub fn set(&mut self, value: u64) {
        self.current = value;
    }

    pub fn eta(&self) -> Option<Duration> {
        if self.total == 0 || self.current == 0 {
            return None;
        }

        if self.current >= self.total {
            return Some(Duration::from_secs(0));
        }

        let elapsed_secs = self.started.elapsed().as_secs_f64();
        if elapsed_secs <= 0.0 {
            return None;
        }

        let rate = self.current as f64 / elapsed_secs;
        let secs = (self.total - self.current) as f64 / rate;
        if !secs.is_finite() || secs.is_sign_negative() {
            return None;
        }

        Some(Duration::from_secs_f64(secs))
    }

    /// Render to at most `max_columns` display columns. The message is
    /// truncated first; the bar itself is never cut.
    pub fn render(&self, supports_unicode: bool, max_columns: usize) -> String {
        let pct = if self.total == 0 {
            0
        } else {
            (self.current.min(self.total).saturating_mul(100)) / self.total
        };

        let (filled, empty) = self.bar_segments();
        let mut out = if supports_unicode {
            format!("{}{}", "━".repeat(filled), "─".repeat(empty))
        } else {
            format!("[{}{}]", "=".repeat(filled), "-".repeat(empty))
        };
        out.push_str("  ");
        out.push_str(&format!("{}/{} ({}%)", self.current, self.total, pct));
        if self.show_eta {
            if let Some(eta) = self.eta().filter(|d| !d.is_zero()) {
                out.push_str(&format!("  ETA: {}", format_duration_compact(eta)));
            }
        }

        if !self.message.is_empty() {
            let room = max_columns.saturating_sub(out.width() + 2);
            let message = truncate_to_width(&self.message, room, supports_unicode);
            if !message.is_empty() {
                out.push_str("  ");
                out.push_str(&message);
            }
        }
        out
    }

    fn bar_segments(&self) -> (usize, usize) {
        let width = self.width.max(1) as usize;
        if self.total == 0 {
            return (0, width);
        }

        let ratio = (self.current.min(self.total)) as f64 / self.total as f64;
        let filled = (ratio * width as f64).round().clamp(0.0, width as f64) as usize;
        (filled, width.saturating_sub(filled))
    }
}

/// Cut `text` to `max` display columns, keeping the tail (file names live
/// at the end of progress messages) and marking the cut.
fn truncate_to_width(text: &str, max: usize, supports_unicode: bool) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let marker = if supports_unicode { "…" } else { "..." };
    let budget = match max.checked_sub(marker.width()) {
        Some(budget) if budget > 0 => budget,
        _ => return String::new(),
    };

    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in text.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail.push(c);
    }
    let mut out = marker.to_string();
    out.extend(tail.into_iter().rev());
    out
}

fn format_duration_compact(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        return format!("{}s", secs);
    }
    let mins = secs / 60;
    if mins < 60 {
        return format!("{}m", mins);
    }
    format!("{}h", mins / 60)
}
