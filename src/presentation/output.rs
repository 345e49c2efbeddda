//! Output Rendering
//!
//! Text rendering of run summaries, plus the sink that echoes remote build
//! output. JSON output goes through `ui::json` instead.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::application::deploy::DeployOutcome;
use crate::application::sync::{Direction, FolderSummary};
use crate::domain::entities::SyncReport;
use crate::domain::ports::{OutputSink, OutputStream};
use crate::ui::text::ColoredText;
use crate::ui::theme::Icons;

/// Text renderer for run summaries
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    /// Whether to use colors
    pub color: bool,
    /// Whether to use unicode
    pub unicode: bool,
    /// Verbosity level
    pub verbose: u8,
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self {
            color: true,
            unicode: true,
            verbose: 0,
        }
    }
}

impl TextRenderer {
    fn icons(&self) -> Icons {
        Icons::select(self.unicode)
    }

    pub fn header(&self, direction: Direction, local: &Path, remote: &str) -> String {
        let icons = self.icons();
        let local = local.display().to_string();
        let (icon, title, from, to) = match direction {
            Direction::Push => (icons.upload, "Push", local.as_str(), remote),
            Direction::Pull => (icons.download, "Pull", remote, local.as_str()),
        };
        format!(
            "{} {}\n  {} -> {}\n",
            icon,
            ColoredText::info(format!("Tugboat {}", title)).bold().render(self.color),
            from,
            to
        )
    }

    pub fn sync_summary(&self, direction: Direction, report: &SyncReport) -> String {
        let icons = self.icons();
        let title = if report.has_changes() {
            match direction {
                Direction::Push => "Push complete",
                Direction::Pull => "Pull complete",
            }
        } else {
            "Already up-to-date"
        };

        let mut out = format!(
            "{} {}\n  {} checked, {} transferred, {} up-to-date",
            ColoredText::success(icons.success).render(self.color),
            title,
            report.checked,
            report.transferred,
            report.skipped
        );
        if report.ignored > 0 || self.verbose > 0 {
            out.push_str(&format!(", {} ignored", report.ignored));
        }
        out.push('\n');
        out
    }

    pub fn deploy_summary(&self, image: &str, outcome: &DeployOutcome) -> String {
        let icons = self.icons();
        let mut out = format!(
            "{} Deployed {}\n",
            ColoredText::success(icons.success).render(self.color),
            image
        );
        if let Some(id) = &outcome.container_id {
            out.push_str(&format!("  container: {}\n", short_id(id)));
        }
        if self.verbose > 0 {
            out.push_str(&format!("  steps: {}\n", outcome.steps_run.join(", ")));
        }
        for warning in &outcome.warnings {
            out.push_str(&self.warning(warning));
        }
        out
    }

    pub fn warning(&self, message: &str) -> String {
        format!(
            "{} {}\n",
            ColoredText::warning(self.icons().warning).render(self.color),
            message
        )
    }

    pub fn error(&self, message: &str) -> String {
        format!(
            "{} {}\n",
            ColoredText::error(self.icons().error).render(self.color),
            ColoredText::error(message).render(self.color)
        )
    }

    /// One line of `tugboat check` output
    pub fn check_line(&self, ok: bool, label: &str, detail: &str) -> String {
        let icons = self.icons();
        let icon = if ok {
            ColoredText::success(icons.success)
        } else {
            ColoredText::error(icons.error)
        };
        format!(
            "  {} {:<12} {}\n",
            icon.render(self.color),
            label,
            ColoredText::dim(detail).render(self.color)
        )
    }

    /// Local folder pre-check shown before a push
    pub fn folder_summary(&self, folder: &Path, summary: &FolderSummary) -> String {
        let mut out = format!(
            "  {} entries in {}\n",
            summary.visible_entries,
            folder.display()
        );
        if !summary.has_dockerfile {
            out.push_str(&self.warning(&format!(
                "No Dockerfile in {}; the remote build will likely fail",
                folder.display()
            )));
        }
        out
    }
}

/// Docker prints 64-char ids; 12 is what `docker ps` shows
fn short_id(id: &str) -> &str {
    if id.len() > 12 && id.chars().all(|c| c.is_ascii_hexdigit()) {
        &id[..12]
    } else {
        id
    }
}

/// Echoes remote command output, stderr dimmed
pub struct ConsoleOutput {
    out: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl ConsoleOutput {
    pub fn new(color: bool) -> Self {
        Self::with_writer(Box::new(io::stdout()), color)
    }

    pub fn with_writer(out: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            out: Mutex::new(out),
            color,
        }
    }
}

impl OutputSink for ConsoleOutput {
    fn on_line(&self, stream: OutputStream, line: &str) {
        let rendered = match stream {
            OutputStream::Stdout => line.to_string(),
            OutputStream::Stderr => ColoredText::dim(line).render(self.color),
        };
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(out, "  | {}", rendered);
    }
}
