use crossterm::style::Color;

/// Semantic colors. Nothing else in the UI picks a raw color.
pub mod colors {
    use super::Color;

    pub const SUCCESS: Color = Color::Green;
    pub const ERROR: Color = Color::Red;
    pub const WARNING: Color = Color::Yellow;
    pub const INFO: Color = Color::Cyan;
    pub const DIM: Color = Color::DarkGrey;
}

/// Status glyphs, with ASCII fallbacks for terminals without unicode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
    pub upload: &'static str,
    pub download: &'static str,
    pub container: &'static str,
    pub check: &'static str,
}

impl Icons {
    pub const UNICODE: Icons = Icons {
        success: "✓",
        error: "✗",
        warning: "⚠",
        upload: "↑",
        download: "↓",
        container: "📦",
        check: "🔍",
    };

    pub const ASCII: Icons = Icons {
        success: "[OK]",
        error: "[FAIL]",
        warning: "[WARN]",
        upload: "[UP]",
        download: "[DOWN]",
        container: "[DEPLOY]",
        check: "[CHECK]",
    };

    pub fn select(supports_unicode: bool) -> Self {
        if supports_unicode {
            Self::UNICODE
        } else {
            Self::ASCII
        }
    }
}
