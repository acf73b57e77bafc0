//! Named terminal styles, applied only at the output boundary.

const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Banner rules around the program title.
    Header,
    /// Input prompts.
    Prompt,
    /// Progress status lines.
    Notice,
    /// User-visible failures.
    Alert,
    /// Rules around the final report.
    Accent,
    Bold,
}

impl Style {
    fn code(&self) -> &'static str {
        match self {
            Style::Header => "\x1b[95m",
            Style::Prompt => "\x1b[94m",
            Style::Notice => "\x1b[93m",
            Style::Alert => "\x1b[91m",
            Style::Accent => "\x1b[92m",
            Style::Bold => "\x1b[1m",
        }
    }
}

/// Maps styles to escape sequences, or to nothing when color is off.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn ansi() -> Palette {
        Palette { enabled: true }
    }

    pub fn plain() -> Palette {
        Palette { enabled: false }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("{}{}{}", style.code(), text, RESET)
        } else {
            text.to_string()
        }
    }
}
