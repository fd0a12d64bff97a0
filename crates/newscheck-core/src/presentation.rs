//! Verdict → display attributes.
//!
//! A static lookup table. Anything the table does not know about, including a
//! missing verdict, renders with the UNCERTAIN entry.

use crate::check::VerdictCode;

/// Visual theme for a verdict card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Success,
    Positive,
    Warning,
    Caution,
    Danger,
}

impl Theme {
    /// Colour name in the service's own vocabulary.
    pub fn color_name(&self) -> &'static str {
        match self {
            Self::Success => "green",
            Self::Positive => "lightgreen",
            Self::Warning => "orange",
            Self::Caution => "coral",
            Self::Danger => "red",
        }
    }

    /// ANSI SGR sequence used by terminal renderers.
    pub fn ansi(&self) -> &'static str {
        match self {
            Self::Success => "\x1b[1;32m",
            Self::Positive => "\x1b[32m",
            Self::Warning => "\x1b[1;33m",
            Self::Caution => "\x1b[33m",
            Self::Danger => "\x1b[1;31m",
        }
    }
}

pub const ANSI_RESET: &str = "\x1b[0m";

/// How a verdict is shown: theme, icon glyph, and badge text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub theme: Theme,
    pub icon: &'static str,
    pub badge: &'static str,
}

const UNCERTAIN: Presentation = Presentation {
    theme: Theme::Warning,
    icon: "⚠",
    badge: "Uncertain",
};

const TABLE: &[(VerdictCode, Presentation)] = &[
    (
        VerdictCode::HighlyLikelyTrue,
        Presentation {
            theme: Theme::Success,
            icon: "✔✔",
            badge: "Highly likely true",
        },
    ),
    (
        VerdictCode::LikelyTrue,
        Presentation {
            theme: Theme::Positive,
            icon: "✔",
            badge: "Likely true",
        },
    ),
    (VerdictCode::Uncertain, UNCERTAIN),
    (
        VerdictCode::LikelyFalse,
        Presentation {
            theme: Theme::Caution,
            icon: "✘",
            badge: "Likely false",
        },
    ),
    (
        VerdictCode::HighlyLikelyFalse,
        Presentation {
            theme: Theme::Danger,
            icon: "✘✘",
            badge: "Highly likely false",
        },
    ),
];

/// Map a verdict code to its presentation. `None` renders as UNCERTAIN.
pub fn present(code: Option<VerdictCode>) -> Presentation {
    let Some(code) = code else {
        return UNCERTAIN;
    };
    TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, p)| *p)
        .unwrap_or(UNCERTAIN)
}
