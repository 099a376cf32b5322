use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// A keyboard hint consisting of a key and its action.
#[derive(Debug, Clone)]
pub struct KeyHint {
    pub key: String,
    pub action: String,
}

impl KeyHint {
    pub fn new(key: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            action: action.into(),
        }
    }
}

/// Converts a list of key hints into styled spans for rendering.
pub fn hints_to_spans(hints: &[KeyHint], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();

    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(
            hint.key.clone(),
            Style::default().fg(theme.accent),
        ));
        spans.push(Span::styled(
            format!(" {}", hint.action),
            Style::default().fg(theme.text_muted),
        ));
    }

    spans
}

pub fn hint_separator(theme: &Theme) -> Span<'static> {
    Span::styled("  │  ", Style::default().fg(theme.border))
}

pub mod common {
    use super::KeyHint;

    pub fn navigation() -> Vec<KeyHint> {
        vec![KeyHint::new("←→", "tabs")]
    }

    pub fn form_editing() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "next field"),
            KeyHint::new("Enter", "submit"),
        ]
    }

    pub fn login() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Tab", "switch"),
            KeyHint::new("Enter", "sign in"),
            KeyHint::new("Esc", "quit"),
        ]
    }

    pub fn session() -> Vec<KeyHint> {
        vec![
            KeyHint::new("Ctrl+L", "logout"),
            KeyHint::new("Esc", "quit"),
        ]
    }
}
