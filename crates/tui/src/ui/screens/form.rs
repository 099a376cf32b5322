use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
};

use crate::{
    app::{FieldKind, FormState},
    ui::{components::card::Card, theme::Theme},
};

/// Rows needed to draw `form` inside its card.
pub fn height(form: &FormState) -> u16 {
    let notice = if form.id.notice().is_some() { 3 } else { 0 };
    // borders + one row per field + blank + submit
    2 + form.fields.len() as u16 + 2 + notice
}

pub fn render(frame: &mut Frame<'_>, area: Rect, form: &FormState, theme: &Theme) {
    let submitting = form.is_submitting();
    let mut lines = Vec::new();

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;
        let marker = if is_focused { "› " } else { "  " };
        let label_style = if is_focused {
            Style::default().fg(theme.accent)
        } else {
            Style::default().fg(theme.text_muted)
        };

        let value = if field.value.is_empty() {
            Span::styled(field.placeholder, Style::default().fg(theme.dim))
        } else {
            let shown = match field.kind {
                FieldKind::Amount => format!("$ {}", field.value),
                FieldKind::Text | FieldKind::Integer => field.value.clone(),
            };
            Span::styled(shown, Style::default().fg(theme.text))
        };

        let mut spans = vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(format!("{:<22}", field.label), label_style),
            value,
        ];
        if is_focused && !submitting {
            spans.push(Span::styled("│", Style::default().fg(theme.accent)));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    let submit = if submitting {
        Span::styled(
            "  Submitting…",
            Style::default()
                .fg(theme.warning)
                .add_modifier(Modifier::ITALIC),
        )
    } else {
        Span::styled(
            format!("  [ {} ]", form.id.submit_label()),
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(submit));

    if let Some(notice) = form.id.notice() {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            notice,
            Style::default().fg(theme.warning),
        )));
    }

    let card = Card::new(form.id.title(), theme).focused(submitting);
    frame.render_widget(
        Paragraph::new(lines)
            .block(card.block())
            .wrap(Wrap { trim: false }),
        area,
    );
}
