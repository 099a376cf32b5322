use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
};

use crate::{app::FormState, ui::theme::Theme};

/// Success or error line of the active form. Nothing is drawn when both
/// are empty; an error wins over a success.
pub fn render(frame: &mut Frame<'_>, area: Rect, form: &FormState, theme: &Theme) {
    let (message, color) = match (&form.error, &form.success) {
        (Some(error), _) => (error.as_str(), theme.error),
        (None, Some(success)) => (success.as_str(), theme.positive),
        (None, None) => return,
    };
    if area.height == 0 {
        return;
    }

    let style = Style::default().fg(color);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style);
    let content = Paragraph::new(Line::from(message))
        .style(style)
        .wrap(Wrap { trim: true });
    frame.render_widget(content.block(block), area);
}
