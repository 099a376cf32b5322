use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{
    app::{AppState, LoginField},
    ui::{
        components::hints::{common, hints_to_spans},
        theme::Theme,
    },
};

/// Calculates a centered rect for the login box
fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);

    horizontal[1]
}

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let box_width = 44;
    let box_height = 9;
    let card_area = centered_box(box_width, box_height, area);

    frame.render_widget(Clear, card_area);

    let block = Block::default()
        .title(Span::styled(
            " Banking Portal ",
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.border));

    let inner = block.inner(card_area);
    frame.render_widget(block, card_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Username
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Password
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Status
        ])
        .margin(1)
        .split(inner);

    let login = &state.login;
    let focus = login.focus();

    render_input(
        frame,
        rows[0],
        "Username",
        &login.username,
        false,
        focus == LoginField::Username,
        &theme,
    );
    render_input(
        frame,
        rows[2],
        "Password",
        &login.password,
        true,
        focus == LoginField::Password,
        &theme,
    );

    let status = if login.pending {
        Span::styled("Signing in…", Style::default().fg(theme.warning))
    } else {
        Span::styled("Sign In", Style::default().fg(theme.text_muted))
    };
    frame.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        rows[4],
    );

    let below = |offset: u16| Rect {
        x: card_area.x,
        y: card_area.y.saturating_add(card_area.height + offset),
        width: card_area.width,
        height: 1,
    };

    if let Some(message) = &login.message {
        let error_area = below(1);
        if error_area.bottom() <= area.bottom() {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(theme.error),
                ))
                .alignment(Alignment::Center),
                error_area,
            );
        }
    }

    let hints_area = below(3);
    if hints_area.bottom() <= area.bottom() {
        frame.render_widget(
            Paragraph::new(Line::from(hints_to_spans(&common::login(), &theme)))
                .alignment(Alignment::Center),
            hints_area,
        );
    }
}

fn render_input(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    is_password: bool,
    focused: bool,
    theme: &Theme,
) {
    let cursor = if focused { "│" } else { "" };

    let display = if is_password {
        format!("{}{}", mask_password(value), cursor)
    } else {
        format!("{value}{cursor}")
    };

    let style = if focused {
        Style::default().fg(theme.accent)
    } else {
        Style::default().fg(theme.text_muted)
    };

    let line = Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(display, style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Masks password with bullets, one per character
fn mask_password(password: &str) -> String {
    "•".repeat(password.chars().count())
}
