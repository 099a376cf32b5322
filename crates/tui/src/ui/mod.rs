pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Dashboard, FormId};

use components::hints::{KeyHint, hint_separator, hints_to_spans};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState) {
    let area = frame.area();
    match state.dashboard.as_ref() {
        Some(dashboard) if state.session.is_some() => render_shell(frame, area, state, dashboard),
        _ => screens::login::render(frame, area, state),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, dashboard: &Dashboard) {
    let theme = Theme::default();
    let form = dashboard.active_form();
    let banner_height = if form.success.is_some() || form.error.is_some() {
        3
    } else {
        0
    };

    // Main layout: info bar, tabs, banner, content, bottom bar
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(banner_height),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, &theme);
    components::tabs::render_tabs(frame, layout[1], dashboard, &theme);
    components::banner::render(frame, layout[2], form, &theme);

    if form.id == FormId::ViewAccounts {
        let content = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(screens::form::height(form)),
                Constraint::Min(0),
            ])
            .split(layout[3]);
        screens::form::render(frame, content[0], form, &theme);
        screens::accounts::render(frame, content[1], &state.accounts, &theme);
    } else {
        screens::form::render(frame, layout[3], form, &theme);
    }

    render_bottom_bar(frame, layout[4], form.id, &theme);
}

fn render_info_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let (user, role) = state
        .session
        .as_ref()
        .map(|session| (session.username.as_str(), session.role.label()))
        .unwrap_or(("-", "-"));

    let line = Line::from(vec![
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Role", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {role}  ")),
        Span::styled("API", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.base_url)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, form: FormId, theme: &Theme) {
    let mut parts = hints_to_spans(&components::hints::common::navigation(), theme);

    let mut context = components::hints::common::form_editing();
    if form == FormId::ViewAccounts {
        context.push(KeyHint::new("↑↓", "select"));
        context.push(KeyHint::new("r", "balance"));
    }
    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(&context, theme));

    parts.push(hint_separator(theme));
    parts.extend(hints_to_spans(
        &components::hints::common::session(),
        theme,
    ));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}
