use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
};

use crate::{
    app::AccountBook,
    ui::{
        components::{card::Card, money::balance_span},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, accounts: &AccountBook, theme: &Theme) {
    let title = match accounts.crn() {
        Some(crn) => format!("Accounts of CRN {crn} ({})", accounts.len()),
        None => "Accounts".to_string(),
    };
    let block = Card::new(&title, theme).block();

    if accounts.is_empty() {
        let text = if accounts.crn().is_some() {
            "No accounts found for this customer."
        } else {
            "Enter a CRN and load accounts."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(theme.dim))).block(block),
            area,
        );
        return;
    }

    let items: Vec<ListItem<'_>> = accounts
        .iter()
        .map(|slot| {
            ListItem::new(Line::from(vec![
                Span::styled("Account ", Style::default().fg(theme.text_muted)),
                Span::styled(
                    format!("{:<14}", slot.account_number),
                    Style::default().fg(theme.text),
                ),
                balance_span(slot, theme),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("› ");

    let mut list_state = ListState::default();
    list_state.select(Some(accounts.selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
