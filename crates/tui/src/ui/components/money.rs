use api_types::MoneyCents;
use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use crate::{app::AccountSlot, ui::theme::Theme};

/// Balance cell of an account row. An unknown balance is never shown as zero.
#[must_use]
pub fn balance_span(slot: &AccountSlot, theme: &Theme) -> Span<'static> {
    if slot.balance_loading {
        return Span::styled("Loading…", Style::default().fg(theme.warning));
    }
    match slot.balance {
        Some(balance) => styled_amount(balance, theme),
        None => Span::styled("Balance not loaded", Style::default().fg(theme.dim)),
    }
}

#[must_use]
pub fn styled_amount(amount: MoneyCents, theme: &Theme) -> Span<'static> {
    let color = if amount.is_negative() {
        theme.error
    } else {
        theme.positive
    };

    Span::styled(
        amount.to_string(),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )
}
