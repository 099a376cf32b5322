use std::collections::HashMap;

use api_types::{AccountNumber, Crn, MoneyCents, account::AccountSummary};

/// Last known state of one account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSlot {
    pub account_number: AccountNumber,
    /// `None` until the balance is fetched explicitly; never conflated with zero.
    pub balance: Option<MoneyCents>,
    pub balance_loading: bool,
}

/// Account rows of one customer, keyed by account number.
///
/// Every row is updated on its own, so a balance settling for one account
/// never touches another. Replacing or clearing the list bumps the
/// generation; balance settlements issued against an older generation are
/// dropped.
#[derive(Debug, Default)]
pub struct AccountBook {
    crn: Option<Crn>,
    order: Vec<AccountNumber>,
    slots: HashMap<AccountNumber, AccountSlot>,
    generation: u64,
    pub selected: usize,
}

impl AccountBook {
    pub fn crn(&self) -> Option<Crn> {
        self.crn
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[cfg(test)]
    pub fn get(&self, account_number: AccountNumber) -> Option<&AccountSlot> {
        self.slots.get(&account_number)
    }

    /// Rows in server order.
    pub fn iter(&self) -> impl Iterator<Item = &AccountSlot> {
        self.order.iter().filter_map(|number| self.slots.get(number))
    }

    /// Replaces every row with the server listing. Balances start unknown,
    /// whatever the listing embeds; duplicate numbers keep their first row.
    pub fn replace(&mut self, crn: Crn, accounts: Vec<AccountSummary>) {
        self.generation += 1;
        self.crn = Some(crn);
        self.order.clear();
        self.slots.clear();
        self.selected = 0;

        for account in accounts {
            let number = account.account_number;
            if self.slots.contains_key(&number) {
                tracing::debug!(account = %number, "duplicate account in listing ignored");
                continue;
            }
            self.order.push(number);
            self.slots.insert(
                number,
                AccountSlot {
                    account_number: number,
                    balance: None,
                    balance_loading: false,
                },
            );
        }
    }

    pub fn clear(&mut self) {
        self.generation += 1;
        self.crn = None;
        self.order.clear();
        self.slots.clear();
        self.selected = 0;
    }

    /// Marks `account_number` as loading and returns the generation to tag
    /// the fetch with. `None` if the row is unknown or already loading.
    pub fn begin_refresh(&mut self, account_number: AccountNumber) -> Option<u64> {
        let slot = self.slots.get_mut(&account_number)?;
        if slot.balance_loading {
            return None;
        }
        slot.balance_loading = true;
        Some(self.generation)
    }

    /// Applies a balance settlement. Returns `false` when it was dropped
    /// because the list it belonged to has been replaced.
    pub fn settle_refresh(
        &mut self,
        generation: u64,
        account_number: AccountNumber,
        balance: Option<MoneyCents>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        let Some(slot) = self.slots.get_mut(&account_number) else {
            return false;
        };
        slot.balance_loading = false;
        if let Some(balance) = balance {
            slot.balance = Some(balance);
        }
        true
    }

    pub fn selected_account(&self) -> Option<AccountNumber> {
        self.order.get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        if self.order.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.order.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}
