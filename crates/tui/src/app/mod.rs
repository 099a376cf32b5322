pub mod accounts;
pub mod forms;
pub mod requests;

use std::{sync::Arc, time::Duration};

use crossterm::event::{self, Event, KeyEvent};
use tokio::sync::mpsc;

use crate::{
    auth::{AuthError, AuthProvider, Role, Session},
    client::Client,
    error::{AppError, Result},
    ui::{self, keymap::AppAction},
};

pub use accounts::{AccountBook, AccountSlot};
pub use forms::{FieldKind, FormId, FormState};
pub use requests::{Outcome, Request, RequestKind, Settlement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginState {
    pub username: String,
    pub password: String,
    pub focus: Option<LoginField>,
    pub message: Option<String>,
    pub pending: bool,
}

impl LoginState {
    pub fn focus(&self) -> LoginField {
        self.focus.unwrap_or(LoginField::Username)
    }

    fn toggle_focus(&mut self) {
        self.focus = Some(match self.focus() {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        });
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.focus() {
            LoginField::Username => &mut self.username,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Tabs of one role's view, one form per tab.
#[derive(Debug)]
pub struct Dashboard {
    pub forms: Vec<FormState>,
    pub active: usize,
}

impl Dashboard {
    pub fn for_role(role: Role) -> Self {
        let tabs: &[FormId] = match role {
            Role::Admin => &[
                FormId::AddCustomer,
                FormId::DeleteCustomer,
                FormId::OpenAccount,
            ],
            Role::User => &[
                FormId::TransferFunds,
                FormId::ViewAccounts,
                FormId::AddAddress,
            ],
        };
        Self {
            forms: tabs.iter().copied().map(FormState::new).collect(),
            active: 0,
        }
    }

    pub fn active_form(&self) -> &FormState {
        &self.forms[self.active]
    }

    fn active_form_mut(&mut self) -> &mut FormState {
        &mut self.forms[self.active]
    }

    pub fn form_mut(&mut self, id: FormId) -> Option<&mut FormState> {
        self.forms.iter_mut().find(|form| form.id == id)
    }

    fn clear_banners(&mut self) {
        for form in &mut self.forms {
            form.clear_banners();
        }
    }

    fn next_tab(&mut self) {
        self.active = (self.active + 1) % self.forms.len();
        self.clear_banners();
    }

    fn prev_tab(&mut self) {
        self.active = (self.active + self.forms.len() - 1) % self.forms.len();
        self.clear_banners();
    }
}

#[derive(Debug)]
pub struct AppState {
    pub login: LoginState,
    pub session: Option<Session>,
    pub dashboard: Option<Dashboard>,
    pub accounts: AccountBook,
    /// Bumped on logout; settlements from an older epoch are dropped.
    pub epoch: u64,
    pub base_url: String,
}

impl AppState {
    pub fn new(base_url: &str, username: &str) -> Self {
        Self {
            login: LoginState {
                username: username.to_string(),
                ..LoginState::default()
            },
            session: None,
            dashboard: None,
            accounts: AccountBook::default(),
            epoch: 0,
            base_url: base_url.to_string(),
        }
    }

    fn request(&self, kind: RequestKind) -> Request {
        Request {
            epoch: self.epoch,
            kind,
        }
    }

    /// Applies one key action. Returns the request to dispatch, if any.
    pub fn handle_action(&mut self, action: AppAction) -> Option<Request> {
        if self.session.is_none() {
            return self.handle_login_action(action);
        }

        if action == AppAction::Logout {
            self.logout();
            return None;
        }

        let dashboard = self.dashboard.as_mut()?;
        let on_accounts = dashboard.active_form().id == FormId::ViewAccounts;

        match action {
            AppAction::NextTab => dashboard.next_tab(),
            AppAction::PrevTab => dashboard.prev_tab(),
            AppAction::NextField => dashboard.active_form_mut().next_field(),
            AppAction::PrevField => dashboard.active_form_mut().prev_field(),
            AppAction::Backspace => dashboard.active_form_mut().backspace(),
            AppAction::Up if on_accounts => self.accounts.select_prev(),
            AppAction::Down if on_accounts => self.accounts.select_next(),
            AppAction::Up => dashboard.active_form_mut().prev_field(),
            AppAction::Down => dashboard.active_form_mut().next_field(),
            AppAction::Input(ch) => {
                if !dashboard.active_form_mut().input(ch) && on_accounts && ch == 'r' {
                    return self.refresh_selected_balance();
                }
            }
            AppAction::Submit => {
                let form = dashboard.active_form_mut();
                let id = form.id;
                let submission = form.begin_submit()?;
                tracing::debug!(form = ?id, "submitting");
                return Some(self.request(RequestKind::Submit {
                    form: id,
                    submission,
                }));
            }
            AppAction::Quit | AppAction::Logout | AppAction::None => {}
        }

        None
    }

    fn handle_login_action(&mut self, action: AppAction) -> Option<Request> {
        let login = &mut self.login;
        match action {
            AppAction::NextField | AppAction::PrevField | AppAction::Up | AppAction::Down => {
                login.toggle_focus();
            }
            AppAction::Input(ch) if !login.pending => login.active_field_mut().push(ch),
            AppAction::Backspace if !login.pending => {
                login.active_field_mut().pop();
            }
            AppAction::Submit if !login.pending => {
                let username = login.username.trim().to_string();
                let password = login.password.clone();
                if username.is_empty() || password.is_empty() {
                    login.message = Some("Please enter username and password.".to_string());
                    return None;
                }
                login.pending = true;
                login.message = None;
                return Some(self.request(RequestKind::Login { username, password }));
            }
            _ => {}
        }
        None
    }

    /// Starts a balance fetch for the highlighted account row.
    pub fn refresh_selected_balance(&mut self) -> Option<Request> {
        let account_number = self.accounts.selected_account()?;
        let generation = self.accounts.begin_refresh(account_number)?;
        Some(self.request(RequestKind::RefreshBalance {
            generation,
            account_number,
        }))
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(username = %session.username, "logged out");
        }
        self.epoch += 1;
        self.dashboard = None;
        self.accounts.clear();
        self.login.password.clear();
        self.login.pending = false;
        self.login.message = None;
    }

    /// Applies a settled request, keyed by the identity captured at dispatch.
    pub fn apply(&mut self, settlement: Settlement) {
        if settlement.epoch != self.epoch {
            tracing::debug!(
                epoch = settlement.epoch,
                current = self.epoch,
                "dropping settlement for a closed session"
            );
            return;
        }

        match settlement.outcome {
            Outcome::Login(result) => self.apply_login(result),
            Outcome::Form { form, result } => {
                if let Err(err) = &result {
                    tracing::warn!(form = ?form, operation = %err.operation(), "submission failed: {}", err.message());
                }
                if let Some(state) = self.form_mut(form) {
                    state.settle(result.is_ok());
                }
            }
            Outcome::Accounts { crn, result } => {
                let succeeded = match result {
                    Ok(accounts) => {
                        tracing::info!(crn, count = accounts.len(), "accounts loaded");
                        self.accounts.replace(crn, accounts);
                        true
                    }
                    Err(err) => {
                        tracing::warn!(crn, "loading accounts failed: {}", err.message());
                        self.accounts.clear();
                        false
                    }
                };
                if let Some(state) = self.form_mut(FormId::ViewAccounts) {
                    state.settle(succeeded);
                }
            }
            Outcome::Balance {
                generation,
                account_number,
                result,
            } => {
                let balance = match &result {
                    Ok(body) => Some(body.balance),
                    Err(err) => {
                        tracing::warn!(account = %account_number, "balance fetch failed: {}", err.message());
                        None
                    }
                };
                let applied = self
                    .accounts
                    .settle_refresh(generation, account_number, balance);
                // Reported on the open tab.
                if applied && result.is_err() {
                    if let Some(dashboard) = self.dashboard.as_mut() {
                        let state = dashboard.active_form_mut();
                        state.success = None;
                        state.error =
                            Some(format!("Failed to load balance for account {account_number}"));
                    }
                }
            }
        }
    }

    fn apply_login(&mut self, result: std::result::Result<Session, AuthError>) {
        self.login.pending = false;
        match result {
            Ok(session) => {
                tracing::debug!(user_id = %session.id, role = %session.role, "session opened");
                self.dashboard = Some(Dashboard::for_role(session.role));
                self.session = Some(session);
                self.login.password.clear();
                self.login.message = None;
            }
            Err(AuthError::InvalidCredentials) => {
                self.login.message = Some("Invalid username or password.".to_string());
            }
        }
    }

    fn form_mut(&mut self, id: FormId) -> Option<&mut FormState> {
        self.dashboard.as_mut()?.form_mut(id)
    }
}

pub struct App {
    client: Client,
    auth: Arc<dyn AuthProvider>,
    pub state: AppState,
    settled_tx: mpsc::UnboundedSender<Settlement>,
    settled_rx: mpsc::UnboundedReceiver<Settlement>,
    should_quit: bool,
}

impl App {
    pub fn new(client: Client, auth: Arc<dyn AuthProvider>, username: &str) -> Self {
        let state = AppState::new(client.base_url().as_str(), username);
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();

        Self {
            client,
            auth,
            state,
            settled_tx,
            settled_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            while let Ok(settlement) = self.settled_rx.try_recv() {
                self.state.apply(settlement);
            }

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let action = ui::keymap::map_key(key);
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if let Some(request) = self.state.handle_action(action) {
            self.dispatch(request);
        }
    }

    /// Runs `request` in the background; its settlement is applied on a
    /// later tick.
    fn dispatch(&self, request: Request) {
        let client = self.client.clone();
        let auth = Arc::clone(&self.auth);
        let tx = self.settled_tx.clone();
        tokio::spawn(async move {
            let settlement = requests::execute(client, auth, request).await;
            if tx.send(settlement).is_err() {
                tracing::debug!("event loop gone, settlement discarded");
            }
        });
    }
}
