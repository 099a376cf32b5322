use api_types::{
    AccountNumber, Crn, MoneyCents,
    account::AccountNew,
    customer::{AddressNew, CustomerDelete, CustomerNew},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Digits only (CRNs, account numbers).
    Integer,
    /// Digits plus one decimal separator.
    Amount,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub placeholder: &'static str,
    pub kind: FieldKind,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, placeholder: &'static str, kind: FieldKind) -> Self {
        Self {
            label,
            placeholder,
            kind,
            value: String::new(),
        }
    }

    /// Whether `ch` may be typed into this field.
    pub fn accepts(&self, ch: char) -> bool {
        match self.kind {
            FieldKind::Text => !ch.is_control(),
            FieldKind::Integer => ch.is_ascii_digit(),
            FieldKind::Amount => {
                ch.is_ascii_digit()
                    || ((ch == '.' || ch == ',') && !self.value.contains(['.', ',']))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormId {
    AddCustomer,
    DeleteCustomer,
    OpenAccount,
    TransferFunds,
    ViewAccounts,
    AddAddress,
}

impl FormId {
    pub fn label(self) -> &'static str {
        match self {
            Self::AddCustomer => "Add Customer",
            Self::DeleteCustomer => "Delete Customer",
            Self::OpenAccount => "Open Account",
            Self::TransferFunds => "Transfer Funds",
            Self::ViewAccounts => "My Accounts",
            Self::AddAddress => "Add Address",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::AddCustomer => "Add New Customer",
            Self::DeleteCustomer => "Delete Customer",
            Self::OpenAccount => "Open New Account",
            Self::TransferFunds => "Transfer Funds",
            Self::ViewAccounts => "View Your Accounts",
            Self::AddAddress => "Add Secondary Address",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            Self::ViewAccounts => "Load Accounts",
            other => other.label(),
        }
    }

    pub fn notice(self) -> Option<&'static str> {
        match self {
            Self::DeleteCustomer => Some(
                "Warning: this action cannot be undone. All customer data and associated accounts will be permanently deleted.",
            ),
            Self::AddAddress => Some(
                "This will be added as a secondary address to your profile. Your primary address remains unchanged.",
            ),
            _ => None,
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::AddCustomer => "Customer added successfully!",
            Self::DeleteCustomer => "Customer deleted successfully!",
            Self::OpenAccount => "Account created successfully!",
            Self::TransferFunds => "Transaction completed successfully!",
            Self::ViewAccounts => "Accounts loaded successfully!",
            Self::AddAddress => "Address added successfully!",
        }
    }

    /// Fixed text shown on failure; the server's own message is only logged.
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::AddCustomer => "Failed to add customer. Please try again.",
            Self::DeleteCustomer => "Delete customer functionality not yet implemented in the API.",
            Self::OpenAccount => "Failed to create account. Please check the details and try again.",
            Self::TransferFunds => "Transaction failed. Please check the details and try again.",
            Self::ViewAccounts => "Failed to load accounts. Please check the CRN and try again.",
            Self::AddAddress => "Failed to add address. Please try again.",
        }
    }

    fn fields(self) -> Vec<Field> {
        use FieldKind::{Amount, Integer, Text};

        match self {
            Self::AddCustomer => vec![
                Field::new("Name", "customer's full name", Text),
                Field::new("City", "city", Text),
                Field::new("State", "state", Text),
                Field::new("ZIP Code", "ZIP code", Text),
            ],
            Self::DeleteCustomer => vec![Field::new("CRN", "CRN to delete", Integer)],
            Self::OpenAccount => vec![
                Field::new("CRN", "customer's CRN", Integer),
                Field::new("Initial Balance", "initial deposit", Amount),
            ],
            Self::TransferFunds => vec![
                Field::new("From", "sender account ID", Integer),
                Field::new("To", "recipient account ID", Integer),
                Field::new("Amount", "transfer amount", Amount),
            ],
            Self::ViewAccounts => vec![Field::new("CRN", "your CRN", Integer)],
            Self::AddAddress => vec![
                Field::new("CRN", "your CRN", Integer),
                Field::new("City", "city", Text),
                Field::new("State", "state", Text),
                Field::new("ZIP Code", "ZIP code", Text),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
}

/// Typed request built from a form's fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    CreateUser(CustomerNew),
    DeleteCustomer(CustomerDelete),
    OpenAccount(AccountNew),
    Transfer {
        sender: AccountNumber,
        recipient: AccountNumber,
        amount: MoneyCents,
    },
    LoadAccounts(Crn),
    AddAddress(AddressNew),
}

#[derive(Debug, Clone)]
pub struct FormState {
    pub id: FormId,
    pub fields: Vec<Field>,
    pub focus: usize,
    pub phase: Phase,
    pub success: Option<String>,
    pub error: Option<String>,
}

impl FormState {
    pub fn new(id: FormId) -> Self {
        Self {
            id,
            fields: id.fields(),
            focus: 0,
            phase: Phase::Idle,
            success: None,
            error: None,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Types `ch` into the focused field. Returns `false` when the field
    /// rejects it or the form is locked by an in-flight submission.
    pub fn input(&mut self, ch: char) -> bool {
        if self.is_submitting() {
            return false;
        }
        let Some(field) = self.fields.get_mut(self.focus) else {
            return false;
        };
        if !field.accepts(ch) {
            return false;
        }
        field.value.push(ch);
        true
    }

    pub fn backspace(&mut self) {
        if self.is_submitting() {
            return;
        }
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    pub fn prev_field(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    pub fn clear_banners(&mut self) {
        self.success = None;
        self.error = None;
    }

    fn reset_fields(&mut self) {
        for field in &mut self.fields {
            field.value.clear();
        }
        self.focus = 0;
    }

    /// Idle → Submitting.
    ///
    /// Returns `None` when a submission is already in flight or the fields
    /// fail their required/number constraints; in the latter case the
    /// validation message is shown and the form stays Idle.
    pub fn begin_submit(&mut self) -> Option<Submission> {
        if self.is_submitting() {
            return None;
        }

        match self.build_submission() {
            Ok(submission) => {
                self.clear_banners();
                self.phase = Phase::Submitting;
                Some(submission)
            }
            Err(message) => {
                self.success = None;
                self.error = Some(message);
                None
            }
        }
    }

    /// Submitting → Idle.
    pub fn settle(&mut self, succeeded: bool) {
        self.phase = Phase::Idle;
        if succeeded {
            self.success = Some(self.id.success_message().to_string());
            self.error = None;
            self.reset_fields();
        } else {
            self.success = None;
            self.error = Some(self.id.failure_message().to_string());
        }
    }

    fn text(&self, idx: usize) -> Result<String, String> {
        let field = &self.fields[idx];
        let value = field.value.trim();
        if value.is_empty() {
            return Err(format!("{} is required.", field.label));
        }
        Ok(value.to_string())
    }

    fn integer(&self, idx: usize) -> Result<u64, String> {
        let value = self.text(idx)?;
        value
            .parse()
            .map_err(|_| format!("{} must be a whole number.", self.fields[idx].label))
    }

    fn amount(&self, idx: usize, min: MoneyCents) -> Result<MoneyCents, String> {
        let label = self.fields[idx].label;
        let value = self.text(idx)?;
        let amount: MoneyCents = value
            .parse()
            .map_err(|err| format!("{label}: {err}."))?;
        if amount < min {
            return Err(format!("{label} must be at least {}.", min.format_grouped()));
        }
        Ok(amount)
    }

    fn build_submission(&self) -> Result<Submission, String> {
        Ok(match self.id {
            FormId::AddCustomer => Submission::CreateUser(CustomerNew {
                name: self.text(0)?,
                city: self.text(1)?,
                state: self.text(2)?,
                zip_code: self.text(3)?,
            }),
            FormId::DeleteCustomer => {
                Submission::DeleteCustomer(CustomerDelete { crn: self.integer(0)? })
            }
            FormId::OpenAccount => Submission::OpenAccount(AccountNew {
                crn: self.integer(0)?,
                initial_balance: self.amount(1, MoneyCents::ZERO)?,
            }),
            FormId::TransferFunds => Submission::Transfer {
                sender: AccountNumber(self.integer(0)?),
                recipient: AccountNumber(self.integer(1)?),
                amount: self.amount(2, MoneyCents::new(1))?,
            },
            FormId::ViewAccounts => Submission::LoadAccounts(self.integer(0)?),
            FormId::AddAddress => Submission::AddAddress(AddressNew {
                crn: self.integer(0)?,
                city: self.text(1)?,
                state: self.text(2)?,
                zip_code: self.text(3)?,
            }),
        })
    }
}
