use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, de::Error as _};

pub mod money;

pub use money::{AmountError, MoneyCents};

/// Customer reference number, assigned by the server on creation.
pub type Crn = u64;

/// Account identifier.
///
/// Always sent as a JSON number. The server stores it as text, so responses
/// may carry either `1001` or `"1001"`; both are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AccountNumber(pub u64);

impl fmt::Display for AccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for AccountNumber {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(value) => Ok(Self(value)),
            Raw::Text(text) => text
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| D::Error::custom(format!("invalid account number: {text}"))),
        }
    }
}

pub mod customer {
    use super::*;

    /// Body of `POST /create_user`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CustomerNew {
        pub name: String,
        pub city: String,
        pub state: String,
        pub zip_code: String,
    }

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct Address {
        pub city: String,
        pub state: String,
        pub zip_code: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CustomerCreated {
        #[serde(default)]
        pub message: Option<String>,
        pub crn: Crn,
        #[serde(default)]
        pub address: Option<Address>,
    }

    /// Body of `POST /add_address`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AddressNew {
        pub crn: Crn,
        pub city: String,
        pub state: String,
        pub zip_code: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AddressAdded {
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub address_id: Option<u64>,
    }

    /// Request to remove a customer. The remote API has no endpoint for it.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct CustomerDelete {
        pub crn: Crn,
    }
}

pub mod account {
    use chrono::NaiveDateTime;

    use super::*;

    /// Body of `POST /add_account`.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct AccountNew {
        pub crn: Crn,
        pub initial_balance: MoneyCents,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct AccountCreated {
        #[serde(default)]
        pub message: Option<String>,
        pub account_number: AccountNumber,
    }

    /// Body of `PUT /update_balance`.
    ///
    /// Overwrites the balance of one account; there is no counterpart leg.
    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct BalanceUpdate {
        pub account_number: AccountNumber,
        pub new_balance: MoneyCents,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct BalanceUpdated {
        #[serde(default)]
        pub message: Option<String>,
        #[serde(default)]
        pub new_balance: Option<MoneyCents>,
    }

    /// One entry of `GET /customer/{crn}/accounts`.
    ///
    /// The listing may embed a balance; the portal ignores it until the user
    /// asks for that account's balance explicitly.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AccountSummary {
        pub account_number: AccountNumber,
        #[serde(default)]
        pub balance: Option<MoneyCents>,
        #[serde(default)]
        pub created_at: Option<NaiveDateTime>,
        #[serde(default)]
        pub last_updated: Option<NaiveDateTime>,
    }

    /// Response of `GET /account/{account_number}/balance`.
    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct AccountBalance {
        pub account_number: AccountNumber,
        pub balance: MoneyCents,
        #[serde(default)]
        pub last_updated: Option<NaiveDateTime>,
    }
}

pub mod error {
    use super::*;

    /// Error body returned by the remote API. `detail` is optional.
    #[derive(Debug, Clone, Default, Serialize, Deserialize)]
    pub struct ErrorResponse {
        #[serde(default)]
        pub detail: Option<String>,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AccountNumber,
        account::{AccountBalance, AccountSummary},
        customer::CustomerCreated,
    };

    #[test]
    fn account_number_accepts_text_or_number() {
        let text: AccountNumber = serde_json::from_str("\"1001\"").unwrap();
        let number: AccountNumber = serde_json::from_str("1001").unwrap();
        assert_eq!(text, number);
        assert!(serde_json::from_str::<AccountNumber>("\"abc\"").is_err());
        assert_eq!(serde_json::to_string(&text).unwrap(), "1001");
    }

    #[test]
    fn account_listing_parses_server_rows() {
        let body = r#"[
            {"account_number": "1001", "balance": 10.0,
             "created_at": "2024-05-01T10:00:00.123456", "last_updated": "2024-05-02T08:30:00"},
            {"account_number": 2002, "balance": null, "created_at": null, "last_updated": null}
        ]"#;
        let rows: Vec<AccountSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account_number, AccountNumber(1001));
        assert!(rows[0].created_at.is_some());
        assert_eq!(rows[1].balance, None);
    }

    #[test]
    fn balance_response_parses_float() {
        let body = r#"{"account_number": "1001", "balance": 532.10, "last_updated": null}"#;
        let balance: AccountBalance = serde_json::from_str(body).unwrap();
        assert_eq!(balance.balance.format_grouped(), "532.10");
    }

    #[test]
    fn created_customer_tolerates_missing_fields() {
        let created: CustomerCreated = serde_json::from_str(r#"{"crn": 7}"#).unwrap();
        assert_eq!(created.crn, 7);
        assert!(created.address.is_none());
    }
}
