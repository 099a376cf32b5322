use std::fmt;

use api_types::{
    AccountNumber, Crn,
    account::{
        AccountBalance, AccountCreated, AccountNew, AccountSummary, BalanceUpdate,
        BalanceUpdated,
    },
    customer::{AddressAdded, AddressNew, CustomerCreated, CustomerDelete, CustomerNew},
    error::ErrorResponse,
};
use reqwest::{RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{AppError, Result};

/// Remote operations exposed by the account API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    AddAddress,
    AddAccount,
    DeleteCustomer,
    UpdateBalance,
    GetCustomerAccounts,
    GetAccountBalance,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Self::CreateUser => "create_user",
            Self::AddAddress => "add_address",
            Self::AddAccount => "add_account",
            Self::DeleteCustomer => "delete_customer",
            Self::UpdateBalance => "update_balance",
            Self::GetCustomerAccounts => "get_customer_accounts",
            Self::GetAccountBalance => "get_account_balance",
        }
    }

    /// Message used when the server gives no `detail`.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::CreateUser => "Failed to create user",
            Self::AddAddress => "Failed to add address",
            Self::AddAccount => "Failed to create account",
            Self::DeleteCustomer => "Failed to delete customer",
            Self::UpdateBalance => "Failed to update balance",
            Self::GetCustomerAccounts => "Failed to fetch customer accounts",
            Self::GetAccountBalance => "Failed to fetch account balance",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("{operation} failed ({status}): {message}")]
    Request {
        operation: Operation,
        status: StatusCode,
        message: String,
    },
    /// The request never produced a usable response.
    #[error("{operation} failed: {source}")]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
    #[error("{0} is not available on the account API")]
    Unsupported(Operation),
}

impl ClientError {
    /// Human readable message carried by the error.
    pub fn message(&self) -> String {
        match self {
            Self::Request { message, .. } => message.clone(),
            Self::Transport { source, .. } => source.to_string(),
            Self::Unsupported(operation) => {
                format!("{} is not available on the account API", operation.name())
            }
        }
    }

    pub fn operation(&self) -> Operation {
        match self {
            Self::Request { operation, .. } | Self::Transport { operation, .. } => *operation,
            Self::Unsupported(operation) => *operation,
        }
    }
}

type ClientResult<T> = std::result::Result<T, ClientError>;

/// Thin HTTP client over the account-management API.
///
/// Every method issues exactly one request. No retries, no timeout.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| {
                AppError::Config(::config::ConfigError::Message(format!(
                    "invalid base_url: {err}"
                )))
            })?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn send<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let res = request
            .send()
            .await
            .map_err(|source| transport(operation, source))?;

        let status = res.status();
        if status.is_success() {
            return res
                .json::<T>()
                .await
                .map_err(|source| transport(operation, source));
        }

        let body = res.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&body) {
            Ok(ErrorResponse {
                detail: Some(detail),
            }) => detail,
            _ => {
                tracing::debug!(operation = operation.name(), "error body without detail: {body}");
                operation.fallback_message().to_string()
            }
        };
        tracing::warn!(
            operation = operation.name(),
            status = status.as_u16(),
            "request failed: {message}"
        );

        Err(ClientError::Request {
            operation,
            status,
            message,
        })
    }

    pub async fn create_user(&self, payload: &CustomerNew) -> ClientResult<CustomerCreated> {
        tracing::debug!("POST /create_user");
        let request = self.http.post(self.url("create_user")).json(payload);
        self.send(Operation::CreateUser, request).await
    }

    pub async fn add_address(&self, payload: &AddressNew) -> ClientResult<AddressAdded> {
        tracing::debug!("POST /add_address");
        let request = self.http.post(self.url("add_address")).json(payload);
        self.send(Operation::AddAddress, request).await
    }

    pub async fn add_account(&self, payload: &AccountNew) -> ClientResult<AccountCreated> {
        tracing::debug!("POST /add_account");
        let request = self.http.post(self.url("add_account")).json(payload);
        self.send(Operation::AddAccount, request).await
    }

    /// The account API exposes no delete endpoint, so this always fails
    /// without touching the network.
    pub async fn delete_customer(&self, payload: &CustomerDelete) -> ClientResult<()> {
        tracing::warn!(crn = payload.crn, "delete_customer has no backing endpoint");
        Err(ClientError::Unsupported(Operation::DeleteCustomer))
    }

    /// Overwrites the balance of a single account.
    pub async fn update_balance(&self, payload: &BalanceUpdate) -> ClientResult<BalanceUpdated> {
        tracing::debug!("PUT /update_balance");
        let request = self.http.put(self.url("update_balance")).json(payload);
        self.send(Operation::UpdateBalance, request).await
    }

    pub async fn get_customer_accounts(&self, crn: Crn) -> ClientResult<Vec<AccountSummary>> {
        let path = format!("customer/{crn}/accounts");
        tracing::debug!("GET /{path}");
        let request = self.http.get(self.url(&path));
        self.send(Operation::GetCustomerAccounts, request).await
    }

    pub async fn get_account_balance(
        &self,
        account_number: AccountNumber,
    ) -> ClientResult<AccountBalance> {
        let path = format!("account/{account_number}/balance");
        tracing::debug!("GET /{path}");
        let request = self.http.get(self.url(&path));
        self.send(Operation::GetAccountBalance, request).await
    }
}

fn transport(operation: Operation, source: reqwest::Error) -> ClientError {
    tracing::warn!(operation = operation.name(), "transport failure: {source}");
    ClientError::Transport { operation, source }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::{Arc, Mutex};

    use api_types::MoneyCents;
    use axum::{
        Json, Router,
        extract::{Path, State},
        http::StatusCode as AxumStatus,
        routing::{get, post, put},
    };
    use serde_json::{Value, json};

    use super::*;

    /// Serves `router` on an ephemeral port and returns its base URL.
    pub(crate) async fn spawn_api(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn create_user_posts_flat_shape() {
        let router = Router::new().route(
            "/create_user",
            post(|Json(body): Json<CustomerNew>| async move {
                Json(json!({
                    "message": "User created successfully",
                    "crn": 42,
                    "address": {"city": body.city, "state": body.state, "zip_code": body.zip_code}
                }))
            }),
        );
        let client = Client::new(&spawn_api(router).await).unwrap();

        let created = client
            .create_user(&CustomerNew {
                name: "Ada".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                zip_code: "411001".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.crn, 42);
        assert_eq!(created.address.unwrap().city, "Pune");
    }

    #[tokio::test]
    async fn update_balance_uses_put_with_numeric_fields() {
        let seen: Arc<Mutex<Option<Value>>> = Arc::default();
        let router = Router::new()
            .route(
                "/update_balance",
                put(
                    |State(seen): State<Arc<Mutex<Option<Value>>>>, Json(body): Json<Value>| async move {
                        *seen.lock().unwrap() = Some(body);
                        Json(json!({"message": "Balance updated successfully", "new_balance": 75.5}))
                    },
                ),
            )
            .with_state(seen.clone());
        let client = Client::new(&spawn_api(router).await).unwrap();

        let updated = client
            .update_balance(&BalanceUpdate {
                account_number: AccountNumber(1001),
                new_balance: MoneyCents::new(7550),
            })
            .await
            .unwrap();

        assert_eq!(updated.new_balance, Some(MoneyCents::new(7550)));
        let body = seen.lock().unwrap().clone().unwrap();
        assert_eq!(body, json!({"account_number": 1001, "new_balance": 75.5}));
    }

    #[tokio::test]
    async fn account_routes_interpolate_identifiers() {
        let router = Router::new()
            .route(
                "/customer/{crn}/accounts",
                get(|Path(crn): Path<u64>| async move {
                    Json(json!([
                        {"account_number": format!("{}01", crn), "balance": 1.0},
                        {"account_number": format!("{}02", crn), "balance": 2.0}
                    ]))
                }),
            )
            .route(
                "/account/{account_number}/balance",
                get(|Path(number): Path<u64>| async move {
                    Json(json!({"account_number": number, "balance": 532.10, "last_updated": null}))
                }),
            );
        let client = Client::new(&spawn_api(router).await).unwrap();

        let accounts = client.get_customer_accounts(10).await.unwrap();
        let numbers: Vec<_> = accounts.iter().map(|a| a.account_number).collect();
        assert_eq!(numbers, vec![AccountNumber(1001), AccountNumber(1002)]);

        let balance = client
            .get_account_balance(AccountNumber(1001))
            .await
            .unwrap();
        assert_eq!(balance.account_number, AccountNumber(1001));
        assert_eq!(balance.balance.format_grouped(), "532.10");
    }

    #[tokio::test]
    async fn error_detail_is_extracted() {
        let router = Router::new().route(
            "/customer/{crn}/accounts",
            get(|| async {
                (
                    AxumStatus::NOT_FOUND,
                    Json(json!({"detail": "CRN not found"})),
                )
            }),
        );
        let client = Client::new(&spawn_api(router).await).unwrap();

        let err = client.get_customer_accounts(9999).await.unwrap_err();
        assert_eq!(err.message(), "CRN not found");
        assert_eq!(err.operation(), Operation::GetCustomerAccounts);
        assert!(matches!(
            err,
            ClientError::Request { status, .. } if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn missing_detail_falls_back_to_operation_message() {
        let router = Router::new()
            .route(
                "/add_account",
                post(|| async { (AxumStatus::BAD_REQUEST, "not json") }),
            )
            .route(
                "/add_address",
                post(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, Json(json!({"error": "x"}))) }),
            );
        let client = Client::new(&spawn_api(router).await).unwrap();

        let err = client
            .add_account(&AccountNew {
                crn: 1,
                initial_balance: MoneyCents::ZERO,
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to create account");

        let err = client
            .add_address(&AddressNew {
                crn: 1,
                city: "Oslo".to_string(),
                state: "OS".to_string(),
                zip_code: "0150".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Failed to add address");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = Client::new(&format!("http://{addr}")).unwrap();

        let err = client
            .get_account_balance(AccountNumber(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport { .. }));
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn delete_customer_is_unsupported() {
        let client = Client::new("http://localhost:8000").unwrap();
        let err = client
            .delete_customer(&CustomerDelete { crn: 5 })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Unsupported(Operation::DeleteCustomer)));
    }

    #[test]
    fn invalid_base_url_is_a_config_error() {
        let err = Client::new("not a url").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("config error: invalid base_url"));
    }
}
