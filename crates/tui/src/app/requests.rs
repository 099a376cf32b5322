use std::sync::Arc;

use api_types::{
    AccountNumber, Crn,
    account::{AccountBalance, AccountSummary, BalanceUpdate},
};

use crate::{
    app::forms::{FormId, Submission},
    auth::{AuthError, AuthProvider, Session},
    client::{Client, ClientError},
};

/// Work handed to the executor. `epoch` is the session epoch at dispatch.
#[derive(Debug, Clone)]
pub struct Request {
    pub epoch: u64,
    pub kind: RequestKind,
}

#[derive(Debug, Clone)]
pub enum RequestKind {
    Login {
        username: String,
        password: String,
    },
    Submit {
        form: FormId,
        submission: Submission,
    },
    RefreshBalance {
        generation: u64,
        account_number: AccountNumber,
    },
}

#[derive(Debug)]
pub struct Settlement {
    pub epoch: u64,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Login(Result<Session, AuthError>),
    Form {
        form: FormId,
        result: Result<(), ClientError>,
    },
    Accounts {
        crn: Crn,
        result: Result<Vec<AccountSummary>, ClientError>,
    },
    Balance {
        generation: u64,
        account_number: AccountNumber,
        result: Result<AccountBalance, ClientError>,
    },
}

/// Runs one request to settlement. Exactly one provider or client call is
/// made per request.
pub async fn execute(client: Client, auth: Arc<dyn AuthProvider>, request: Request) -> Settlement {
    let Request { epoch, kind } = request;

    let outcome = match kind {
        RequestKind::Login { username, password } => {
            Outcome::Login(auth.login(&username, &password).await)
        }
        RequestKind::Submit { form, submission } => submit(&client, form, submission).await,
        RequestKind::RefreshBalance {
            generation,
            account_number,
        } => Outcome::Balance {
            generation,
            account_number,
            result: client.get_account_balance(account_number).await,
        },
    };

    Settlement { epoch, outcome }
}

async fn submit(client: &Client, form: FormId, submission: Submission) -> Outcome {
    let result = match submission {
        Submission::LoadAccounts(crn) => {
            return Outcome::Accounts {
                crn,
                result: client.get_customer_accounts(crn).await,
            };
        }
        Submission::CreateUser(payload) => client
            .create_user(&payload)
            .await
            .map(|created| tracing::info!(crn = created.crn, "customer created")),
        Submission::DeleteCustomer(payload) => client.delete_customer(&payload).await,
        Submission::OpenAccount(payload) => {
            client.add_account(&payload).await.map(|created| {
                tracing::info!(crn = payload.crn, account = %created.account_number, "account opened")
            })
        }
        Submission::Transfer {
            sender,
            recipient,
            amount,
        } => {
            // The API has no transfer endpoint: the sender's balance is
            // overwritten with the amount and the recipient is never touched.
            tracing::debug!(%sender, %recipient, "transfer issued as update_balance on sender");
            client
                .update_balance(&BalanceUpdate {
                    account_number: sender,
                    new_balance: amount,
                })
                .await
                .map(|_| ())
        }
        Submission::AddAddress(payload) => client.add_address(&payload).await.map(|added| {
            tracing::info!(crn = payload.crn, address_id = ?added.address_id, "address added")
        }),
    };

    Outcome::Form { form, result }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use api_types::{
        MoneyCents,
        account::AccountNew,
        customer::{AddressNew, CustomerDelete, CustomerNew},
    };
    use axum::{
        Json, Router,
        extract::State,
        routing::{post, put},
    };
    use serde_json::{Value, json};

    use super::*;
    use crate::{
        auth::InMemoryAuth,
        client::{Operation, tests::spawn_api},
    };

    type Seen = Arc<Mutex<Vec<(&'static str, Value)>>>;

    fn record(seen: &Seen, route: &'static str, body: Value) {
        seen.lock().unwrap().push((route, body));
    }

    fn recording_api(seen: Seen) -> Router {
        Router::new()
            .route(
                "/create_user",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    record(&seen, "create_user", body);
                    Json(json!({"message": "User created successfully", "crn": 42}))
                }),
            )
            .route(
                "/add_account",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    record(&seen, "add_account", body);
                    Json(json!({"message": "Account created successfully", "account_number": 5001}))
                }),
            )
            .route(
                "/add_address",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    record(&seen, "add_address", body);
                    Json(json!({"message": "Address added successfully", "address_id": 3}))
                }),
            )
            .route(
                "/update_balance",
                put(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    let new_balance = body["new_balance"].clone();
                    record(&seen, "update_balance", body);
                    Json(json!({"message": "Balance updated successfully", "new_balance": new_balance}))
                }),
            )
            .with_state(seen)
    }

    async fn run(client: &Client, form: FormId, submission: Submission) -> Outcome {
        let auth: Arc<dyn AuthProvider> = Arc::new(InMemoryAuth::new(Duration::ZERO));
        let request = Request {
            epoch: 3,
            kind: RequestKind::Submit { form, submission },
        };
        let settlement = execute(client.clone(), auth, request).await;
        assert_eq!(settlement.epoch, 3);
        settlement.outcome
    }

    #[tokio::test]
    async fn transfer_overwrites_sender_balance_only() {
        let seen = Seen::default();
        let client = Client::new(&spawn_api(recording_api(seen.clone())).await).unwrap();

        let outcome = run(
            &client,
            FormId::TransferFunds,
            Submission::Transfer {
                sender: AccountNumber(1001),
                recipient: AccountNumber(2002),
                amount: MoneyCents::new(4_050),
            },
        )
        .await;

        assert!(matches!(
            outcome,
            Outcome::Form {
                form: FormId::TransferFunds,
                result: Ok(())
            }
        ));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "update_balance");
        assert_eq!(
            seen[0].1,
            json!({"account_number": 1001, "new_balance": 40.5})
        );
    }

    #[tokio::test]
    async fn each_form_settles_under_its_own_id() {
        let seen = Seen::default();
        let client = Client::new(&spawn_api(recording_api(seen.clone())).await).unwrap();

        let outcome = run(
            &client,
            FormId::AddCustomer,
            Submission::CreateUser(CustomerNew {
                name: "Ada".to_string(),
                city: "Pune".to_string(),
                state: "MH".to_string(),
                zip_code: "411001".to_string(),
            }),
        )
        .await;
        assert!(matches!(
            outcome,
            Outcome::Form {
                form: FormId::AddCustomer,
                result: Ok(())
            }
        ));

        let outcome = run(
            &client,
            FormId::OpenAccount,
            Submission::OpenAccount(AccountNew {
                crn: 42,
                initial_balance: MoneyCents::new(10_000),
            }),
        )
        .await;
        assert!(matches!(
            outcome,
            Outcome::Form {
                form: FormId::OpenAccount,
                result: Ok(())
            }
        ));

        let outcome = run(
            &client,
            FormId::AddAddress,
            Submission::AddAddress(AddressNew {
                crn: 42,
                city: "Mumbai".to_string(),
                state: "MH".to_string(),
                zip_code: "400001".to_string(),
            }),
        )
        .await;
        assert!(matches!(
            outcome,
            Outcome::Form {
                form: FormId::AddAddress,
                result: Ok(())
            }
        ));

        let outcome = run(
            &client,
            FormId::DeleteCustomer,
            Submission::DeleteCustomer(CustomerDelete { crn: 42 }),
        )
        .await;
        assert!(matches!(
            outcome,
            Outcome::Form {
                form: FormId::DeleteCustomer,
                result: Err(ClientError::Unsupported(Operation::DeleteCustomer))
            }
        ));

        let seen = seen.lock().unwrap();
        let routes: Vec<_> = seen.iter().map(|(route, _)| *route).collect();
        assert_eq!(routes, vec!["create_user", "add_account", "add_address"]);
        assert_eq!(
            seen[0].1,
            json!({"name": "Ada", "city": "Pune", "state": "MH", "zip_code": "411001"})
        );
        assert_eq!(seen[1].1, json!({"crn": 42, "initial_balance": 100.0}));
        assert_eq!(
            seen[2].1,
            json!({"crn": 42, "city": "Mumbai", "state": "MH", "zip_code": "400001"})
        );
    }
}
