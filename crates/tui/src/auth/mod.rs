//! Login providers.
//!
//! The portal only needs to know who is signed in and with which [`Role`].
//! [`InMemoryAuth`] is a demo table with a simulated network delay; any other
//! credential service plugs in by implementing [`AuthProvider`].

use std::{collections::HashMap, fmt, future::Future, pin::Pin, time::Duration};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signed-in user. Lives in memory only and is dropped on logout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
}

pub type AuthFuture<'a> = Pin<Box<dyn Future<Output = Result<Session, AuthError>> + Send + 'a>>;

pub trait AuthProvider: Send + Sync {
    fn login<'a>(&'a self, username: &'a str, password: &'a str) -> AuthFuture<'a>;
}

#[derive(Debug, Clone)]
struct Credential {
    id: String,
    password: String,
    role: Role,
}

/// Hardcoded credential table. Not a security boundary.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuth {
    users: HashMap<String, Credential>,
    delay: Duration,
}

impl InMemoryAuth {
    pub fn new(delay: Duration) -> Self {
        Self {
            users: HashMap::new(),
            delay,
        }
    }

    /// Demo users: `admin/admin123`, `user/user123`, `john.doe/password`.
    pub fn with_demo_users(delay: Duration) -> Self {
        Self::new(delay)
            .with_user("1", "admin", "admin123", Role::Admin)
            .with_user("2", "user", "user123", Role::User)
            .with_user("3", "john.doe", "password", Role::User)
    }

    pub fn with_user(mut self, id: &str, username: &str, password: &str, role: Role) -> Self {
        self.users.insert(
            username.to_string(),
            Credential {
                id: id.to_string(),
                password: password.to_string(),
                role,
            },
        );
        self
    }
}

impl AuthProvider for InMemoryAuth {
    fn login<'a>(&'a self, username: &'a str, password: &'a str) -> AuthFuture<'a> {
        Box::pin(async move {
            tokio::time::sleep(self.delay).await;

            match self.users.get(username) {
                Some(credential) if credential.password == password => {
                    tracing::info!(username, role = %credential.role, "login succeeded");
                    Ok(Session {
                        id: credential.id.clone(),
                        username: username.to_string(),
                        role: credential.role,
                    })
                }
                _ => {
                    tracing::info!(username, "login rejected");
                    Err(AuthError::InvalidCredentials)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_users_sign_in_with_their_role() {
        let auth = InMemoryAuth::with_demo_users(Duration::ZERO);

        let admin = auth.login("admin", "admin123").await.unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert_eq!(admin.id, "1");

        let user = auth.login("john.doe", "password").await.unwrap();
        assert_eq!(user.role, Role::User);
        assert_eq!(user.username, "john.doe");
    }

    #[tokio::test]
    async fn wrong_password_or_unknown_user_is_rejected() {
        let auth = InMemoryAuth::with_demo_users(Duration::ZERO);

        assert_eq!(
            auth.login("admin", "user123").await,
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            auth.login("mallory", "admin123").await,
            Err(AuthError::InvalidCredentials)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn login_waits_for_the_simulated_delay() {
        let auth = InMemoryAuth::with_demo_users(Duration::from_millis(1000));
        let started = tokio::time::Instant::now();

        auth.login("user", "user123").await.unwrap();

        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
