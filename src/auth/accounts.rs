use crate::auth::jwt::SessionCodec;
use crate::auth::password::PasswordHasher;
use crate::db::CredentialStore;
use crate::types::AppError;
use std::sync::Arc;
use tracing::{error, info};

/// Why a registration was refused.
#[derive(Debug, thiserror::Error)]
pub enum RegisterError {
    #[error("username and password are required")]
    MissingField,
    #[error("account already exists")]
    Duplicate,
    #[error("registration failed")]
    Store(#[source] AppError),
}

impl RegisterError {
    /// Stable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            RegisterError::MissingField => "missing_field",
            RegisterError::Duplicate => "duplicate_username",
            RegisterError::Store(_) => "store_error",
        }
    }
}

/// Why a login was refused.
///
/// Checked in this order: store failure, unknown account, wrong password.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("database error")]
    Store(#[source] AppError),
    #[error("account does not exist")]
    UnknownAccount,
    #[error("wrong password")]
    WrongPassword,
}

impl LoginError {
    /// Stable code reported to clients.
    pub fn code(&self) -> &'static str {
        match self {
            LoginError::Store(_) => "store_error",
            LoginError::UnknownAccount => "unknown_account",
            LoginError::WrongPassword => "wrong_password",
        }
    }
}

/// A successful login: the canonical username and a fresh session token.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub username: String,
    pub token: String,
}

/// Registration and login over the credential store.
pub struct AccountService {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    codec: Arc<SessionCodec>,
}

impl AccountService {
    pub fn new(store: Arc<dyn CredentialStore>, codec: Arc<SessionCodec>) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            codec,
        }
    }

    /// Creates an account. Does not log the caller in.
    pub async fn register(&self, username: &str, password: &str) -> Result<i64, RegisterError> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(RegisterError::MissingField);
        }

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| RegisterError::Store(AppError::Internal(e.to_string())))?
            .map_err(RegisterError::Store)?;

        match self.store.create_user(username, &password_hash).await {
            Ok(id) => {
                info!(username = %username, id, "account registered");
                Ok(id)
            }
            Err(AppError::Duplicate(_)) => {
                info!(username = %username, "registration rejected: username taken");
                Err(RegisterError::Duplicate)
            }
            Err(e) => {
                error!(username = %username, error = %e, "registration failed");
                Err(RegisterError::Store(e))
            }
        }
    }

    /// Verifies credentials and issues a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginSuccess, LoginError> {
        let user = self
            .store
            .get_user_by_username(username)
            .await
            .map_err(|e| {
                error!(username = %username, error = %e, "login lookup failed");
                LoginError::Store(e)
            })?
            .ok_or(LoginError::UnknownAccount)?;

        let hasher = self.hasher.clone();
        let plaintext = password.to_string();
        let stored = user.password_hash.clone();
        let valid = tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &stored))
            .await
            .map_err(|e| LoginError::Store(AppError::Internal(e.to_string())))?;

        if !valid {
            info!(username = %username, "login rejected: wrong password");
            return Err(LoginError::WrongPassword);
        }

        let token = self.codec.issue(&user.username).map_err(|e| {
            error!(username = %username, error = %e, "failed to issue session token");
            LoginError::Store(e)
        })?;

        info!(username = %user.username, "login succeeded");
        Ok(LoginSuccess {
            username: user.username,
            token,
        })
    }
}
