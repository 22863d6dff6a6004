//! Accounts: registration, mock login and the profile.
//!
//! There is exactly one registered account, stored under
//! [`keys::REGISTERED_USER`].  Logging in compares the typed credentials with
//! it and, on success, copies the account to [`keys::SESSION_USER`].  Logging
//! out removes that snapshot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::store::{keys, KeyValueStore, StoreError};

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Fill in every field.")]
    MissingFields,

    #[error("No registered user")]
    NoRegisteredUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Stored account is unreadable: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A registered account.  Field names match the persisted JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "nome")]
    pub name: String,

    pub email: String,

    /// Stored as typed; the login is a mock.
    #[serde(rename = "senha", default)]
    pub password: String,

    #[serde(rename = "telefone", default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// URI of the profile photo.
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Create (or replace) the registered account.
pub fn register(
    store: &mut dyn KeyValueStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    if name.is_empty() || email.is_empty() || password.is_empty() {
        return Err(AccountError::MissingFields);
    }

    let user = User {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
        phone: None,
        photo: None,
    };
    store.set(keys::REGISTERED_USER, &serde_json::to_string(&user)?)?;

    tracing::info!(email = %user.email, "account registered");
    Ok(user)
}

/// Check `email`/`password` (both trimmed) against the registered account.
pub fn login(
    store: &mut dyn KeyValueStore,
    email: &str,
    password: &str,
) -> Result<User, AccountError> {
    let user = load_profile(store)?.ok_or(AccountError::NoRegisteredUser)?;

    let password = password.trim();
    if user.email != email.trim() || password.is_empty() || user.password != password {
        tracing::warn!(email = %email.trim(), "login rejected");
        return Err(AccountError::InvalidCredentials);
    }

    store.set(keys::SESSION_USER, &serde_json::to_string(&user)?)?;
    tracing::info!(email = %user.email, "logged in");
    Ok(user)
}

pub fn logout(store: &mut dyn KeyValueStore) -> Result<(), AccountError> {
    store.remove(keys::SESSION_USER)?;
    tracing::info!("logged out");
    Ok(())
}

/// The registered account, if any.
pub fn load_profile(store: &dyn KeyValueStore) -> Result<Option<User>, AccountError> {
    match store.get(keys::REGISTERED_USER)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Overwrite the registered account with `user`.
pub fn save_profile(store: &mut dyn KeyValueStore, user: &User) -> Result<(), AccountError> {
    store.set(keys::REGISTERED_USER, &serde_json::to_string(user)?)?;
    tracing::info!(email = %user.email, "profile saved");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
