//! Per-user shopping carts.
//!
//! A cart is an ordered list of product identifiers stored as a JSON array in
//! the account row. It is a sequence, not a set: `add` appends even when the
//! product is already present, and `remove` drops *every* matching entry.
//!
//! # Update protocol
//!
//! Every mutation is a read-modify-write against the store. Two mutations
//! for the same user that overlap would both read the same cart and the later
//! write would discard the earlier one. [`UpdatePolicy::PerUserLock`] (the
//! default) serializes mutations per username so that cannot happen.
//! [`UpdatePolicy::Unguarded`] skips the lock and keeps the lost-update
//! window open; it exists to reproduce the behaviour of the unguarded
//! protocol and should not be used in production.

/// Username-keyed async locks.
pub mod locks;

use crate::db::CredentialStore;
use crate::types::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

pub use locks::{UserLockGuard, UserLocks};

/// How cart read-modify-write cycles are protected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UpdatePolicy {
    /// One mutation at a time per username.
    #[default]
    PerUserLock,
    /// No coordination; concurrent mutations for one user can lose updates.
    Unguarded,
}

/// Decodes a stored cart. Absent or unparsable data reads as an empty cart.
pub fn parse_cart(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(cart) => cart,
        Err(e) => {
            warn!(error = %e, "stored cart is not a JSON string array, treating as empty");
            Vec::new()
        }
    }
}

/// Cart reads and mutations on top of a [`CredentialStore`].
pub struct CartService {
    store: Arc<dyn CredentialStore>,
    locks: UserLocks,
    policy: UpdatePolicy,
}

impl CartService {
    pub fn new(store: Arc<dyn CredentialStore>, policy: UpdatePolicy) -> Self {
        Self {
            store,
            locks: UserLocks::new(),
            policy,
        }
    }

    /// Current cart for `username`.
    pub async fn get(&self, username: &str) -> Result<Vec<String>> {
        let user = self
            .store
            .get_user_by_username(username)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}'", username)))?;

        Ok(parse_cart(user.cart.as_deref()))
    }

    /// Appends `product` and returns the updated cart.
    pub async fn add(&self, username: &str, product: &str) -> Result<Vec<String>> {
        self.mutate(username, |cart| cart.push(product.to_string()))
            .await
    }

    /// Removes every entry equal to `product` and returns the updated cart.
    pub async fn remove(&self, username: &str, product: &str) -> Result<Vec<String>> {
        self.mutate(username, |cart| cart.retain(|p| p != product))
            .await
    }

    async fn mutate<F>(&self, username: &str, apply: F) -> Result<Vec<String>>
    where
        F: FnOnce(&mut Vec<String>),
    {
        let _guard = match self.policy {
            UpdatePolicy::PerUserLock => Some(self.locks.acquire(username).await),
            UpdatePolicy::Unguarded => None,
        };

        let mut cart = self.get(username).await?;
        apply(&mut cart);

        let encoded = serde_json::to_string(&cart)
            .map_err(|e| AppError::Internal(format!("Failed to encode cart: {}", e)))?;

        if !self.store.update_cart(username, &encoded).await? {
            return Err(AppError::NotFound(format!("user '{}'", username)));
        }

        debug!(username = %username, items = cart.len(), "cart updated");
        Ok(cart)
    }
}
