//! Test doubles for the credential store.
//!
//! `InstrumentedStore` wraps a real in-memory `SqliteStore` and can count
//! calls, inject failures, slow reads down, or hold every cart read at a
//! barrier so that two mutations are forced to interleave.

#![allow(dead_code)]

use async_trait::async_trait;
use satchel::{
    cart::UpdatePolicy,
    db::{CredentialStore, SqliteStore, User},
    types::{AppError, Result},
    AppState, SessionCodec,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

/// Secret shared by every test server.
pub const TEST_SECRET: &str = "test_jwt_secret_key_for_testing_only";

/// A store that records and optionally perturbs every call.
pub struct InstrumentedStore {
    inner: SqliteStore,
    calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    read_delay: Option<Duration>,
    read_barrier: Option<Arc<Barrier>>,
}

impl InstrumentedStore {
    /// Transparent wrapper around a fresh in-memory database.
    pub async fn new() -> Self {
        Self {
            inner: SqliteStore::new_memory()
                .await
                .expect("Failed to create in-memory database"),
            calls: AtomicUsize::new(0),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            read_delay: None,
            read_barrier: None,
        }
    }

    /// Sleeps after every read, widening the read-modify-write window.
    pub fn with_read_delay(mut self, delay: Duration) -> Self {
        self.read_delay = Some(delay);
        self
    }

    /// Every read waits until `parties` reads are in flight.
    pub fn with_read_barrier(mut self, parties: usize) -> Self {
        self.read_barrier = Some(Arc::new(Barrier::new(parties)));
        self
    }

    pub fn inner(&self) -> &SqliteStore {
        &self.inner
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_calls(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl CredentialStore for InstrumentedStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("injected write failure".to_string()));
        }
        self.inner.create_user(username, password_hash).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Database("injected read failure".to_string()));
        }

        let user = self.inner.get_user_by_username(username).await?;

        if let Some(barrier) = &self.read_barrier {
            barrier.wait().await;
        }
        if let Some(delay) = self.read_delay {
            tokio::time::sleep(delay).await;
        }

        Ok(user)
    }

    async fn update_cart(&self, username: &str, cart_json: &str) -> Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::Database("injected write failure".to_string()));
        }
        self.inner.update_cart(username, cart_json).await
    }
}

/// Builds application state around `store`.
pub fn create_test_state(store: Arc<dyn CredentialStore>, policy: UpdatePolicy) -> AppState {
    AppState::new(store, Arc::new(SessionCodec::new(TEST_SECRET)), policy)
}
