//! # Satchel
//!
//! An HTTP backend that registers and authenticates users, issues a signed
//! session cookie, and keeps one shopping cart per account.
//!
//! ## Overview
//!
//! Satchel can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `satchel-server` binary
//! 2. **As a library** - Mount [`build_app`] in your own axum application
//!
//! ### Library Usage
//!
//! ```rust,ignore
//! use satchel::{build_app, AppState, SessionCodec, cart::UpdatePolicy, db::DatabaseProvider};
//! use std::sync::Arc;
//!
//! let store = DatabaseProvider::Memory.create_store().await?;
//! let sessions = Arc::new(SessionCodec::new(&secret));
//! let app = build_app(AppState::new(store, sessions, UpdatePolicy::PerUserLock));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! ## Modules
//!
//! - [`api`] - HTTP handlers and routes
//! - [`auth`] - Password hashing, session tokens, the auth gate
//! - [`cart`] - Cart reads and serialized read-modify-write updates
//! - [`db`] - Credential store (libsql)
//! - [`types`] - Request/response envelopes and errors
//! - [`utils`] - `satchel.toml` configuration
//! - [`cli`] - Command line interface

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Authentication, sessions and the auth gate.
pub mod auth;
/// Per-user shopping carts.
pub mod cart;
/// Command line interface.
pub mod cli;
/// Credential store.
pub mod db;
/// Core types (requests, responses, errors).
#[allow(missing_docs)]
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::accounts::AccountService;
pub use auth::jwt::SessionCodec;
pub use cart::CartService;
pub use db::{CredentialStore, SqliteStore};
pub use types::{AppError, Result};
pub use utils::toml_config::SatchelConfig;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body. Every endpoint takes a tiny JSON object.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Account records
    pub store: Arc<dyn CredentialStore>,
    /// Session token codec
    pub sessions: Arc<SessionCodec>,
    /// Register / login flows
    pub accounts: Arc<AccountService>,
    /// Cart reads and updates
    pub carts: Arc<CartService>,
}

impl AppState {
    /// Wires the services around one store and one codec.
    pub fn new(
        store: Arc<dyn CredentialStore>,
        sessions: Arc<SessionCodec>,
        policy: cart::UpdatePolicy,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(store.clone(), sessions.clone())),
            carts: Arc::new(CartService::new(store.clone(), policy)),
            store,
            sessions,
        }
    }
}

/// Builds the complete application router.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(api::routes::create_router(state.clone()));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", api::ApiDoc::openapi()),
        )
    };

    router
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
