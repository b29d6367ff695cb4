//! Accounts, sessions and the auth gate
//!
//! This module provides authentication infrastructure for Satchel.
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing and verification
//! - [`auth::jwt`](crate::auth::jwt) - Session token issuing and verification
//! - [`auth::accounts`](crate::auth::accounts) - Register / login flows
//! - [`auth::middleware`](crate::auth::middleware) - Axum auth gate, cookies and extractor
//!
//! # Sessions
//!
//! A session is an HS256 JWT `{sub, iat, exp}` valid for seven days, carried
//! in the `token` cookie (`HttpOnly`, `SameSite=Strict`). The server keeps no
//! session table: logging out clears the cookie, but a copied token remains
//! usable until it expires.
//!
//! ```ignore
//! use satchel::auth::jwt::SessionCodec;
//!
//! let codec = SessionCodec::new(&secret);
//! let token = codec.issue("alice")?;
//! assert_eq!(codec.verify(&token)?.sub, "alice");
//! ```
//!
//! # Protected Routes
//!
//! ```ignore
//! use axum::middleware;
//! use satchel::auth::middleware::{auth_middleware, AuthUser};
//!
//! let protected = Router::new()
//!     .route("/cart", get(handler))
//!     .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));
//!
//! async fn handler(user: AuthUser) -> String {
//!     user.username().to_string()
//! }
//! ```

/// Register and login flows.
pub mod accounts;
/// Session token encoding, decoding, and claims.
pub mod jwt;
/// Authentication middleware, session cookies and extractors.
pub mod middleware;
/// Password hashing.
pub mod password;
