//! API request handlers.
//!
//! Handlers never fail at the HTTP level: business and store failures come
//! back as `200 {success: false}`. Only the auth gate answers 401/403.

/// Authentication handlers (register, login, logout, check-login).
pub mod auth;
/// Cart handlers.
pub mod cart;
/// Account profile handler.
pub mod profile;
