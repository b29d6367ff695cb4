//! HTTP API Handlers and Routes
//!
//! This module provides the HTTP layer for Satchel, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and router configuration
//!
//! # API Endpoints
//!
//! ## Accounts
//! - `POST /register` - Create an account (does not log in)
//! - `POST /login` - Verify credentials and set the session cookie
//! - `POST /logout` - Clear the session cookie
//! - `GET /check-login` - Report the logged-in user
//! - `GET /profile` - Username and cart
//!
//! ## Cart
//! - `GET /cart` - Current cart
//! - `POST /cart/add` - Append a product
//! - `POST /cart/remove` - Remove every occurrence of a product
//!
//! ## Health
//! - `GET /health` - Liveness check
//!
//! # Authentication
//!
//! Protected endpoints read the session token from the `token` cookie set by
//! `/login`. A missing cookie is answered with 401, an invalid or expired one
//! with 403.
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

use utoipa::OpenApi;

/// Request body extractors.
pub mod extract;
/// Request and response handlers for all API endpoints.
pub mod handlers;
/// Router configuration and route definitions.
pub mod routes;

/// OpenAPI description of the HTTP surface.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::check_login,
        handlers::profile::profile,
        handlers::cart::get_cart,
        handlers::cart::add_to_cart,
        handlers::cart::remove_from_cart,
    ),
    components(schemas(
        crate::types::CredentialsRequest,
        crate::types::CartItemRequest,
        crate::types::ApiResponse,
        crate::types::UserView,
    )),
    tags(
        (name = "auth", description = "Registration, login and sessions"),
        (name = "account", description = "Account profile"),
        (name = "cart", description = "Per-user shopping cart")
    )
)]
pub struct ApiDoc;
