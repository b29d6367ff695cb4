use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

/// Credentials posted to `/register` and `/login`.
///
/// Missing fields deserialize as empty strings so that both endpoints can
/// answer with a body-level failure instead of an extractor rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Body of `/cart/add` and `/cart/remove`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartItemRequest {
    pub product: String,
}

/// Public view of an account. `cart` is only present on `/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserView {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<String>>,
}

/// Envelope returned by every JSON endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Machine-readable failure reason.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart: Option<Vec<String>>,
}

impl ApiResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            message: None,
            code: None,
            user: None,
            cart: None,
        }
    }

    pub fn failure(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            code: Some(code.to_string()),
            user: None,
            cart: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_user(mut self, user: UserView) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_cart(mut self, cart: Vec<String>) -> Self {
        self.cart = Some(cart);
        self
    }
}

// ============= Authentication Types =============

/// Claims carried by the session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the authenticated account.
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Already exists: {0}")]
    Duplicate(String),

    #[error("Not logged in")]
    Unauthenticated,

    #[error("Session rejected: {0}")]
    SessionRejected(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let (status, code, message) = match self {
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "unauthenticated",
                "not logged in".to_string(),
            ),
            // The reason stays in the logs; clients only learn the session is unusable.
            AppError::SessionRejected(_) => (
                StatusCode::FORBIDDEN,
                "session_rejected",
                "session expired".to_string(),
            ),
            // Malformed bodies are a business failure like any other.
            AppError::InvalidInput(msg) => (StatusCode::OK, "invalid_input", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AppError::Duplicate(msg) => (StatusCode::CONFLICT, "duplicate", msg),
            AppError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg),
            AppError::Auth(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "auth_error", msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", msg),
        };

        (status, axum::Json(ApiResponse::failure(code, message))).into_response()
    }
}

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        tracing::debug!(status = %rejection.status(), error = %rejection.body_text(), "rejected request body");
        AppError::InvalidInput(format!("invalid request body: {}", rejection.body_text()))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
