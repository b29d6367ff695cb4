use crate::auth::jwt::TokenError;
use crate::types::{AppError, Claims};
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{info, warn};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "token";

/// Polled by clients to probe login state; a missing cookie there is normal.
pub const CHECK_LOGIN_PATH: &str = "/check-login";

/// Auth gate for protected routes.
///
/// Reads the session cookie, verifies it, and stores the `Claims` in the
/// request extensions. A missing cookie is rejected with 401; an invalid or
/// expired token with 403.
pub async fn auth_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path().to_string();

    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        if path != CHECK_LOGIN_PATH {
            warn!(path = %path, "request without session cookie, login required");
        }
        return Err(AppError::Unauthenticated);
    };

    let claims = match state.sessions.verify(cookie.value()) {
        Ok(claims) => claims,
        Err(TokenError::Expired) => {
            info!(path = %path, "session token expired");
            return Err(AppError::SessionRejected("expired".to_string()));
        }
        Err(TokenError::Invalid(reason)) => {
            warn!(path = %path, reason = %reason, "session token failed verification");
            return Err(AppError::SessionRejected(reason));
        }
    };

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Builds the `Set-Cookie` value for a freshly issued session token.
pub fn session_cookie(token: String, max_age: chrono::Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .max_age(time::Duration::seconds(max_age.num_seconds()))
        .build()
}

/// Cookie used to tell the client to discard its session.
pub fn cleared_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}

/// Identity of the caller, as established by [`auth_middleware`].
///
/// This is the only source of the username for protected handlers.
pub struct AuthUser(pub Claims);

impl AuthUser {
    pub fn username(&self) -> &str {
        &self.0.sub
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::Unauthenticated)
    }
}
