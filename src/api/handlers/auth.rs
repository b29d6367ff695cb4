use crate::{
    api::extract::JsonBody,
    auth::middleware::{cleared_session_cookie, session_cookie, AuthUser},
    types::{ApiResponse, CredentialsRequest, UserView},
    AppState,
};
use axum::{extract::State, Json};
use axum_extra::extract::cookie::CookieJar;

/// Register a new account
#[utoipa::path(
    post,
    path = "/register",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Account created, or `success: false` with the reason", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> Json<ApiResponse> {
    match state
        .accounts
        .register(&payload.username, &payload.password)
        .await
    {
        Ok(_) => Json(ApiResponse::ok().with_message("registration successful")),
        Err(e) => Json(ApiResponse::failure(e.code(), e.to_string())),
    }
}

/// Login with username and password
///
/// On success the session token is set as the `token` cookie.
#[utoipa::path(
    post,
    path = "/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Logged in, or `success: false` with the reason", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(payload): JsonBody<CredentialsRequest>,
) -> (CookieJar, Json<ApiResponse>) {
    match state
        .accounts
        .login(&payload.username, &payload.password)
        .await
    {
        Ok(success) => {
            let jar = jar.add(session_cookie(success.token, state.sessions.ttl()));
            let body = ApiResponse::ok()
                .with_message("login successful")
                .with_user(UserView {
                    username: success.username,
                    cart: None,
                });
            (jar, Json(body))
        }
        Err(e) => (jar, Json(ApiResponse::failure(e.code(), e.to_string()))),
    }
}

/// Logout by clearing the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    responses((status = 200, description = "Session cookie cleared", body = ApiResponse)),
    tag = "auth"
)]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<ApiResponse>) {
    (
        jar.remove(cleared_session_cookie()),
        Json(ApiResponse::ok().with_message("logged out")),
    )
}

/// Report the logged-in user
#[utoipa::path(
    get,
    path = "/check-login",
    responses(
        (status = 200, description = "Session is valid", body = ApiResponse),
        (status = 401, description = "No session cookie", body = ApiResponse),
        (status = 403, description = "Session invalid or expired", body = ApiResponse)
    ),
    tag = "auth"
)]
pub async fn check_login(user: AuthUser) -> Json<ApiResponse> {
    Json(ApiResponse::ok().with_user(UserView {
        username: user.0.sub,
        cart: None,
    }))
}
