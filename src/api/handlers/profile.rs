use crate::{
    auth::middleware::AuthUser,
    cart::parse_cart,
    types::{ApiResponse, UserView},
    AppState,
};
use axum::{extract::State, Json};
use tracing::{error, warn};

/// Get the caller's profile: username and cart
#[utoipa::path(
    get,
    path = "/profile",
    responses(
        (status = 200, description = "Profile, or `success: false` if the account is gone", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    ),
    tag = "account"
)]
pub async fn profile(State(state): State<AppState>, user: AuthUser) -> Json<ApiResponse> {
    match state.store.get_user_by_username(user.username()).await {
        Ok(Some(account)) => Json(ApiResponse::ok().with_user(UserView {
            cart: Some(parse_cart(account.cart.as_deref())),
            username: account.username,
        })),
        Ok(None) => {
            warn!(username = %user.username(), "valid session for missing account");
            Json(ApiResponse::failure("not_found", "user not found"))
        }
        Err(e) => {
            error!(username = %user.username(), error = %e, "failed to load profile");
            Json(ApiResponse::failure("store_error", "user not found"))
        }
    }
}
