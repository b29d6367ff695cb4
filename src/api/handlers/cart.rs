use crate::{
    api::extract::JsonBody,
    auth::middleware::AuthUser,
    types::{ApiResponse, CartItemRequest},
    AppState,
};
use axum::{extract::State, Json};
use tracing::error;

/// Get the caller's cart
#[utoipa::path(
    get,
    path = "/cart",
    responses(
        (status = 200, description = "Cart contents, or `success: false` if it could not be read", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    ),
    tag = "cart"
)]
pub async fn get_cart(State(state): State<AppState>, user: AuthUser) -> Json<ApiResponse> {
    match state.carts.get(user.username()).await {
        Ok(cart) => Json(ApiResponse::ok().with_cart(cart)),
        Err(e) => {
            error!(username = %user.username(), error = %e, "failed to read cart");
            Json(ApiResponse::failure("store_error", "failed to read cart"))
        }
    }
}

/// Append a product to the caller's cart
#[utoipa::path(
    post,
    path = "/cart/add",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Updated cart, or `success: false` if it could not be saved", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    ),
    tag = "cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CartItemRequest>,
) -> Json<ApiResponse> {
    match state.carts.add(user.username(), &payload.product).await {
        Ok(cart) => Json(
            ApiResponse::ok()
                .with_message("added to cart")
                .with_cart(cart),
        ),
        Err(e) => {
            error!(username = %user.username(), error = %e, "failed to add to cart");
            Json(ApiResponse::failure("store_error", "failed to add to cart"))
        }
    }
}

/// Remove every occurrence of a product from the caller's cart
#[utoipa::path(
    post,
    path = "/cart/remove",
    request_body = CartItemRequest,
    responses(
        (status = 200, description = "Updated cart, or `success: false` if it could not be saved", body = ApiResponse),
        (status = 401, description = "Not logged in", body = ApiResponse)
    ),
    tag = "cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CartItemRequest>,
) -> Json<ApiResponse> {
    match state.carts.remove(user.username(), &payload.product).await {
        Ok(cart) => Json(
            ApiResponse::ok()
                .with_message("removed from cart")
                .with_cart(cart),
        ),
        Err(e) => {
            error!(username = %user.username(), error = %e, "failed to remove from cart");
            Json(ApiResponse::failure("store_error", "failed to remove from cart"))
        }
    }
}
