use crate::types::AppError;
use axum::extract::FromRequest;

/// `axum::Json` whose rejections are reported as `AppError::InvalidInput`,
/// so a missing field or a wrong content type still gets the JSON envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
