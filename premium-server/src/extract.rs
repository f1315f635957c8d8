//! Request extractors

use axum::extract::FromRequest;

use crate::AppError;

/// `Json` whose rejections go through `AppError`, so a malformed body is a
/// 400 with the usual `{error, status}` payload
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
