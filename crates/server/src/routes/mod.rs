mod home;

pub use home::{index_handler, lookup_handler, LookupForm, PRESET_LOCATIONS};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;

/// Catch-all for failures that reach the web boundary: the chain is logged
/// and the client gets a generic 500.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("request failed: {:#}", self.0);
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
