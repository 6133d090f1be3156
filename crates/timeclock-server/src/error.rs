use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use timeclock_core::error::TimeclockError;

/// Private sentinel error type used to carry an explicit HTTP 400 through
/// the `anyhow::Error` chain without touching the `TimeclockError` enum.
#[derive(Debug)]
struct BadRequestError(String);

impl std::fmt::Display for BadRequestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for BadRequestError {}

/// Unified error type for HTTP responses.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(BadRequestError(msg.into()).into())
    }
}

pub fn status_for(err: &TimeclockError) -> StatusCode {
    match err {
        TimeclockError::InvalidMemberId { .. } => StatusCode::BAD_REQUEST,
        TimeclockError::EventNotFound(_) | TimeclockError::MemberNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        TimeclockError::NoOpenSignup(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TimeclockError::Remote { .. } | TimeclockError::Http(_) => StatusCode::BAD_GATEWAY,
        TimeclockError::InvalidTime { .. }
        | TimeclockError::InvalidFormat(_)
        | TimeclockError::InvalidTimezone(_)
        | TimeclockError::MissingApiKey
        | TimeclockError::ConfigNotFound(_)
        | TimeclockError::HomeNotFound
        | TimeclockError::Io(_)
        | TimeclockError::Yaml(_)
        | TimeclockError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(b) = self.0.downcast_ref::<BadRequestError>() {
            let body = serde_json::json!({ "error": b.0.clone() });
            return (StatusCode::BAD_REQUEST, axum::Json(body)).into_response();
        }

        let status = match self.0.downcast_ref::<TimeclockError>() {
            Some(e) => status_for(e),
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
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
