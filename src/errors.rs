use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("Failed to connect to the server. Please check your connection.")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Server { status: u16, message: String },

    #[error("Server error ({status}): {reason}")]
    ServerStatus { status: u16, reason: String },

    #[error("invalid response from server: {0}")]
    Decode(String),

    #[error("{0}")]
    PaymentValidation(String),

    #[error("{0}")]
    PaymentConfirmation(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("cannot {action} while the wizard is at step {step}")]
    InvalidTransition {
        step: &'static str,
        action: &'static str,
    },

    #[error("a submission is already in progress")]
    Busy,

    #[error("not found: {0}")]
    NotFound(String),
}

impl BookingError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        BookingError::Validation {
            field,
            reason: reason.into(),
        }
    }
}

impl IntoResponse for BookingError {
    fn into_response(self) -> Response {
        let status = match &self {
            BookingError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::PaymentValidation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BookingError::Network(_) => StatusCode::BAD_GATEWAY,
            BookingError::Server { .. } => StatusCode::BAD_GATEWAY,
            BookingError::ServerStatus { .. } => StatusCode::BAD_GATEWAY,
            BookingError::Decode(_) => StatusCode::BAD_GATEWAY,
            BookingError::PaymentConfirmation(_) => StatusCode::PAYMENT_REQUIRED,
            BookingError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            BookingError::InvalidTransition { .. } => StatusCode::CONFLICT,
            BookingError::Busy => StatusCode::CONFLICT,
            BookingError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
