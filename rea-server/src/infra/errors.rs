use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use std::fmt;

use rea_core::{ServiceError, routes};

pub type AppResult<T> = Result<T, AppError>;

/// A failure the user cannot fix by changing their input. Responds by sending
/// the browser to the "there is a problem" page.
#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(
            status = self.status.as_u16(),
            message = %self.message,
            "request failed, redirecting to the service problem page"
        );
        Redirect::to(routes::THERE_IS_A_PROBLEM).into_response()
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Http(_) | ServiceError::UnexpectedStatus { .. } => {
                Self::bad_gateway(err.to_string())
            }
            _ => Self::internal(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
