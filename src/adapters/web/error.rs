//! HTTP error responses for web adapter.

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::MomentumError;

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &MomentumError) -> StatusCode {
    match err {
        MomentumError::Universe(_) | MomentumError::Allocation(_) => StatusCode::BAD_REQUEST,
        MomentumError::NoData { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        MomentumError::DataSource { .. } | MomentumError::Fetch { .. } => StatusCode::BAD_GATEWAY,
        MomentumError::ConfigParse { .. }
        | MomentumError::ConfigMissing { .. }
        | MomentumError::ConfigInvalid { .. }
        | MomentumError::Report { .. }
        | MomentumError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<MomentumError> for WebError {
    fn from(err: MomentumError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::warn!(status = self.status.as_u16(), message = %self.message, "request failed");
        let template = super::templates::ErrorTemplate {
            title: "Error",
            interactive: true,
            message: &self.message,
            status: self.status.as_u16(),
        };
        match template.render() {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
