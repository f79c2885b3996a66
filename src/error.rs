// SPDX-License-Identifier: Apache-2.0
//! Error types for the contact intake pipeline

use crate::delivery::DeliveryErrorKind;
use crate::validator::ValidationError;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Terminal failure of a submission. The display text is what the submitter
/// sees and never carries provider details.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("{0}")]
    InvalidInput(#[from] ValidationError),

    #[error("Too many requests. Please try again later.")]
    RateLimited { retry_after: Duration },

    #[error("Email service is currently unavailable. Please try again later.")]
    ServiceUnavailable,

    #[error("An error occurred while sending your message. Please try again later.")]
    DeliveryFailed(DeliveryErrorKind),

    #[error("Request body is too large.")]
    PayloadTooLarge,
}

impl SubmissionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::ServiceUnavailable | Self::DeliveryFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl IntoResponse for SubmissionError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            success: false,
            error: self.to_string(),
        });

        match self {
            Self::RateLimited { retry_after } => {
                // Round up so clients never retry inside the window
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                (status, [(header::RETRY_AFTER, secs.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, SubmissionError>;
