// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Submission pipeline: rate limit, validate, compose, dispatch.
//!
//! Each stage either stops the pipeline with a [`SubmissionError`] or hands a
//! refined value to the next one. A request makes at most one delivery
//! attempt and an admitted request is never credited back to the limiter.

use crate::delivery::{DeliveryErrorKind, DeliveryReceipt, Dispatcher};
use crate::error::{Result, SubmissionError};
use crate::limiter::{RateLimitResult, RateLimiter};
use crate::message::OutboundMessage;
use crate::validator;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Confirmation shown after a successful delivery.
pub const SUCCESS_MESSAGE: &str =
    "Your message has been sent successfully. We will get back to you soon!";

/// Runs submissions through the pipeline.
pub struct SubmissionHandler {
    limiter: Arc<RateLimiter>,
    dispatcher: Dispatcher,
    /// Operator address; falls back to the provider's sender
    recipient: Option<String>,
}

impl SubmissionHandler {
    pub fn new(limiter: Arc<RateLimiter>, dispatcher: Dispatcher, recipient: Option<String>) -> Self {
        Self {
            limiter,
            dispatcher,
            recipient,
        }
    }

    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Process a raw request body from `client`.
    pub async fn handle(&self, body: &[u8], client: &str) -> Result<DeliveryReceipt> {
        self.handle_at(body, client, Instant::now(), Utc::now()).await
    }

    /// Process a raw request body with explicit clock readings.
    pub async fn handle_at(
        &self,
        body: &[u8],
        client: &str,
        now: Instant,
        submitted_at: DateTime<Utc>,
    ) -> Result<DeliveryReceipt> {
        if let RateLimitResult::Limited { retry_after } = self.limiter.admit(client, now).await {
            info!(client, retry_after_secs = retry_after.as_secs(), "Submission rate limited");
            return Err(SubmissionError::RateLimited { retry_after });
        }

        let submission = validator::validate_body(body).map_err(|err| {
            info!(client, error = ?err, "Submission failed validation");
            SubmissionError::InvalidInput(err)
        })?;

        let Some(sender) = self.dispatcher.sender() else {
            error!(client, "Mail service not configured, submission refused");
            return Err(SubmissionError::ServiceUnavailable);
        };
        let recipient = self.recipient.as_deref().unwrap_or(sender);

        let message = OutboundMessage::compose(&submission, sender, recipient, submitted_at, client);
        debug!(client, to = %message.to, "Submission composed");

        match self.dispatcher.dispatch(&message).await {
            Ok(receipt) => {
                info!(client, delivery_id = %receipt.id, "Submission delivered");
                Ok(receipt)
            }
            Err(err) if err.kind == DeliveryErrorKind::Unavailable => {
                error!(client, "Mail service not configured, submission refused");
                Err(SubmissionError::ServiceUnavailable)
            }
            Err(err) => {
                error!(
                    client,
                    kind = ?err.kind,
                    detail = err.detail(),
                    "Submission delivery failed"
                );
                Err(SubmissionError::DeliveryFailed(err.kind))
            }
        }
    }
}
