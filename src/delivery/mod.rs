// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound delivery of composed notifications.
//!
//! At startup the first fully configured provider (consumer mail, then
//! generic SMTP, then alternate mail) is selected and wrapped in a
//! [`Dispatcher`]. Without any provider the dispatcher runs degraded and
//! refuses every message without touching the network.

mod memory;
mod provider;
mod smtp;

pub use memory::MemoryMailer;
pub use provider::{ProviderConfig, TlsMode};
pub use smtp::SmtpMailer;

use crate::config::MailConfig;
use crate::message::OutboundMessage;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Receipt for an accepted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// Opaque delivery identifier
    pub id: String,
}

/// Category of a delivery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// Provider rejected the credentials
    AuthFailure,
    /// Network error, protocol error or timeout
    TransportFailure,
    /// No provider is configured
    Unavailable,
}

impl fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthFailure => write!(f, "authentication rejected"),
            Self::TransportFailure => write!(f, "transport failure"),
            Self::Unavailable => write!(f, "no provider configured"),
        }
    }
}

/// A failed delivery.
///
/// `Display` shows only the kind. The provider's own error text is kept in
/// `detail` for server-side logs.
#[derive(Debug, Clone, Error)]
#[error("delivery failed: {kind}")]
pub struct DeliveryError {
    pub kind: DeliveryErrorKind,
    detail: String,
}

impl DeliveryError {
    pub fn new(kind: DeliveryErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn unavailable() -> Self {
        Self::new(DeliveryErrorKind::Unavailable, "no mail provider configured")
    }

    /// Internal cause, for logging only.
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

/// A backend able to deliver one message.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Short provider name for logs and health output.
    fn name(&self) -> &'static str;

    /// Authenticated sender identity of this backend.
    fn sender(&self) -> &str;

    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError>;
}

/// Sends messages through the active provider under a bounded timeout.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Option<Arc<dyn MailTransport>>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(transport: Option<Arc<dyn MailTransport>>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// A dispatcher with no provider.
    pub fn degraded() -> Self {
        Self::new(None, Duration::ZERO)
    }

    /// Select and connect the highest-priority configured provider.
    pub fn from_config(config: &MailConfig) -> Result<Self, DeliveryError> {
        let Some(provider) = ProviderConfig::select(config) else {
            warn!("No mail provider configured, submissions will be refused");
            warn!("Configure GMAIL_USER and GMAIL_APP_PASSWORD, SMTP_HOST, SMTP_USER and SMTP_PASS, or OUTLOOK_USER and OUTLOOK_PASS");
            return Ok(Self::degraded());
        };

        info!(
            provider = provider.name(),
            sender = provider.sender(),
            "Mail provider selected"
        );
        let mailer = SmtpMailer::connect(&provider, config.timeout())?;
        Ok(Self::new(Some(Arc::new(mailer)), config.timeout()))
    }

    pub fn is_available(&self) -> bool {
        self.transport.is_some()
    }

    pub fn provider_name(&self) -> Option<&'static str> {
        self.transport.as_ref().map(|t| t.name())
    }

    pub fn sender(&self) -> Option<&str> {
        self.transport.as_deref().map(|t| t.sender())
    }

    /// Make exactly one delivery attempt.
    pub async fn dispatch(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let Some(transport) = &self.transport else {
            return Err(DeliveryError::unavailable());
        };

        debug!(provider = transport.name(), to = %message.to, "Dispatching message");
        match tokio::time::timeout(self.timeout, transport.send(message)).await {
            Ok(result) => result,
            Err(_) => Err(DeliveryError::new(
                DeliveryErrorKind::TransportFailure,
                format!("{} did not answer within {:?}", transport.name(), self.timeout),
            )),
        }
    }
}
