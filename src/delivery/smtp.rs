// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! SMTP delivery over lettre.

use super::{DeliveryError, DeliveryErrorKind, DeliveryReceipt, MailTransport, ProviderConfig, TlsMode};
use crate::message::OutboundMessage;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Reply codes meaning the server refused our credentials.
const AUTH_REJECTED_CODES: &[&str] = &["530", "534", "535"];

/// Delivers through an authenticated SMTP relay.
pub struct SmtpMailer {
    name: &'static str,
    sender: String,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build the transport for `provider`. No connection is opened until the
    /// first send.
    pub fn connect(provider: &ProviderConfig, timeout: Duration) -> Result<Self, DeliveryError> {
        let (host, port, tls) = provider.endpoint();

        let builder = match tls {
            TlsMode::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
        }
        .map_err(|e| {
            DeliveryError::new(
                DeliveryErrorKind::TransportFailure,
                format!("cannot set up TLS for {host}: {e}"),
            )
        })?;

        let transport = builder
            .port(port)
            .credentials(Credentials::new(
                provider.sender().to_string(),
                provider.secret().expose().to_string(),
            ))
            .timeout(Some(timeout))
            .build();

        debug!(provider = provider.name(), host, port, ?tls, "SMTP transport ready");

        Ok(Self {
            name: provider.name(),
            sender: provider.sender().to_string(),
            transport,
        })
    }

    fn build(&self, message: &OutboundMessage, id: &Uuid) -> Result<Message, DeliveryError> {
        let from: Mailbox = parse_mailbox(&message.from, "from")?;
        let to: Mailbox = parse_mailbox(&message.to, "to")?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .message_id(Some(format!("<{id}@contact-intake>")))
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body.clone())
            .map_err(|e| {
                DeliveryError::new(
                    DeliveryErrorKind::TransportFailure,
                    format!("cannot build message: {e}"),
                )
            })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn sender(&self) -> &str {
        &self.sender
    }

    async fn send(&self, message: &OutboundMessage) -> Result<DeliveryReceipt, DeliveryError> {
        let id = Uuid::new_v4();
        let email = self.build(message, &id)?;

        let response = self.transport.send(email).await.map_err(classify)?;
        debug!(
            provider = self.name,
            code = %response.code(),
            %id,
            "SMTP server accepted message"
        );

        Ok(DeliveryReceipt { id: id.to_string() })
    }
}

fn parse_mailbox(address: &str, field: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|e| {
        DeliveryError::new(
            DeliveryErrorKind::TransportFailure,
            format!("invalid {field} address {address:?}: {e}"),
        )
    })
}

fn classify(err: lettre::transport::smtp::Error) -> DeliveryError {
    let code = err.status().map(|code| code.to_string());
    let kind = match code.as_deref() {
        Some(code) if AUTH_REJECTED_CODES.contains(&code) => DeliveryErrorKind::AuthFailure,
        _ => DeliveryErrorKind::TransportFailure,
    };
    DeliveryError::new(kind, err.to_string())
}
