// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Provider variants and their priority order.

use crate::config::{MailConfig, Secret};

const GMAIL_HOST: &str = "smtp.gmail.com";
const GMAIL_PORT: u16 = 465;
const OUTLOOK_HOST: &str = "smtp-mail.outlook.com";
const OUTLOOK_PORT: u16 = 587;

/// How the SMTP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsMode {
    /// TLS from the first byte (usually port 465)
    Implicit,
    /// Plain connection upgraded with STARTTLS
    StartTls,
}

/// One fully configured delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    ConsumerMail {
        user: String,
        secret: Secret,
    },
    GenericSmtp {
        host: String,
        port: u16,
        secure: bool,
        user: String,
        secret: Secret,
    },
    AlternateMail {
        user: String,
        secret: Secret,
    },
}

impl ProviderConfig {
    /// Pick the first configured provider in priority order.
    pub fn select(config: &MailConfig) -> Option<Self> {
        if let Some(creds) = &config.consumer {
            return Some(Self::ConsumerMail {
                user: creds.user.clone(),
                secret: creds.secret.clone(),
            });
        }

        if let Some(smtp) = &config.generic_smtp {
            return Some(Self::GenericSmtp {
                host: smtp.host.clone(),
                port: smtp.port,
                secure: smtp.secure,
                user: smtp.user.clone(),
                secret: smtp.secret.clone(),
            });
        }

        config.alternate.as_ref().map(|creds| Self::AlternateMail {
            user: creds.user.clone(),
            secret: creds.secret.clone(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::ConsumerMail { .. } => "gmail",
            Self::GenericSmtp { .. } => "smtp",
            Self::AlternateMail { .. } => "outlook",
        }
    }

    /// Authenticated identity; also the sender address.
    pub fn sender(&self) -> &str {
        match self {
            Self::ConsumerMail { user, .. }
            | Self::GenericSmtp { user, .. }
            | Self::AlternateMail { user, .. } => user,
        }
    }

    pub(crate) fn secret(&self) -> &Secret {
        match self {
            Self::ConsumerMail { secret, .. }
            | Self::GenericSmtp { secret, .. }
            | Self::AlternateMail { secret, .. } => secret,
        }
    }

    /// Host, port and TLS mode to connect to.
    pub fn endpoint(&self) -> (&str, u16, TlsMode) {
        match self {
            Self::ConsumerMail { .. } => (GMAIL_HOST, GMAIL_PORT, TlsMode::Implicit),
            Self::GenericSmtp {
                host, port, secure, ..
            } => {
                let tls = if *secure {
                    TlsMode::Implicit
                } else {
                    TlsMode::StartTls
                };
                (host.as_str(), *port, tls)
            }
            Self::AlternateMail { .. } => (OUTLOOK_HOST, OUTLOOK_PORT, TlsMode::StartTls),
        }
    }
}
