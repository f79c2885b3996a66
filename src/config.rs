// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the contact intake service.
//!
//! Everything is read once at startup; request handling never looks at the
//! environment again. Defaults mirror the behaviour of the contact form
//! backend this service replaces.

use axum::http::HeaderValue;
use lettre::message::Mailbox;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

/// Configuration for the contact intake service.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:3001)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum accepted request body in bytes (default: 10 MiB)
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Outbound mail configuration
    #[serde(default)]
    pub mail: MailConfig,

    /// Cross-origin configuration
    #[serde(default)]
    pub cors: CorsConfig,
}

/// Fixed-window rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Window length in milliseconds (default: 900000, 15 minutes)
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Requests admitted per client per window (default: 5)
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    /// Upper bound on tracked clients (default: 10000)
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Period of the expired-entry sweep in seconds (default: 60)
    #[serde(default = "default_sweep_secs")]
    pub sweep_interval_secs: u64,
}

/// A credential value that never shows up in logs or debug output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret. Only the transport layer should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// User and secret pair for the mailbox-style providers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MailboxCredentials {
    pub user: String,
    pub secret: Secret,
}

/// Settings for an arbitrary SMTP relay.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenericSmtpSettings {
    pub host: String,
    #[serde(default = "default_smtp_port")]
    pub port: u16,
    /// Implicit TLS when true, STARTTLS otherwise
    #[serde(default)]
    pub secure: bool,
    pub user: String,
    pub secret: Secret,
}

/// Outbound mail configuration.
///
/// Each provider block is either fully present or absent; a block missing
/// any required field is never constructed.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Consumer mail account (Gmail app password)
    #[serde(default)]
    pub consumer: Option<MailboxCredentials>,

    /// Generic SMTP relay
    #[serde(default)]
    pub generic_smtp: Option<GenericSmtpSettings>,

    /// Alternate mail account (Outlook)
    #[serde(default)]
    pub alternate: Option<MailboxCredentials>,

    /// Operator address receiving submissions
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Dispatch timeout in seconds (default: 10)
    #[serde(default = "default_mail_timeout_secs")]
    pub timeout_secs: u64,
}

/// Cross-origin configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_window_ms() -> u64 {
    900_000
}

fn default_max_requests() -> u32 {
    5
}

fn default_max_entries() -> usize {
    10_000
}

fn default_sweep_secs() -> u64 {
    60
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_timeout_secs() -> u64 {
    10
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            max_body_bytes: default_max_body_bytes(),
            rate_limit: RateLimitConfig::default(),
            mail: MailConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: default_window_ms(),
            max_requests: default_max_requests(),
            max_entries: default_max_entries(),
            sweep_interval_secs: default_sweep_secs(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            consumer: None,
            generic_smtp: None,
            alternate: None,
            admin_email: None,
            timeout_secs: default_mail_timeout_secs(),
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl RateLimitConfig {
    /// Get the rate window duration
    pub fn window_duration(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Get the sweep period
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl MailConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let production = var("APP_ENV").is_some_and(|env| env.eq_ignore_ascii_case("production"));
        let allowed_origins = match var("CORS_ALLOWED_ORIGINS") {
            Some(list) => list
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .map(origin)
                .collect::<Result<_, _>>()?,
            None if production => Vec::new(),
            None => default_allowed_origins(),
        };

        let consumer = match (var("GMAIL_USER"), var("GMAIL_APP_PASSWORD")) {
            (Some(user), Some(secret)) => Some(MailboxCredentials {
                user: mailbox("GMAIL_USER", user)?,
                secret: Secret::new(secret),
            }),
            _ => None,
        };

        let generic_smtp = match (var("SMTP_HOST"), var("SMTP_USER"), var("SMTP_PASS")) {
            (Some(host), Some(user), Some(secret)) => Some(GenericSmtpSettings {
                host,
                // Unparseable ports fall back to 587
                port: var("SMTP_PORT")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or_else(default_smtp_port),
                secure: var("SMTP_SECURE").as_deref() == Some("true"),
                user: mailbox("SMTP_USER", user)?,
                secret: Secret::new(secret),
            }),
            _ => None,
        };

        let alternate = match (var("OUTLOOK_USER"), var("OUTLOOK_PASS")) {
            (Some(user), Some(secret)) => Some(MailboxCredentials {
                user: mailbox("OUTLOOK_USER", user)?,
                secret: Secret::new(secret),
            }),
            _ => None,
        };

        let max_requests: u32 = parse_or(
            var("RATE_LIMIT_MAX_REQUESTS"),
            "RATE_LIMIT_MAX_REQUESTS",
            default_max_requests,
        )?;
        if max_requests == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RATE_LIMIT_MAX_REQUESTS",
                value: "0".to_string(),
            });
        }

        let timeout_secs: u64 = parse_or(
            var("MAIL_TIMEOUT_SECS"),
            "MAIL_TIMEOUT_SECS",
            default_mail_timeout_secs,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAIL_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }

        let admin_email = var("ADMIN_EMAIL")
            .map(|address| mailbox("ADMIN_EMAIL", address))
            .transpose()?;

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(default_bind_addr),
            max_body_bytes: parse_or(var("MAX_BODY_BYTES"), "MAX_BODY_BYTES", default_max_body_bytes)?,
            rate_limit: RateLimitConfig {
                window_ms: parse_or(var("RATE_LIMIT_WINDOW_MS"), "RATE_LIMIT_WINDOW_MS", default_window_ms)?,
                max_requests,
                max_entries: parse_or(
                    var("RATE_LIMIT_MAX_ENTRIES"),
                    "RATE_LIMIT_MAX_ENTRIES",
                    default_max_entries,
                )?,
                sweep_interval_secs: parse_or(
                    var("RATE_LIMIT_SWEEP_SECS"),
                    "RATE_LIMIT_SWEEP_SECS",
                    default_sweep_secs,
                )?,
            },
            mail: MailConfig {
                consumer,
                generic_smtp,
                alternate,
                admin_email,
                timeout_secs,
            },
            cors: CorsConfig { allowed_origins },
        })
    }
}

/// Accept `value` only if it parses as a mail address.
fn mailbox(name: &'static str, value: String) -> Result<String, ConfigError> {
    match value.parse::<Mailbox>() {
        Ok(_) => Ok(value),
        Err(_) => Err(ConfigError::InvalidValue { name, value }),
    }
}

/// Origins must be concrete header values; a wildcard cannot carry
/// credentials.
fn origin(value: String) -> Result<String, ConfigError> {
    if value == "*" || HeaderValue::from_str(&value).is_err() {
        return Err(ConfigError::InvalidValue {
            name: "CORS_ALLOWED_ORIGINS",
            value,
        });
    }
    Ok(value)
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    name: &'static str,
    default: fn() -> T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default()),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
    }
}
