// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake
//!
//! Accepts contact form submissions and forwards them to an operator mailbox:
//!
//! - Per-client fixed-window rate limiting (5 per 15 minutes default)
//! - Ordered field validation with submitter-facing messages
//! - Mail provider selection by priority (Gmail, generic SMTP, Outlook)
//! - Bounded dispatch timeout, generic error text towards the client

pub mod config;
pub mod delivery;
pub mod error;
pub mod handlers;
pub mod limiter;
pub mod message;
pub mod submission;
pub mod validator;

pub use config::Config;
pub use delivery::{DeliveryError, DeliveryErrorKind, DeliveryReceipt, Dispatcher, MailTransport};
pub use error::SubmissionError;
pub use limiter::{RateLimitResult, RateLimiter};
pub use message::OutboundMessage;
pub use submission::SubmissionHandler;
pub use validator::{NormalizedSubmission, ValidationError};
