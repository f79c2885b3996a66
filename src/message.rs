// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outbound notification composed from a validated submission.

use crate::validator::NormalizedSubmission;
use chrono::{DateTime, SecondsFormat, Utc};

/// Subject line of every notification.
pub const SUBJECT: &str = "New Contact Form Message";

/// A composed notification ready for a delivery provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text_body: String,
}

impl OutboundMessage {
    /// Build the notification for `submission`.
    ///
    /// Output depends only on the arguments: the timestamp is rendered as
    /// RFC 3339 UTC with millisecond precision.
    pub fn compose(
        submission: &NormalizedSubmission,
        from: &str,
        to: &str,
        submitted_at: DateTime<Utc>,
        client: &str,
    ) -> Self {
        let text_body = format!(
            "New contact form submission:\n\
             \n\
             Name: {name}\n\
             Email: {email}\n\
             Message: {message}\n\
             \n\
             Submitted at: {timestamp}\n\
             IP Address: {client}",
            name = submission.name(),
            email = submission.email(),
            message = submission.message(),
            timestamp = submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: SUBJECT.to_string(),
            text_body,
        }
    }
}
