// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Contact submission validator.
//!
//! Rules run in a fixed order and the first failure wins:
//! - Body must be a JSON object or array
//! - `name`, `email` and `message` must be present
//! - All three must be strings
//! - None may be blank after trimming (name, then email, then message)
//! - Email must have the `local@domain.tld` shape
//! - Name at most 100 characters, message at most 2000 characters
//!
//! Lengths are counted in UTF-16 code units and whitespace is the
//! ECMAScript set, so browser-side form checks and this module agree.

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

/// Maximum trimmed name length in UTF-16 code units.
pub const MAX_NAME_CHARS: usize = 100;

/// Maximum trimmed message length in UTF-16 code units.
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// Validation error types. The display text is shown to the submitter.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid request body. Please provide valid JSON data.")]
    MalformedBody,

    #[error("All fields are required.")]
    MissingFields,

    #[error("All fields must be strings.")]
    WrongType,

    #[error("Name cannot be empty or contain only whitespace.")]
    EmptyName,

    #[error("Email cannot be empty or contain only whitespace.")]
    EmptyEmail,

    #[error("Message cannot be empty or contain only whitespace.")]
    EmptyMessage,

    #[error("Please provide a valid email address.")]
    InvalidEmailFormat,

    #[error("Name must be 100 characters or less.")]
    NameTooLong,

    #[error("Message must be 2000 characters or less.")]
    MessageTooLong,
}

/// A submission that passed every rule. Fields are trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSubmission {
    name: String,
    email: String,
    message: String,
}

impl NormalizedSubmission {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Validate a raw request body.
///
/// Bytes that are not JSON at all fail the first rule, same as a JSON value
/// that is not an object.
pub fn validate_body(body: &[u8]) -> Result<NormalizedSubmission, ValidationError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(raw) => validate(&raw),
        Err(err) => {
            debug!(error = %err, "Request body is not JSON");
            Err(ValidationError::MalformedBody)
        }
    }
}

/// Validate a parsed submission. Extra fields are ignored.
///
/// An array passes the body check and then has none of the fields.
pub fn validate(raw: &Value) -> Result<NormalizedSubmission, ValidationError> {
    let object = match raw {
        Value::Object(object) => Some(object),
        Value::Array(_) => None,
        _ => {
            debug!("Submission is not an object");
            return Err(ValidationError::MalformedBody);
        }
    };

    let fields = ["name", "email", "message"].map(|key| object.and_then(|o| o.get(key)));
    if fields.iter().any(|value| is_absent(*value)) {
        debug!("Submission is missing required fields");
        return Err(ValidationError::MissingFields);
    }

    let [Some(Value::String(name)), Some(Value::String(email)), Some(Value::String(message))] =
        fields
    else {
        debug!("Submission fields have the wrong type");
        return Err(ValidationError::WrongType);
    };

    let name = trim(name);
    let email = trim(email);
    let message = trim(message);

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    if !has_email_shape(email) {
        debug!("Email address has an invalid shape");
        return Err(ValidationError::InvalidEmailFormat);
    }

    if utf16_len(name) > MAX_NAME_CHARS {
        return Err(ValidationError::NameTooLong);
    }
    if utf16_len(message) > MAX_MESSAGE_CHARS {
        return Err(ValidationError::MessageTooLong);
    }

    Ok(NormalizedSubmission {
        name: name.to_string(),
        email: email.to_string(),
        message: message.to_string(),
    })
}

/// Absent, null, empty string, `false` and zero all count as "not provided".
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

/// ECMAScript `WhiteSpace` and `LineTerminator`: Unicode `White_Space`
/// without NEL (U+0085), plus the byte order mark (U+FEFF).
fn is_js_whitespace(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{FEFF}' => true,
        c => c.is_whitespace(),
    }
}

fn trim(value: &str) -> &str {
    value.trim_matches(is_js_whitespace)
}

fn utf16_len(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Loose `local@domain.tld` check.
///
/// Equivalent to `^[^\s@]+@[^\s@]+\.[^\s@]+$`: exactly one `@`, no
/// whitespace, a non-empty local part, and a dot in the domain with at least
/// one character on each side. Plenty of invalid addresses pass; submitters
/// see exactly this behaviour, so it stays loose.
fn has_email_shape(email: &str) -> bool {
    if email.chars().any(is_js_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
