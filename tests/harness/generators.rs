// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for abuse simulation.

use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};

/// Generate a pool of client addresses for testing.
pub fn generate_clients(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c)).to_string()
        })
        .collect()
}

/// A valid submission body, varied by index.
pub fn valid_submission(i: usize) -> Vec<u8> {
    json!({
        "name": format!("Visitor {i}"),
        "email": format!("visitor{i}@example.com"),
        "message": format!("Message number {i}"),
    })
    .to_string()
    .into_bytes()
}

/// Bodies that must be rejected by validation, paired with the expected
/// error text.
pub fn generate_invalid_bodies() -> Vec<(&'static str, &'static str)> {
    vec![
        ("not json at all", "Invalid request body. Please provide valid JSON data."),
        ("[]", "All fields are required."),
        ("\"string\"", "Invalid request body. Please provide valid JSON data."),
        ("{}", "All fields are required."),
        (r#"{"name":"A","email":"a@b.co"}"#, "All fields are required."),
        (r#"{"name":"","email":"bad","message":""}"#, "All fields are required."),
        (r#"{"name":1,"email":"a@b.co","message":"m"}"#, "All fields must be strings."),
        (r#"{"name":"A","email":["a@b.co"],"message":"m"}"#, "All fields must be strings."),
        (r#"{"name":"  ","email":"a@b.co","message":"m"}"#, "Name cannot be empty or contain only whitespace."),
        (r#"{"name":"A","email":"   ","message":"m"}"#, "Email cannot be empty or contain only whitespace."),
        (r#"{"name":"A","email":"a@b.co","message":"\n\t"}"#, "Message cannot be empty or contain only whitespace."),
        (r#"{"name":"A","email":"bad","message":"m"}"#, "Please provide a valid email address."),
        (r#"{"name":"A","email":"a@b","message":"m"}"#, "Please provide a valid email address."),
        (r#"{"name":"A","email":"a b@c.de","message":"m"}"#, "Please provide a valid email address."),
    ]
}

/// Over-long fields.
pub fn generate_oversized_bodies() -> Vec<(Vec<u8>, &'static str)> {
    vec![
        (
            json!({ "name": "n".repeat(101), "email": "a@b.co", "message": "m" })
                .to_string()
                .into_bytes(),
            "Name must be 100 characters or less.",
        ),
        (
            json!({ "name": "A", "email": "a@b.co", "message": "m".repeat(2001) })
                .to_string()
                .into_bytes(),
            "Message must be 2000 characters or less.",
        ),
    ]
}
