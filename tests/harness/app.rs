// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Router construction and request helpers.

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use contact_intake::{
    config::{Config, RateLimitConfig},
    delivery::{Dispatcher, MailTransport, MemoryMailer},
    handlers::{router, AppState},
    limiter::RateLimiter,
    submission::SubmissionHandler,
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

pub const SENDER: &str = "site@gmail.com";
pub const ADMIN: &str = "admin@test.com";

/// Build the router around `mailer`; `None` runs without a provider.
pub fn build_app(mailer: Option<Arc<MemoryMailer>>, rate_limit: RateLimitConfig) -> Router {
    let config = Config {
        rate_limit: rate_limit.clone(),
        ..Default::default()
    };
    let transport = mailer.map(|m| m as Arc<dyn MailTransport>);
    let submissions = SubmissionHandler::new(
        Arc::new(RateLimiter::new(rate_limit)),
        Dispatcher::new(transport, Duration::from_millis(200)),
        Some(ADMIN.to_string()),
    );
    router(Arc::new(AppState { submissions, config }))
}

pub fn working_mailer() -> Arc<MemoryMailer> {
    Arc::new(MemoryMailer::new(SENDER))
}

pub fn contact_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/contact")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

/// Send a request and decode the JSON body (`Value::Null` when empty).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, headers, body)
}
