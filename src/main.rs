// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Contact Intake Service
//!
//! Serves `POST /api/contact` for a static site's contact form, plus CORS
//! preflight and health endpoints.
//!
//! ## Configuration
//!
//! Configuration is loaded once from environment variables (a `.env` file is
//! honoured):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:3001)
//! - `GMAIL_USER` / `GMAIL_APP_PASSWORD`: Gmail provider
//! - `SMTP_HOST` / `SMTP_PORT` / `SMTP_SECURE` / `SMTP_USER` / `SMTP_PASS`: generic SMTP
//! - `OUTLOOK_USER` / `OUTLOOK_PASS`: Outlook provider
//! - `ADMIN_EMAIL`: Recipient (default: the provider's sender)
//! - `RATE_LIMIT_WINDOW_MS`: Window length (default: 900000)
//! - `RATE_LIMIT_MAX_REQUESTS`: Requests per window (default: 5)
//! - `CORS_ALLOWED_ORIGINS`: Comma separated origins

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use contact_intake::{
    config::Config,
    delivery::Dispatcher,
    handlers::{router, AppState},
    limiter::RateLimiter,
    submission::SubmissionHandler,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!(
        bind_addr = %config.bind_addr,
        window_ms = config.rate_limit.window_ms,
        max_requests = config.rate_limit.max_requests,
        max_entries = config.rate_limit.max_entries,
        origins = ?config.cors.allowed_origins,
        "Starting contact intake service"
    );

    // Create application state
    let limiter = Arc::new(RateLimiter::new(config.rate_limit.clone()));
    let dispatcher = Dispatcher::from_config(&config.mail)?;
    let submissions =
        SubmissionHandler::new(limiter.clone(), dispatcher, config.mail.admin_email.clone());

    let state = Arc::new(AppState {
        submissions,
        config: config.clone(),
    });

    // Spawn sweep task
    let sweep_every = config.rate_limit.sweep_interval();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_every);
        loop {
            interval.tick().await;
            limiter.sweep(Instant::now()).await;
        }
    });

    // Build router
    let app = router(state).layer(TraceLayer::new_for_http());

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
