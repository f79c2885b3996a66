// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Fixed-window rate limiter keyed by client identifier.
//!
//! Each client gets `max_requests` admissions per window. The first request
//! after a window has passed opens a fresh one. The table is bounded by
//! `max_entries`: inserting a new client into a full table first drops
//! expired windows, then the window closest to expiry.

use crate::config::RateLimitConfig;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is allowed
    Allowed {
        /// Remaining requests in current window
        remaining: u32,
        /// Time until window resets
        reset_in: Duration,
    },
    /// Request is rate limited
    Limited {
        /// Time until the current window ends
        retry_after: Duration,
    },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }
}

/// Per-client window state.
#[derive(Debug, Clone, Copy)]
struct RateLimitEntry {
    count: u32,
    window_reset_at: Instant,
}

impl RateLimitEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.window_reset_at
    }
}

/// Thread-safe rate limiter.
pub struct RateLimiter {
    /// Configuration
    config: RateLimitConfig,
    /// Per-client windows
    entries: Mutex<HashMap<String, RateLimitEntry>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Check and record a request from `client` at the current instant.
    pub async fn check(&self, client: &str) -> RateLimitResult {
        self.admit(client, Instant::now()).await
    }

    /// Check and record a request from `client` at `now`.
    ///
    /// A rejected request leaves the client's window untouched.
    pub async fn admit(&self, client: &str, now: Instant) -> RateLimitResult {
        let window = self.config.window_duration();
        let max = self.config.max_requests;

        let mut entries = self.entries.lock().await;

        if let Some(entry) = entries.get_mut(client) {
            if entry.is_expired(now) {
                *entry = RateLimitEntry {
                    count: 1,
                    window_reset_at: now + window,
                };
            } else if entry.count < max {
                entry.count += 1;
            } else {
                let retry_after = entry.window_reset_at.saturating_duration_since(now);
                debug!(client, ?retry_after, "Client rate limit exceeded");
                return RateLimitResult::Limited { retry_after };
            }

            return RateLimitResult::Allowed {
                remaining: max.saturating_sub(entry.count),
                reset_in: entry.window_reset_at.saturating_duration_since(now),
            };
        }

        self.make_room(&mut entries, now);
        entries.insert(
            client.to_string(),
            RateLimitEntry {
                count: 1,
                window_reset_at: now + window,
            },
        );

        RateLimitResult::Allowed {
            remaining: max.saturating_sub(1),
            reset_in: window,
        }
    }

    /// Drop every entry whose window has ended. Returns how many were removed.
    pub async fn sweep(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let removed = before - entries.len();
        if removed > 0 {
            debug!(removed, remaining = entries.len(), "Swept expired rate limit entries");
        }
        removed
    }

    /// Number of clients currently tracked.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }

    /// Ensure there is space for one more client.
    fn make_room(&self, entries: &mut HashMap<String, RateLimitEntry>, now: Instant) {
        let capacity = self.config.max_entries.max(1);
        if entries.len() < capacity {
            return;
        }

        entries.retain(|_, entry| !entry.is_expired(now));

        while entries.len() >= capacity {
            let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, entry)| entry.window_reset_at)
                .map(|(key, _)| key.clone())
            else {
                break;
            };
            warn!(client = %oldest, "Rate limit table full, evicting live entry");
            entries.remove(&oldest);
        }
    }

    #[cfg(test)]
    async fn count_for(&self, client: &str) -> Option<u32> {
        self.entries.lock().await.get(client).map(|e| e.count)
    }
}
