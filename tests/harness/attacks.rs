// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Abuse patterns for security testing.
//!
//! Time is simulated: request `i` arrives `i / requests_per_second` seconds
//! after the start of the attack.

use std::time::Duration;

/// Attack pattern configuration.
#[derive(Debug, Clone)]
pub struct AttackConfig {
    /// Total number of requests to send
    pub total_requests: usize,
    /// Simulated arrival rate
    pub requests_per_second: f64,
    /// Number of unique clients to simulate
    pub unique_clients: usize,
    /// Whether bodies pass validation
    pub valid_bodies: bool,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            total_requests: 100,
            requests_per_second: 10.0,
            unique_clients: 1,
            valid_bodies: true,
        }
    }
}

/// Predefined attack patterns.
impl AttackConfig {
    /// Single client flood - one address hammering the form.
    pub fn single_client_flood() -> Self {
        Self {
            total_requests: 200,
            requests_per_second: 100.0,
            unique_clients: 1,
            ..Default::default()
        }
    }

    /// Distributed flood - many clients, each over its allowance.
    pub fn distributed_flood() -> Self {
        Self {
            total_requests: 1_000,
            requests_per_second: 200.0,
            unique_clients: 100,
            ..Default::default()
        }
    }

    /// Junk flood - invalid bodies from one client.
    pub fn junk_flood() -> Self {
        Self {
            total_requests: 50,
            requests_per_second: 50.0,
            unique_clients: 1,
            valid_bodies: false,
        }
    }

    /// Slow drip - one client pacing itself under the limit.
    pub fn slow_drip() -> Self {
        Self {
            total_requests: 40,
            requests_per_second: 4.0,
            unique_clients: 1,
            ..Default::default()
        }
    }

    /// Simulated arrival offset of request `index`.
    pub fn arrival(&self, index: usize) -> Duration {
        Duration::from_secs_f64(index as f64 / self.requests_per_second)
    }

    /// Calculate simulated duration for the attack.
    pub fn expected_duration(&self) -> Duration {
        Duration::from_secs_f64(self.total_requests as f64 / self.requests_per_second)
    }
}
