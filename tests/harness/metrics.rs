// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Outcome tally for abuse simulations.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// How the pipeline answered one simulated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Delivered,
    RateLimited,
    InvalidInput,
    Unavailable,
    DeliveryFailed,
}

/// Every answer seen during a run, in arrival order.
#[derive(Debug, Default)]
pub struct AttackMetrics {
    events: Vec<(String, Outcome, Duration)>,
}

impl AttackMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: Outcome, client: &str, latency: Duration) {
        self.events.push((client.to_string(), outcome, latency));
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.events.iter().filter(|(_, o, _)| *o == outcome).count()
    }

    /// Highest number of deliveries any single client achieved.
    pub fn max_delivered_per_client(&self) -> usize {
        let mut per_client: HashMap<&str, usize> = HashMap::new();
        for (client, outcome, _) in &self.events {
            if *outcome == Outcome::Delivered {
                *per_client.entry(client.as_str()).or_default() += 1;
            }
        }
        per_client.into_values().max().unwrap_or(0)
    }

    /// Share of requests that did not end in a delivery.
    pub fn block_rate(&self) -> f64 {
        if self.events.is_empty() {
            return 0.0;
        }
        let blocked = self.events.len() - self.count(Outcome::Delivered);
        blocked as f64 / self.events.len() as f64
    }

    pub fn median_latency(&self) -> Duration {
        let mut samples: Vec<Duration> = self.events.iter().map(|(_, _, l)| *l).collect();
        samples.sort_unstable();
        samples.get(samples.len() / 2).copied().unwrap_or_default()
    }

    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            total_requests: self.events.len(),
            delivered: self.count(Outcome::Delivered),
            rate_limited: self.count(Outcome::RateLimited),
            invalid_input: self.count(Outcome::InvalidInput),
            failed: self.count(Outcome::Unavailable) + self.count(Outcome::DeliveryFailed),
            block_rate: self.block_rate(),
            median_latency: self.median_latency(),
            max_delivered_per_client: self.max_delivered_per_client(),
        }
    }
}

/// Summary of one simulation run.
#[derive(Debug, Clone)]
pub struct MetricsReport {
    pub total_requests: usize,
    pub delivered: usize,
    pub rate_limited: usize,
    pub invalid_input: usize,
    pub failed: usize,
    pub block_rate: f64,
    pub median_latency: Duration,
    pub max_delivered_per_client: usize,
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- simulation ---")?;
        writeln!(
            f,
            "requests={} delivered={} limited={} invalid={} failed={}",
            self.total_requests, self.delivered, self.rate_limited, self.invalid_input, self.failed
        )?;
        writeln!(
            f,
            "blocked={:.1}% median={:?} max/client={}",
            self.block_rate * 100.0,
            self.median_latency,
            self.max_delivered_per_client
        )
    }
}
