// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for contact intake abuse simulation.
//!
//! This module provides utilities for driving the submission pipeline and
//! the HTTP router with generated traffic.

pub mod app;
pub mod attacks;
pub mod generators;
pub mod metrics;
