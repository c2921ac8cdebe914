// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for rowput integration tests.
//!
//! Provides a temporary database harness and an instrumented resolver for
//! fast, deterministic tests that need no setup outside the process.
//!
//! # Components
//!
//! - [`TestHarness`] - Temp-dir database with a `users` table
//! - [`RecordingPutResolver`] - Resolver wrapper that records calls and injects failures

pub mod harness;
pub mod recording_resolver;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use recording_resolver::{RecordingPutResolver, ResolverCall};
