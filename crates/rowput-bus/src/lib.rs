// SPDX-FileCopyrightText: 2026 Rowput Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-process change notification bus.
//!
//! Writers hand a [`Changes`](rowput_core::Changes) event to the
//! [`ChangeBus`] after every successful put; query caches and live views
//! hold a [`ChangeSubscription`] and refresh when a table they read changes.

pub mod bus;
pub mod subscription;

pub use bus::{ChangeBus, DEFAULT_CAPACITY};
pub use subscription::ChangeSubscription;
