// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for faqdesk integration tests.
//!
//! Provides mock adapters and test harness infrastructure for fast,
//! deterministic, CI-runnable tests without Telegram.
//!
//! # Components
//!
//! - [`MockChannel`] - Mock transport with event injection and outbound capture
//! - [`StaticFaqSource`] - In-memory FAQ source that can be edited or made to fail
//! - [`TestHarness`] - Full engine over a temp SQLite store

pub mod harness;
pub mod mock_channel;
pub mod static_source;

pub use harness::TestHarness;
pub use mock_channel::MockChannel;
pub use static_source::StaticFaqSource;
