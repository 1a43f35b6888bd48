// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for faqdesk.
//!
//! This crate provides the trait definitions, error type, and common types
//! shared by the resolution engine, the escalation flow, and the adapters.

pub mod error;
pub mod traits;
pub mod types;

pub use error::FaqdeskError;
pub use types::{AdapterType, FaqEntry, HealthStatus, MessageId, UserId};

pub use traits::{ChannelAdapter, FaqSource, PluginAdapter, StorageAdapter};
