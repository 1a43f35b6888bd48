// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Question resolution for faqdesk.
//!
//! This crate provides:
//! - [`normalize`]: search keys and display text
//! - [`codes`]: extraction of error/product codes from free text
//! - [`fuzzy`]: partial-ratio similarity scoring
//! - [`FaqIndex`]: a per-request snapshot of the FAQ store
//! - [`Matcher`] / [`Resolver`]: the exact, substring, fuzzy, code cascade
//! - [`media`]: video-answer detection
//!
//! Nothing here holds state between calls. [`Resolver`] reloads the index
//! from its [`FaqSource`](faqdesk_core::FaqSource) for every query so edits
//! to the store are visible on the next message.

pub mod codes;
pub mod fuzzy;
pub mod index;
pub mod matcher;
pub mod media;
pub mod normalize;

pub use codes::extract_codes;
pub use fuzzy::partial_ratio;
pub use index::FaqIndex;
pub use matcher::{
    DEFAULT_FUZZY_THRESHOLD, MatchObserver, MatchStage, Matcher, NoopObserver, Resolution,
    Resolver, StageEvent, TracingObserver,
};
pub use media::{is_video_answer, video_url};
pub use normalize::{display_text, search_key};
