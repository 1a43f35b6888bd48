// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Detection of answers that are a bare link to an MP4 video.

use std::sync::LazyLock;

use regex::Regex;

static MP4_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+\.mp4$").unwrap());

/// The video URL if the whole (trimmed) answer is an `http(s)` link ending in `.mp4`.
pub fn video_url(answer: &str) -> Option<&str> {
    let trimmed = answer.trim();
    MP4_LINK.is_match(trimmed).then_some(trimmed)
}

/// Whether `answer` should be sent as a video rather than text.
pub fn is_video_answer(answer: &str) -> bool {
    video_url(answer).is_some()
}
