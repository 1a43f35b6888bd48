// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./faqdesk.toml` > `~/.config/faqdesk/faqdesk.toml` > `/etc/faqdesk/faqdesk.toml`
//! with environment variable overrides via `FAQDESK_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::FaqdeskConfig;

/// Top-level sections, used to map `FAQDESK_<SECTION>_<KEY>` onto `section.key`.
const SECTIONS: &[&str] = &["bot", "telegram", "storage", "matcher", "texts", "prometheus"];

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/faqdesk/faqdesk.toml` (system-wide)
/// 3. `~/.config/faqdesk/faqdesk.toml` (user XDG config)
/// 4. `./faqdesk.toml` (local directory)
/// 5. `FAQDESK_*` environment variables
pub fn load_config() -> Result<FaqdeskConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<FaqdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FaqdeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<FaqdeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(FaqdeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading (exposed for diagnostic use).
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(FaqdeskConfig::default()))
        .merge(Toml::file("/etc/faqdesk/faqdesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("faqdesk/faqdesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("faqdesk.toml"))
        .merge(env_provider())
}

/// Create the environment variable provider with explicit section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")`: key names contain
/// underscores, so `FAQDESK_TELEGRAM_BOT_TOKEN` must map to
/// `telegram.bot_token`, not `telegram.bot.token`.
fn env_provider() -> Env {
    Env::prefixed("FAQDESK_").map(|key| map_env_key(key.as_str()).into())
}

/// Maps a lowercased, prefix-stripped env var name to a dotted config path.
///
/// Only the leading section name is split off; unknown prefixes pass through.
pub fn map_env_key(key: &str) -> String {
    for section in SECTIONS {
        let field = key
            .strip_prefix(section)
            .and_then(|rest| rest.strip_prefix('_'));
        if let Some(field) = field.filter(|f| !f.is_empty()) {
            return format!("{section}.{field}");
        }
    }
    key.to_string()
}
