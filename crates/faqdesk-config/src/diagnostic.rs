// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turns figment failures into miette diagnostics.
//!
//! Every field of [`FaqdeskConfig`](crate::FaqdeskConfig) has a default, so a
//! load can only fail on a key faqdesk does not know, a value of the wrong
//! type, or an unreadable source. Unknown keys get a Jaro-Winkler "did you
//! mean" hint scoped to their `[section]`; keys that came from the
//! environment are reported under their `FAQDESK_*` variable name.

#![allow(unused_assignments)] // miette's Diagnostic derive generates code triggering this lint

use figment::error::{Error as FigmentError, Kind};
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Minimum Jaro-Winkler similarity for a "did you mean" hint.
const SUGGESTION_THRESHOLD: f64 = 0.75;

/// Places faqdesk reads configuration from, in merge order.
const SEARCH_PATH: &str = "/etc/faqdesk/faqdesk.toml, ~/.config/faqdesk/faqdesk.toml, \
                           ./faqdesk.toml, then FAQDESK_* environment variables";

/// A configuration problem, ready for miette rendering.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    /// A key that no faqdesk section declares.
    #[error("unknown configuration key `{}`", dotted(.section.as_deref(), .key))]
    #[diagnostic(
        code(faqdesk::config::unknown_key),
        help("{}", unknown_key_help(section.as_deref(), suggestion.as_deref(), valid_keys, env_var.as_deref()))
    )]
    UnknownKey {
        key: String,
        /// Enclosing section (`matcher`, `texts`, ...); `None` at the top level.
        section: Option<String>,
        suggestion: Option<String>,
        /// Comma-separated keys accepted where `key` appeared.
        valid_keys: String,
        /// Set when the key came from a `FAQDESK_*` variable.
        env_var: Option<String>,
        #[label("not a faqdesk setting")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that does not deserialize into the setting's type.
    #[error("`{key}` has the wrong type: found {found}")]
    #[diagnostic(
        code(faqdesk::config::invalid_value),
        help("`{key}` expects {expected}")
    )]
    InvalidValue {
        /// Dotted path, e.g. `matcher.fuzzy_threshold`.
        key: String,
        found: String,
        expected: String,
        #[label("set here")]
        span: Option<SourceSpan>,
        #[source_code]
        src: Option<NamedSource<String>>,
    },

    /// A value that parsed but is not acceptable.
    #[error("validation error: {message}")]
    #[diagnostic(code(faqdesk::config::validation))]
    Validation { message: String },

    /// A source that could not be read or parsed at all.
    #[error("could not load configuration from {origin}: {detail}")]
    #[diagnostic(
        code(faqdesk::config::unreadable),
        help("faqdesk reads {}", SEARCH_PATH)
    )]
    Unreadable { origin: String, detail: String },
}

fn dotted(section: Option<&str>, key: &str) -> String {
    match section {
        Some(section) => format!("{section}.{key}"),
        None => key.to_string(),
    }
}

fn unknown_key_help(
    section: Option<&str>,
    suggestion: Option<&str>,
    valid_keys: &str,
    env_var: Option<&str>,
) -> String {
    let scope = match section {
        Some(section) => format!("[{section}] accepts: {valid_keys}"),
        None => format!("faqdesk sections are: {valid_keys}"),
    };
    let mut help = match suggestion {
        Some(s) => format!("did you mean `{}`? {scope}", dotted(section, s)),
        None => scope,
    };
    if let Some(var) = env_var {
        help.push_str(&format!(" (set by environment variable {var})"));
    }
    help
}

/// Convert every error inside a `figment::Error` into a [`ConfigError`].
///
/// `toml_sources` holds `(origin, content)` pairs used to attach source
/// spans; files are matched by path, inline strings by the `<inline>` origin.
pub fn figment_to_config_errors(
    err: FigmentError,
    toml_sources: &[(String, String)],
) -> Vec<ConfigError> {
    err.into_iter()
        .map(|error| convert(&error, toml_sources))
        .collect()
}

fn convert(error: &FigmentError, toml_sources: &[(String, String)]) -> ConfigError {
    let path: Vec<&str> = error.path.iter().map(String::as_str).collect();
    let from_env = is_from_env(error);

    match &error.kind {
        Kind::UnknownField(field, expected) => {
            let section = path.first().map(|s| s.to_string());
            let env_var = from_env.then(|| env_var_name(section.as_deref(), field));
            let (span, src) = if from_env {
                (None, None)
            } else {
                locate(error, toml_sources, section.as_deref(), field)
            };
            ConfigError::UnknownKey {
                key: field.clone(),
                suggestion: suggest_key(field, expected).map(str::to_string),
                valid_keys: expected.join(", "),
                section,
                env_var,
                span,
                src,
            }
        }
        Kind::InvalidType(actual, expected) => {
            let (section, key) = match path.split_last() {
                Some((key, parents)) => (parents.first().copied(), *key),
                None => (None, ""),
            };
            let (span, src) = if from_env {
                (None, None)
            } else {
                locate(error, toml_sources, section, key)
            };
            ConfigError::InvalidValue {
                key: path.join("."),
                found: actual.to_string(),
                expected: expected.to_string(),
                span,
                src,
            }
        }
        _ => ConfigError::Unreadable {
            origin: origin_of(error),
            detail: error.kind.to_string(),
        },
    }
}

fn is_from_env(error: &FigmentError) -> bool {
    error
        .metadata
        .as_ref()
        .is_some_and(|m| m.name.contains("environment"))
}

fn origin_of(error: &FigmentError) -> String {
    match error.metadata.as_ref() {
        Some(meta) => match &meta.source {
            Some(figment::Source::File(path)) => path.display().to_string(),
            _ => meta.name.to_string(),
        },
        None => "configuration".to_string(),
    }
}

/// Environment variable that would have produced `section.key`.
fn env_var_name(section: Option<&str>, key: &str) -> String {
    format!("FAQDESK_{}", dotted(section, key).replace('.', "_")).to_uppercase()
}

fn locate(
    error: &FigmentError,
    toml_sources: &[(String, String)],
    section: Option<&str>,
    key: &str,
) -> (Option<SourceSpan>, Option<NamedSource<String>>) {
    let origin = match error.metadata.as_ref().and_then(|m| m.source.as_ref()) {
        Some(figment::Source::File(path)) => path.display().to_string(),
        _ => "<inline>".to_string(),
    };
    let Some((name, content)) = toml_sources.iter().find(|(o, _)| *o == origin) else {
        return (None, None);
    };
    match find_key(content, section, key) {
        Some(span) => (
            Some(span),
            Some(NamedSource::new(name, content.clone())),
        ),
        None => (None, None),
    }
}

/// Span of `key` inside `[section]` (or before any header when `section` is
/// `None`) in TOML text.
pub fn find_key(content: &str, section: Option<&str>, key: &str) -> Option<SourceSpan> {
    let mut current: Option<&str> = None;
    let mut offset = 0;

    for line in content.split_inclusive('\n') {
        let body = line.trim_start();
        let indent = line.len() - body.len();

        if let Some(header) = body.strip_prefix('[') {
            current = header.split(']').next().map(str::trim);
        } else if current == section {
            let assigns = body
                .strip_prefix(key)
                .is_some_and(|rest| rest.trim_start().starts_with('='));
            if assigns {
                return Some(SourceSpan::new((offset + indent).into(), key.len()));
            }
        }
        offset += line.len();
    }
    None
}

/// Closest valid key by Jaro-Winkler similarity, if any clears the threshold.
pub fn suggest_key<'a>(unknown: &str, valid_keys: &[&'a str]) -> Option<&'a str> {
    valid_keys
        .iter()
        .map(|&key| (key, strsim::jaro_winkler(unknown, key)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}

/// Print every error to stderr with miette's graphical handler.
pub fn render_errors(errors: &[ConfigError]) {
    use miette::GraphicalReportHandler;

    let handler = GraphicalReportHandler::new();
    for error in errors {
        let mut buf = String::new();
        match handler.render_report(&mut buf, error as &dyn Diagnostic) {
            Ok(()) => eprint!("{buf}"),
            Err(_) => eprintln!("Error: {error}"),
        }
    }
    if errors.len() > 1 {
        eprintln!("faqdesk: {} configuration problems", errors.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggests_fuzzy_threshold_for_typo() {
        assert_eq!(
            suggest_key("fuzy_treshold", &["fuzzy_threshold"]),
            Some("fuzzy_threshold")
        );
    }

    #[test]
    fn suggestion_picks_the_closest_key() {
        let texts = &["no_match", "operator_reply", "operator_button"];
        assert_eq!(suggest_key("operator_buton", texts), Some("operator_button"));
        assert_eq!(suggest_key("zzzzzz", texts), None);
    }

    #[test]
    fn key_is_found_only_in_its_section() {
        let content = "[bot]\nname = \"x\"\n\n[matcher]\n  fuzy_threshold = 80\n";
        let span = find_key(content, Some("matcher"), "fuzy_threshold").expect("key in section");
        let start = span.offset();
        assert_eq!(&content[start..start + span.len()], "fuzy_threshold");

        assert!(find_key(content, Some("matcher"), "name").is_none());
        assert!(find_key(content, Some("texts"), "fuzy_threshold").is_none());
    }

    #[test]
    fn key_offsets_survive_crlf_line_endings() {
        let content = "[telegram]\r\nbot_token = \"t\"\r\nbot_tken = \"t\"\r\n";
        let span = find_key(content, Some("telegram"), "bot_tken").expect("key present");
        assert_eq!(&content[span.offset()..span.offset() + 8], "bot_tken");
    }

    #[test]
    fn prefix_of_a_longer_key_is_not_a_match() {
        let content = "[texts]\noperator_reply_extra = \"x\"\n";
        assert!(find_key(content, Some("texts"), "operator_reply").is_none());
    }

    #[test]
    fn top_level_keys_precede_the_first_header() {
        let content = "matchr = 1\n[bot]\nmatchr = 2\n";
        let span = find_key(content, None, "matchr").expect("top-level key");
        assert_eq!(span.offset(), 0);
    }

    #[test]
    fn env_var_names_follow_the_loader_mapping() {
        assert_eq!(
            env_var_name(Some("matcher"), "fuzy_threshold"),
            "FAQDESK_MATCHER_FUZY_THRESHOLD"
        );
        assert_eq!(env_var_name(None, "verbose"), "FAQDESK_VERBOSE");
    }

    #[test]
    fn unknown_key_help_names_the_section() {
        assert_eq!(
            unknown_key_help(Some("bot"), Some("name"), "name, log_level", None),
            "did you mean `bot.name`? [bot] accepts: name, log_level"
        );
        assert_eq!(
            unknown_key_help(None, None, "bot, telegram", None),
            "faqdesk sections are: bot, telegram"
        );
        let from_env = unknown_key_help(
            Some("matcher"),
            None,
            "fuzzy_threshold",
            Some("FAQDESK_MATCHER_CUTOFF"),
        );
        assert!(from_env.ends_with("(set by environment variable FAQDESK_MATCHER_CUTOFF)"));
    }
}
