// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as the threshold range, socket addresses, and template placeholders.

use crate::diagnostic::ConfigError;
use crate::model::FaqdeskConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &FaqdeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    let threshold = config.matcher.fuzzy_threshold;
    if !(0.0..=100.0).contains(&threshold) {
        errors.push(ConfigError::Validation {
            message: format!("matcher.fuzzy_threshold must be within 0..=100, got {threshold}"),
        });
    }

    if config.prometheus.enabled
        && config
            .prometheus
            .listen_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "prometheus.listen_address `{}` is not a valid socket address",
                config.prometheus.listen_address
            ),
        });
    }

    if config.telegram.bot_token.is_some() && config.telegram.operator_chat_id.is_none() {
        errors.push(ConfigError::Validation {
            message: "telegram.operator_chat_id is required when telegram.bot_token is set"
                .to_string(),
        });
    }

    let texts = &config.texts;
    let templates = [
        ("texts.answer_found", texts.answer_found.as_str(), "{answer}"),
        ("texts.video_link", texts.video_link.as_str(), "{url}"),
        ("texts.operator_reply", texts.operator_reply.as_str(), "{reply}"),
        ("texts.dialog_closed", texts.dialog_closed.as_str(), "{user_id}"),
    ];
    for (key, template, placeholder) in templates {
        if !template.contains(placeholder) {
            errors.push(ConfigError::Validation {
                message: format!("{key} must contain the `{placeholder}` placeholder"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_message(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        let config = FaqdeskConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = FaqdeskConfig::default();
        config.storage.database_path = "  ".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "database_path"));
    }

    #[test]
    fn threshold_outside_range_fails_validation() {
        let mut config = FaqdeskConfig::default();
        config.matcher.fuzzy_threshold = 101.0;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "fuzzy_threshold"));

        config.matcher.fuzzy_threshold = -1.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn threshold_bounds_are_inclusive() {
        let mut config = FaqdeskConfig::default();
        config.matcher.fuzzy_threshold = 0.0;
        assert!(validate_config(&config).is_ok());
        config.matcher.fuzzy_threshold = 100.0;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn bad_listen_address_only_matters_when_enabled() {
        let mut config = FaqdeskConfig::default();
        config.prometheus.listen_address = "not an address".to_string();
        assert!(validate_config(&config).is_ok());

        config.prometheus.enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "listen_address"));
    }

    #[test]
    fn token_without_operator_chat_fails_validation() {
        let mut config = FaqdeskConfig::default();
        config.telegram.bot_token = Some("123:abc".to_string());
        let errors = validate_config(&config).unwrap_err();
        assert!(has_message(&errors, "operator_chat_id"));

        config.telegram.operator_chat_id = Some(-100_123);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn templates_missing_placeholders_are_all_reported() {
        let mut config = FaqdeskConfig::default();
        config.texts.answer_found = "Answer below".to_string();
        config.texts.dialog_closed = "Closed.".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(has_message(&errors, "{answer}"));
        assert!(has_message(&errors, "{user_id}"));
    }
}
