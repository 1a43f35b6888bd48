// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for faqdesk.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level faqdesk configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FaqdeskConfig {
    /// Bot identity and logging.
    #[serde(default)]
    pub bot: BotConfig,

    /// Telegram transport settings.
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// FAQ store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Question matching settings.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// User- and operator-facing message texts.
    #[serde(default)]
    pub texts: TextsConfig,

    /// Prometheus metrics exporter.
    #[serde(default)]
    pub prometheus: PrometheusConfig,
}

/// Bot identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot, used in logs.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_bot_name() -> String {
    "faqdesk".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Telegram transport configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Telegram Bot API token. `None` disables the Telegram transport.
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Chat id of the operator group that receives escalations.
    #[serde(default)]
    pub operator_chat_id: Option<i64>,
}

/// FAQ store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("faqdesk").join("faqdesk.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("faqdesk.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Question matching configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Minimum partial-ratio score (0-100) accepted by the fuzzy stages.
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

fn default_fuzzy_threshold() -> f64 {
    75.0
}

/// Texts shown to users and operators.
///
/// Placeholders in braces are substituted at send time.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TextsConfig {
    /// Reply to `/start`.
    #[serde(default = "default_greeting")]
    pub greeting: String,

    /// Found answer; `{answer}` is replaced with the FAQ answer.
    #[serde(default = "default_answer_found")]
    pub answer_found: String,

    /// Nothing matched.
    #[serde(default = "default_no_match")]
    pub no_match: String,

    /// Label of the inline "call operator" button.
    #[serde(default = "default_operator_button")]
    pub operator_button: String,

    /// Sent after the button press opened an escalation.
    #[serde(default = "default_escalation_requested")]
    pub escalation_requested: String,

    /// Button pressed while an escalation is already open.
    #[serde(default = "default_escalation_already_pending")]
    pub escalation_already_pending: String,

    /// The follow-up message was relayed to operators.
    #[serde(default = "default_escalation_forwarded")]
    pub escalation_forwarded: String,

    /// The user wrote again while the relayed message awaits a reply.
    #[serde(default = "default_escalation_in_flight")]
    pub escalation_in_flight: String,

    /// Caption attached to video answers.
    #[serde(default = "default_video_caption")]
    pub video_caption: String,

    /// Plain-text fallback when a video cannot be sent; `{url}` is the link.
    #[serde(default = "default_video_link")]
    pub video_link: String,

    /// Operator text reply as seen by the user; `{reply}` is the operator's text.
    #[serde(default = "default_operator_reply")]
    pub operator_reply: String,

    /// Caption used for an operator photo reply without its own caption.
    #[serde(default = "default_operator_photo_caption")]
    pub operator_photo_caption: String,

    /// Posted to the operator chat once a reply was delivered; `{user_id}` is the user.
    #[serde(default = "default_dialog_closed")]
    pub dialog_closed: String,
}

impl Default for TextsConfig {
    fn default() -> Self {
        Self {
            greeting: default_greeting(),
            answer_found: default_answer_found(),
            no_match: default_no_match(),
            operator_button: default_operator_button(),
            escalation_requested: default_escalation_requested(),
            escalation_already_pending: default_escalation_already_pending(),
            escalation_forwarded: default_escalation_forwarded(),
            escalation_in_flight: default_escalation_in_flight(),
            video_caption: default_video_caption(),
            video_link: default_video_link(),
            operator_reply: default_operator_reply(),
            operator_photo_caption: default_operator_photo_caption(),
            dialog_closed: default_dialog_closed(),
        }
    }
}

fn default_greeting() -> String {
    "👋 Привет! Я бот для ответов на вопросы.\n\n\
     Просто напишите свой вопрос, и я постараюсь вам помочь.\n\
     Например: напишите \"Ошибка APK36651065\" или просто код \"APK36651065\".\n\n\
     Если вам не подходит автоматический ответ, нажмите кнопку «Вызвать оператора»."
        .to_string()
}

fn default_answer_found() -> String {
    "🧐 Найден ответ на ваш вопрос:\n\n\
     Ответ: {answer}\n\
     Если это не то, что вы искали, вы можете вызвать оператора, нажав кнопку ниже."
        .to_string()
}

fn default_no_match() -> String {
    "❌ Извините, я не нашёл ответ на ваш вопрос.\n\
     Пожалуйста, уточните запрос или нажмите кнопку, чтобы вызвать оператора."
        .to_string()
}

fn default_operator_button() -> String {
    "Вызвать оператора".to_string()
}

fn default_escalation_requested() -> String {
    "Оператор вызван. Пожалуйста, еще раз подробно опишите проблему и приложите скриншот (если нужно)"
        .to_string()
}

fn default_escalation_already_pending() -> String {
    "Обращение уже отправлено. Ожидайте ответа.".to_string()
}

fn default_escalation_forwarded() -> String {
    "Ваше обращение отправлено операторам. Ожидайте ответа.".to_string()
}

fn default_escalation_in_flight() -> String {
    "Ваше обращение уже отправлено. Пожалуйста, ожидайте ответа от оператора.".to_string()
}

fn default_video_caption() -> String {
    "🎥 Видео по вашему запросу:".to_string()
}

fn default_video_link() -> String {
    "🔗 Видео по вашему запросу: {url}".to_string()
}

fn default_operator_reply() -> String {
    "Ответ оператора:\n{reply}".to_string()
}

fn default_operator_photo_caption() -> String {
    "Ответ оператора:".to_string()
}

fn default_dialog_closed() -> String {
    "Диалог с пользователем {user_id} закрыт.".to_string()
}

/// Prometheus exporter configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PrometheusConfig {
    /// Serve `/metrics` over HTTP.
    #[serde(default)]
    pub enabled: bool,

    /// Socket address of the metrics listener.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,
}

impl Default for PrometheusConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_address: default_listen_address(),
        }
    }
}

fn default_listen_address() -> String {
    "127.0.0.1:9464".to_string()
}
