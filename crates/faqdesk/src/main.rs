// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! faqdesk - a Telegram FAQ bot with operator handoff.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod ask;
mod faq;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use faqdesk_config::{ConfigError, FaqdeskConfig};

/// faqdesk - a Telegram FAQ bot with operator handoff.
#[derive(Parser, Debug)]
#[command(name = "faqdesk", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the bot.
    Serve,
    /// Resolve one question against the FAQ store and print the result.
    Ask {
        /// The question, as a user would type it.
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Manage FAQ entries.
    Faq {
        #[command(subcommand)]
        action: faq::FaqAction,
    },
    /// Inspect configuration.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Load and validate configuration, printing any problems.
    Check,
}

fn load_config(path: Option<&PathBuf>) -> Result<FaqdeskConfig, Vec<ConfigError>> {
    match path {
        Some(path) => faqdesk_config::load_and_validate_path(path),
        None => faqdesk_config::load_and_validate(),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(errors) => {
            faqdesk_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Ask { query }) => ask::run_ask(&config, &query.join(" ")).await,
        Some(Commands::Faq { action }) => faq::run_faq(&config, action).await,
        Some(Commands::Config {
            action: ConfigAction::Check,
        }) => {
            println!("{}", config_summary(&config));
            Ok(())
        }
        None => {
            println!("faqdesk: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// One-line-per-section overview printed by `config check`.
fn config_summary(config: &FaqdeskConfig) -> String {
    let telegram = match (&config.telegram.bot_token, config.telegram.operator_chat_id) {
        (Some(_), Some(chat)) => format!("enabled (operator chat {chat})"),
        _ => "disabled".to_string(),
    };
    let prometheus = if config.prometheus.enabled {
        format!("enabled on {}", config.prometheus.listen_address)
    } else {
        "disabled".to_string()
    };

    format!(
        "config OK\n  bot: {} (log level {})\n  storage: {}\n  fuzzy threshold: {}\n  telegram: {telegram}\n  prometheus: {prometheus}",
        config.bot.name,
        config.bot.log_level,
        config.storage.database_path,
        config.matcher.fuzzy_threshold,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        // Only jemalloc supports advancing the epoch.
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["faqdesk", "ask", "Ошибка", "APK36651065"]).unwrap();
        match cli.command {
            Some(Commands::Ask { query }) => assert_eq!(query.join(" "), "Ошибка APK36651065"),
            other => panic!("expected ask, got {other:?}"),
        }

        let cli = Cli::try_parse_from(["faqdesk", "faq", "remove", "Как дела?"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Faq {
                action: faq::FaqAction::Remove { .. }
            })
        ));

        let cli =
            Cli::try_parse_from(["faqdesk", "config", "check", "--config", "/tmp/f.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/f.toml")));
    }

    #[test]
    fn ask_requires_a_query() {
        assert!(Cli::try_parse_from(["faqdesk", "ask"]).is_err());
    }

    #[test]
    fn summary_reports_disabled_transports() {
        let config = faqdesk_config::load_and_validate_str("").expect("default config should be valid");
        let summary = config_summary(&config);
        assert!(summary.starts_with("config OK"));
        assert!(summary.contains("telegram: disabled"));
        assert!(summary.contains("prometheus: disabled"));
        assert!(summary.contains("fuzzy threshold: 75"));
    }

    #[test]
    fn summary_reports_operator_chat() {
        let config = faqdesk_config::load_and_validate_str(
            "[telegram]\nbot_token = \"1:abc\"\noperator_chat_id = -100500\n",
        )
        .expect("config should be valid");
        assert!(config_summary(&config).contains("operator chat -100500"));
    }
}
