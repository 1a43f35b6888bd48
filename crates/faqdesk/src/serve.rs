// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `faqdesk serve` command implementation.
//!
//! Opens the FAQ store, optionally starts the Prometheus exporter, connects
//! the Telegram transport and runs the agent loop until a shutdown signal
//! arrives or the transport closes.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use faqdesk_agent::{AgentLoop, EscalationTracker, EventRouter, shutdown};
use faqdesk_config::FaqdeskConfig;
use faqdesk_core::{ChannelAdapter, FaqdeskError, StorageAdapter};
use faqdesk_resolver::{Matcher, Resolver, TracingObserver};
use faqdesk_storage::SqliteStorage;
use tracing::{error, info, warn};

#[cfg(feature = "prometheus")]
use faqdesk_prometheus::PrometheusAdapter;

#[cfg(feature = "telegram")]
use faqdesk_telegram::TelegramChannel;

/// Runs the `faqdesk serve` command.
pub async fn run_serve(config: FaqdeskConfig) -> Result<(), FaqdeskError> {
    init_tracing(&config.bot.log_level);

    info!(bot = config.bot.name.as_str(), "starting faqdesk serve");

    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);
    match storage.count_entries().await {
        Ok(count) => info!(entries = count, "FAQ store ready"),
        Err(e) => warn!(error = %e, "could not count FAQ entries"),
    }

    #[cfg(feature = "prometheus")]
    let _prometheus = if config.prometheus.enabled {
        let addr = parse_listen_address(&config.prometheus.listen_address)?;
        match PrometheusAdapter::new(Some(addr)) {
            Ok(adapter) => Some(adapter),
            Err(e) => {
                warn!(error = %e, "failed to initialize Prometheus adapter");
                None
            }
        }
    } else {
        None
    };

    let channel = connect_channel(&config).await?;

    let matcher = Matcher::new(config.matcher.fuzzy_threshold)
        .with_observer(Arc::new(TracingObserver));
    let resolver = Resolver::new(storage.clone(), matcher);
    let router = EventRouter::new(
        channel.clone(),
        resolver,
        Arc::new(EscalationTracker::new()),
        config.texts.clone(),
    );

    let cancel = shutdown::install_signal_handler();
    let agent_loop = AgentLoop::new(channel.clone(), router);
    let result = agent_loop.run(cancel).await;

    if let Err(e) = channel.shutdown().await {
        warn!(error = %e, "channel shutdown failed");
    }
    match tokio::time::timeout(Duration::from_secs(5), storage.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "storage close failed"),
        Err(_) => error!("storage close timed out"),
    }

    info!("faqdesk serve shutdown complete");
    result
}

#[cfg(feature = "telegram")]
async fn connect_channel(config: &FaqdeskConfig) -> Result<Arc<dyn ChannelAdapter>, FaqdeskError> {
    if config.telegram.bot_token.is_none() {
        return Err(FaqdeskError::Config(
            "telegram.bot_token is not set; nothing to serve".into(),
        ));
    }
    let mut channel =
        TelegramChannel::new(config.telegram.clone(), config.texts.operator_button.clone())?;
    channel.connect().await?;
    info!("telegram channel connected");
    Ok(Arc::new(channel))
}

#[cfg(not(feature = "telegram"))]
async fn connect_channel(_config: &FaqdeskConfig) -> Result<Arc<dyn ChannelAdapter>, FaqdeskError> {
    Err(FaqdeskError::Config(
        "faqdesk was built without the 'telegram' feature; no transport available".into(),
    ))
}

#[cfg_attr(not(feature = "prometheus"), allow(dead_code))]
fn parse_listen_address(value: &str) -> Result<SocketAddr, FaqdeskError> {
    value.parse().map_err(|e| {
        FaqdeskError::Config(format!("invalid prometheus.listen_address '{value}': {e}"))
    })
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("faqdesk={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
