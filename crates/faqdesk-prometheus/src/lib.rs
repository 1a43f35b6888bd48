// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for faqdesk.
//!
//! Uses the metrics-rs facade with the Prometheus exporter. When a listen
//! address is given, `/metrics` is served over HTTP from a background task.

pub mod recording;

use std::net::SocketAddr;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::{info, warn};

use faqdesk_core::{AdapterType, FaqdeskError, HealthStatus, PluginAdapter};

pub use recording::{record_escalation, record_resolution, set_pending_escalations};

/// Prometheus metrics adapter.
///
/// Installs the Prometheus recorder globally and keeps a handle for rendering.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
    listen_address: Option<SocketAddr>,
}

impl PrometheusAdapter {
    /// Install the recorder, optionally serving it on `listen_address`.
    ///
    /// Only one recorder can be installed per process. Returns an error if a
    /// recorder is already installed or the listener cannot be set up. Must be
    /// called inside a tokio runtime when a listen address is given.
    pub fn new(listen_address: Option<SocketAddr>) -> Result<Self, FaqdeskError> {
        let handle = match listen_address {
            None => PrometheusBuilder::new().install_recorder().map_err(|e| {
                FaqdeskError::Internal(format!("failed to install Prometheus recorder: {e}"))
            })?,
            Some(addr) => {
                let (recorder, exporter) = PrometheusBuilder::new()
                    .with_http_listener(addr)
                    .build()
                    .map_err(|e| {
                        FaqdeskError::Internal(format!("failed to build Prometheus exporter: {e}"))
                    })?;
                let handle = recorder.handle();
                metrics::set_global_recorder(recorder).map_err(|e| {
                    FaqdeskError::Internal(format!("failed to install Prometheus recorder: {e}"))
                })?;
                tokio::spawn(async move {
                    if let Err(e) = exporter.await {
                        warn!(error = ?e, "prometheus listener stopped");
                    }
                });
                handle
            }
        };

        recording::register_metrics();

        info!(listen = ?listen_address, "prometheus metrics recorder installed");

        Ok(Self {
            handle,
            listen_address,
        })
    }

    /// Get a reference to the Prometheus handle for rendering.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }

    pub fn listen_address(&self) -> Option<SocketAddr> {
        self.listen_address
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Observability
    }

    async fn health_check(&self) -> Result<HealthStatus, FaqdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FaqdeskError> {
        Ok(())
    }
}
