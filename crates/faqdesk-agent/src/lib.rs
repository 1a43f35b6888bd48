// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Event loop and operator escalation for faqdesk.
//!
//! The [`AgentLoop`] is the central coordinator that:
//! - Receives events from a channel adapter
//! - Hands each event to the [`EventRouter`] on its own task
//! - Stops on cancellation and waits for in-flight events before returning
//!
//! Escalation sessions live in a shared [`EscalationTracker`], so events for
//! different users never wait on each other.

pub mod escalation;
pub mod router;
pub mod shutdown;

use std::sync::Arc;
use std::time::Duration;

use faqdesk_core::types::InboundEvent;
use faqdesk_core::{ChannelAdapter, FaqdeskError};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

pub use escalation::{EscalationError, EscalationTracker, SessionState};
pub use router::{EscalationStage, EventRouter, Outcome};

/// How long shutdown waits for in-flight events.
pub const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// Pulls events from a channel and routes them concurrently.
pub struct AgentLoop {
    channel: Arc<dyn ChannelAdapter>,
    router: Arc<EventRouter>,
    tasks: TaskTracker,
}

impl AgentLoop {
    /// Creates a loop over an already connected channel.
    pub fn new(channel: Arc<dyn ChannelAdapter>, router: EventRouter) -> Self {
        info!(channel = channel.name(), "agent loop initialized");
        Self {
            channel,
            router: Arc::new(router),
            tasks: TaskTracker::new(),
        }
    }

    pub fn router(&self) -> &Arc<EventRouter> {
        &self.router
    }

    /// Runs until `cancel` fires or the channel closes, then drains in-flight events.
    pub async fn run(&self, cancel: CancellationToken) -> Result<(), FaqdeskError> {
        info!("agent loop running");

        loop {
            tokio::select! {
                event = self.channel.receive() => {
                    match event {
                        Ok(event) => self.dispatch(event),
                        Err(e) if e.is_channel_closed() => {
                            info!("channel closed, stopping agent loop");
                            break;
                        }
                        Err(e) => {
                            error!(error = %e, "channel receive error");
                        }
                    }
                }
                _ = cancel.cancelled() => {
                    info!("shutdown signal received, stopping agent loop");
                    break;
                }
            }
        }

        self.tasks.close();
        shutdown::drain_tasks(&self.tasks, DRAIN_TIMEOUT).await;

        info!(
            pending_escalations = self.router.tracker().pending_count(),
            "agent loop stopped"
        );
        Ok(())
    }

    fn dispatch(&self, event: InboundEvent) {
        let router = Arc::clone(&self.router);
        self.tasks.spawn(async move {
            let kind = event.kind();
            match router.handle(event).await {
                Ok(outcome) => debug!(event = kind, outcome = outcome.label(), "event handled"),
                Err(e) => error!(event = kind, error = %e, "failed to handle event"),
            }
        });
    }
}
