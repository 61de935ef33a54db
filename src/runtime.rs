//! Runtime services and shared state for the reply-bot.
//!
//! The runtime is a minimal host: it reads newline-delimited events, hands each one
//! to the reply handler in its own task, and logs whatever comes back. Failed
//! invocations are surfaced and counted, never retried.

use std::sync::Arc;

use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::Semaphore,
    task::JoinSet,
};
use tracing::{Instrument, error, info, info_span, instrument, warn};

use crate::{
    base::{
        config::Config,
        error::HandlerError,
        types::{IncomingEvent, Res},
    },
    interaction::reply::ReplyHandler,
    service::host::HostClient,
};

/// Runtime service context that can be shared across the application.
///
/// This struct holds the configuration, the host client, and the handler.
/// It is designed to be trivially cloneable.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The host client instance.
    pub host: HostClient,
    /// The reply handler.
    pub handler: ReplyHandler,
}

/// Counts of what happened during one [`Runtime::run`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Events the handler completed successfully (replied or ignored).
    pub handled: usize,
    /// Events the handler returned an error for, or whose task panicked.
    pub failed: usize,
    /// Lines that were not UTF-8 or could not be parsed as events.
    pub skipped: usize,
}

impl Runtime {
    /// Create a new runtime instance.
    pub fn new(config: Config, host: HostClient) -> Self {
        let handler = ReplyHandler::from_config(&config);

        Self { config, host, handler }
    }

    /// Handle a single event, logging any failure.
    ///
    /// This is the host's side of the contract: the result is reported, and a failure
    /// is never retried since a second send could duplicate a visible reply.
    #[instrument(skip_all)]
    pub async fn dispatch(&self, event: IncomingEvent) -> Result<(), HandlerError> {
        let result = self.handler.handle(&event, &self.host).await;

        if let Err(err) = &result {
            if err.is_emission_failure() {
                error!("Emission failed, not retrying: {}", err);
            } else {
                error!("Error while handling: {}", err);
            }
        }

        result
    }

    /// Read events from `reader` until EOF, handling them concurrently.
    ///
    /// Blank lines are skipped silently; lines that are not UTF-8 or do not parse are
    /// logged and counted. A task that panics counts as a failure. Every spawned event
    /// is awaited before returning, including when the reader itself fails.
    #[instrument(skip_all)]
    pub async fn run<R>(&self, mut reader: R) -> Res<RunSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let permits = Arc::new(Semaphore::new(self.config.max_in_flight));
        let mut tasks = JoinSet::new();
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();
        let mut line_number = 0usize;
        let mut read_error = None;

        loop {
            buf.clear();

            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    error!("Failed to read events after line {}: {}", line_number, err);
                    read_error = Some(err);
                    break;
                }
            }

            line_number += 1;

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(err) => {
                    warn!("Skipping line {}: not UTF-8 ({}).", line_number, err);
                    summary.skipped += 1;
                    continue;
                }
            };

            if line.is_empty() {
                continue;
            }

            let event: IncomingEvent = match serde_json::from_str(line) {
                Ok(event) => event,
                Err(err) => {
                    warn!("Skipping line {}: not an event ({}).", line_number, err);
                    summary.skipped += 1;
                    continue;
                }
            };

            // Bound the number of in-flight invocations.
            let permit = permits.clone().acquire_owned().await?;
            let runtime = self.clone();
            let span = info_span!("event", line = line_number);

            tasks.spawn(
                async move {
                    let result = runtime.dispatch(event).await;
                    drop(permit);
                    result
                }
                .instrument(span),
            );
        }

        // Drain everything already spawned, even if reading stopped early.
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(())) => summary.handled += 1,
                Ok(Err(_)) => summary.failed += 1,
                Err(err) => {
                    error!("Handler task did not complete: {}", err);
                    summary.failed += 1;
                }
            }
        }

        if let Some(err) = read_error {
            return Err(err.into());
        }

        info!("Processed {} events ({} failed, {} skipped).", summary.handled + summary.failed, summary.failed, summary.skipped);

        Ok(summary)
    }
}

// Tests.
