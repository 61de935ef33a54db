//! A host that "delivers" messages by printing them as JSON lines.
//!
//! Used by the binary to run the plugin outside a real chat platform: events come
//! in on stdin, outgoing messages go out on stdout one JSON object per line.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use async_trait::async_trait;
use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::Mutex,
};
use tracing::{debug, instrument};

use crate::base::types::{HandlerResult, OutgoingMessage, Res};

use super::{GenericHost, HostClient};

// Extra methods on `HostClient` applied by the console implementation.

impl HostClient {
    /// Creates a host client that writes outgoing messages to stdout.
    pub fn console() -> Self {
        Self::from(ConsoleHost::new(tokio::io::stdout()))
    }
}

impl<W> From<ConsoleHost<W>> for HostClient
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn from(host: ConsoleHost<W>) -> Self {
        Self::new(Arc::new(host))
    }
}

// Structs.

/// Console host implementation.
pub struct ConsoleHost<W> {
    writer: Mutex<W>,
    sequence: AtomicU64,
}

impl<W> ConsoleHost<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
            sequence: AtomicU64::new(0),
        }
    }

    /// Consume the host, returning the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    /// Ids look like `console-<unix millis>-<sequence>`.
    fn next_id(&self) -> String {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("console-{}-{}", chrono::Utc::now().timestamp_millis(), sequence)
    }
}

#[async_trait]
impl<W> GenericHost for ConsoleHost<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    #[instrument(skip_all)]
    async fn send_message(&self, message: &OutgoingMessage) -> Res<HandlerResult> {
        let mut line = serde_json::to_vec(message)?;
        line.push(b'\n');

        // Hold the lock across the flush so concurrent sends never interleave.
        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;

        let id = self.next_id();
        debug!("Emitted message {id}");

        Ok(HandlerResult::ok(id))
    }
}

// Tests.
