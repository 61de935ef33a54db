//! Library root for `reply-bot`.
//!
//! Reply-bot is a single-reaction chat plugin. The host delivers events that
//! happened in a chat channel; when one of them is a newly posted message, the bot
//! answers it with one reply, threaded to that message, in the same channel.
//!
//! The decision lives in [`interaction::reply`], the host boundary in
//! [`service::host`], and a minimal line-oriented host loop in [`runtime`].

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use service::host::HostClient;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up the console host and runs every event read from `input` (stdin when
/// `None`) through the reply handler.
pub async fn start(config: Config, input: Option<&std::path::Path>) -> Void {
    info!("Starting reply-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config, HostClient::console());

    // Pick the event source.
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match input {
        Some(path) => Box::new(BufReader::new(tokio::fs::File::open(path).await?)),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    // Run until the source is exhausted.
    let summary = runtime.run(reader).await?;

    if summary.failed > 0 {
        return Err(anyhow::anyhow!("{} of {} events failed.", summary.failed, summary.handled + summary.failed));
    }

    Ok(())
}
