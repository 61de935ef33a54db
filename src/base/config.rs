//! Load configuration via `config` crate with env-override support.

use std::{ops::Deref, sync::Arc};

use serde::Deserialize;

use super::types::Res;

/// The text the bot answers every posted message with.
pub const DEFAULT_REPLY_TEXT: &str = "Doing fine, just fine";

/// Default reply text.
fn default_reply_text() -> String {
    DEFAULT_REPLY_TEXT.to_string()
}

/// Default bound on concurrently handled events.
fn default_max_in_flight() -> usize {
    16
}

/// What to do with a content event that carries no message id to thread a reply to.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingReplyTarget {
    /// Fail the invocation before anything is emitted.
    #[default]
    Reject,
    /// Send the reply as a plain, unthreaded channel message.
    Unthreaded,
    /// Do nothing and report success.
    Ignore,
}

/// Configuration for the reply-bot application.
#[derive(Debug, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Default for Config {
    fn default() -> Self {
        ConfigInner::default().into()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ConfigInner {
    /// Text sent back into the channel (`REPLY_BOT_REPLY_TEXT`).
    #[serde(default = "default_reply_text")]
    pub reply_text: String,
    /// Policy for content events without a message id (`REPLY_BOT_MISSING_REPLY_TARGET`).
    #[serde(default)]
    pub missing_reply_target: MissingReplyTarget,
    /// Maximum number of events handled at once by the runtime (`REPLY_BOT_MAX_IN_FLIGHT`).
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            reply_text: default_reply_text(),
            missing_reply_target: MissingReplyTarget::default(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Config {
    pub fn load(explicit_path: Option<&std::path::Path>) -> Res<Self> {
        let mut cfg = config::Config::builder().add_source(config::Environment::default().prefix("REPLY_BOT"));

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        } else if std::path::Path::new(".hidden/config.toml").exists() {
            cfg = cfg.add_source(config::File::with_name(".hidden/config.toml"));
        }

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        result.validate()?;

        Ok(result)
    }

    fn validate(&self) -> Res<()> {
        if self.reply_text.trim().is_empty() {
            return Err(anyhow::anyhow!("Reply text must not be empty."));
        }

        if self.max_in_flight < 1 || self.max_in_flight > 1024 {
            return Err(anyhow::anyhow!("Max in-flight events must be between 1 and 1024."));
        }

        Ok(())
    }
}
