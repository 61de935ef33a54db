//! Host integration for reply-bot.
//!
//! The host is whatever process delivers events to the plugin and carries its
//! outbound calls to the chat platform. The plugin only ever sees it through the
//! `GenericHost` trait, handed in explicitly rather than reached through global
//! state, so the handler can run against a real host, the console host, or a mock.

pub mod console;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{HandlerResult, OutgoingMessage, Res};

// Traits.

/// Generic "host" trait that runtimes must implement.
///
/// This is the emission capability: the single side-effecting operation the reply
/// handler is allowed to perform.
#[async_trait]
pub trait GenericHost: Send + Sync + 'static {
    /// Hand a message to the host for delivery.
    ///
    /// An `Err` means the call itself failed (transport, serialization, ...). A
    /// returned [`HandlerResult`] with a negative `error_code` means the host
    /// refused delivery. Implementations must not retry on the caller's behalf.
    async fn send_message(&self, message: &OutgoingMessage) -> Res<HandlerResult>;
}

// Structs.

/// Host client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct HostClient {
    inner: Arc<dyn GenericHost>,
}

impl Deref for HostClient {
    type Target = dyn GenericHost;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl HostClient {
    pub fn new(inner: Arc<dyn GenericHost>) -> Self {
        Self { inner }
    }
}
