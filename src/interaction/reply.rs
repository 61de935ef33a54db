//! The reply reaction.
//!
//! Every posted chat message (a `content` event) gets exactly one reply, threaded to
//! the triggering message and sent back into the channel it came from. Every other
//! event kind is a no-op. The handler keeps no state between invocations.

use tracing::{debug, info, instrument, warn};

use crate::{
    base::{
        config::{Config, MissingReplyTarget},
        error::HandlerError,
        types::{IncomingEvent, OutgoingMessage},
    },
    service::host::HostClient,
};

/// Reacts to content events with a fixed reply.
#[derive(Debug, Clone)]
pub struct ReplyHandler {
    reply_text: String,
    missing_reply_target: MissingReplyTarget,
}

impl ReplyHandler {
    pub fn new(reply_text: impl Into<String>, missing_reply_target: MissingReplyTarget) -> Self {
        Self {
            reply_text: reply_text.into(),
            missing_reply_target,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.reply_text.clone(), config.missing_reply_target)
    }

    pub fn reply_text(&self) -> &str {
        &self.reply_text
    }

    /// Decide what, if anything, to send for `event`.
    ///
    /// `Ok(None)` means "no reply". No I/O happens here.
    pub fn build_reply(&self, event: &IncomingEvent) -> Result<Option<OutgoingMessage>, HandlerError> {
        if !event.is_content() {
            return Ok(None);
        }

        let reply = match (event.message_id(), self.missing_reply_target) {
            (Some(id), _) => Some(id.to_string()),
            (None, MissingReplyTarget::Unthreaded) => {
                warn!("Content event in channel {} has no message id; replying unthreaded.", event.channel);
                None
            }
            (None, MissingReplyTarget::Ignore) => {
                warn!("Content event in channel {} has no message id; ignoring.", event.channel);
                return Ok(None);
            }
            (None, MissingReplyTarget::Reject) => {
                return Err(HandlerError::MissingReplyTarget { channel: event.channel.clone() });
            }
        };

        Ok(Some(OutgoingMessage {
            channel: Some(event.channel.clone()),
            message: self.reply_text.clone(),
            reply,
        }))
    }

    /// Handle one event, emitting at most one message through `host`.
    ///
    /// Failures are returned as-is and never retried here.
    #[instrument(skip_all, fields(kind = %event.kind, channel = %event.channel))]
    pub async fn handle(&self, event: &IncomingEvent, host: &HostClient) -> Result<(), HandlerError> {
        let Some(message) = self.build_reply(event)? else {
            debug!("Ignoring event.");
            return Ok(());
        };

        let result = host.send_message(&message).await.map_err(HandlerError::Emission)?;

        if !result.is_ok() {
            return Err(HandlerError::Rejected { code: result.error_code });
        }

        info!("Replied to {} in {} (emitted {}).", message.reply.as_deref().unwrap_or("<none>"), event.channel, result.id.as_deref().unwrap_or("<unknown>"));

        Ok(())
    }
}

impl Default for ReplyHandler {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{
        config::DEFAULT_REPLY_TEXT,
        types::{EventKind, IncomingMessage},
    };

    fn event(kind: &str, channel: &str, id: Option<&str>) -> IncomingEvent {
        IncomingEvent {
            kind: EventKind::from(kind),
            channel: channel.to_string(),
            message: Some(IncomingMessage {
                id: id.map(str::to_string),
                content: "how are you".to_string(),
                ..Default::default()
            }),
            reaction: None,
            response: None,
        }
    }

    #[test]
    fn builds_threaded_reply_for_content() {
        let handler = ReplyHandler::default();

        let message = handler.build_reply(&event("content", "C1", Some("M1"))).unwrap().unwrap();

        assert_eq!(
            message,
            OutgoingMessage {
                channel: Some("C1".to_string()),
                message: DEFAULT_REPLY_TEXT.to_string(),
                reply: Some("M1".to_string()),
            }
        );
    }

    #[test]
    fn skips_every_other_kind() {
        let handler = ReplyHandler::default();

        for kind in ["reaction", "watch:reference", "watch:reaction:added", "watch:reaction:removed", "http:response", "Content", ""] {
            assert_eq!(handler.build_reply(&event(kind, "C1", Some("M1"))).unwrap(), None, "kind `{kind}`");
        }
    }

    #[test]
    fn uses_configured_text() {
        let handler = ReplyHandler::new("hello to you!", MissingReplyTarget::Reject);

        let message = handler.build_reply(&event("content", "C1", Some("M1"))).unwrap().unwrap();

        assert_eq!(message.message, "hello to you!");
    }

    #[test]
    fn missing_id_is_rejected_by_default() {
        let handler = ReplyHandler::default();

        let err = handler.build_reply(&event("content", "C1", None)).unwrap_err();

        assert!(matches!(err, HandlerError::MissingReplyTarget { ref channel } if channel == "C1"));
    }

    #[test]
    fn missing_message_is_rejected_by_default() {
        let handler = ReplyHandler::default();
        let mut event = event("content", "C1", None);
        event.message = None;

        assert!(matches!(handler.build_reply(&event), Err(HandlerError::MissingReplyTarget { .. })));
    }

    #[test]
    fn missing_id_can_degrade_to_unthreaded() {
        let handler = ReplyHandler::new(DEFAULT_REPLY_TEXT, MissingReplyTarget::Unthreaded);

        let message = handler.build_reply(&event("content", "C1", None)).unwrap().unwrap();

        assert_eq!(message.channel.as_deref(), Some("C1"));
        assert_eq!(message.reply, None);
    }

    #[test]
    fn missing_id_can_be_ignored() {
        let handler = ReplyHandler::new(DEFAULT_REPLY_TEXT, MissingReplyTarget::Ignore);

        assert_eq!(handler.build_reply(&event("content", "C1", None)).unwrap(), None);
    }

    #[test]
    fn non_content_without_message_is_fine_under_reject() {
        let handler = ReplyHandler::default();
        let mut event = event("watch:reaction:added", "C1", None);
        event.message = None;

        assert_eq!(handler.build_reply(&event).unwrap(), None);
    }
}
