//! Typed failures of the reply handler.
//!
//! These are surfaced to the host as-is. None of them are retried by the handler:
//! a retried send on a non-idempotent channel can duplicate a visible reply, so
//! whether to try again is left to whoever owns the host.

use thiserror::Error;

/// Error returned by [`crate::interaction::reply::ReplyHandler::handle`].
#[derive(Debug, Error)]
pub enum HandlerError {
    /// A content event arrived without the message (or message id) a reply must thread to.
    #[error("content event in channel `{channel}` has no message id to reply to")]
    MissingReplyTarget { channel: String },

    /// The host accepted the call but refused to deliver the message.
    #[error("host rejected the outgoing message with error code {code}")]
    Rejected { code: i32 },

    /// The host's emission call itself failed (transport, platform, ...).
    #[error("failed to emit outgoing message: {0}")]
    Emission(#[source] anyhow::Error),
}

impl HandlerError {
    /// Whether the failure happened while delivering, rather than while building, the message.
    pub fn is_emission_failure(&self) -> bool {
        matches!(self, HandlerError::Rejected { .. } | HandlerError::Emission(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_emission_failures() {
        assert!(HandlerError::Rejected { code: -3 }.is_emission_failure());
        assert!(HandlerError::Emission(anyhow::anyhow!("socket closed")).is_emission_failure());
        assert!(!HandlerError::MissingReplyTarget { channel: "C1".into() }.is_emission_failure());
    }

    #[test]
    fn messages_name_the_problem() {
        let err = HandlerError::MissingReplyTarget { channel: "C1".into() };
        assert_eq!(err.to_string(), "content event in channel `C1` has no message id to reply to");

        let err = HandlerError::Emission(anyhow::anyhow!("socket closed"));
        assert_eq!(err.to_string(), "failed to emit outgoing message: socket closed");
    }
}
