use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Event kinds.

/// The discriminator carried by every [`IncomingEvent`].
///
/// Only [`EventKind::Content`] is acted upon by the reply handler; every other kind
/// is accepted and passed through untouched. Unknown tokens are preserved verbatim
/// in [`EventKind::Other`] so they round-trip through serialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventKind {
    /// A chat message was posted (`content`).
    Content,
    /// A watched message was referenced by another message (`watch:reference`).
    WatchReference,
    /// A reaction was added to a watched message (`watch:reaction:added`).
    WatchReactionAdded,
    /// A reaction was removed from a watched message (`watch:reaction:removed`).
    WatchReactionRemoved,
    /// An outbound HTTP request completed (`http:response`).
    HttpResponse,
    /// Any kind this crate does not know about.
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Content => "content",
            EventKind::WatchReference => "watch:reference",
            EventKind::WatchReactionAdded => "watch:reaction:added",
            EventKind::WatchReactionRemoved => "watch:reaction:removed",
            EventKind::HttpResponse => "http:response",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<&str> for EventKind {
    fn from(value: &str) -> Self {
        match value {
            "content" => EventKind::Content,
            "watch:reference" => EventKind::WatchReference,
            "watch:reaction:added" => EventKind::WatchReactionAdded,
            "watch:reaction:removed" => EventKind::WatchReactionRemoved,
            "http:response" => EventKind::HttpResponse,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl From<String> for EventKind {
    fn from(value: String) -> Self {
        EventKind::from(value.as_str())
    }
}

impl From<EventKind> for String {
    fn from(value: EventKind) -> Self {
        match value {
            EventKind::Other(kind) => kind,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Inbound types.

/// An event delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    /// The kind of event.
    pub kind: EventKind,
    /// The channel the event occurred in.
    pub channel: String,
    /// The message the event is about, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<IncomingMessage>,
    /// Present on reaction watch events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reaction: Option<IncomingReaction>,
    /// Present on `http:response` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<IncomingResponse>,
}

impl IncomingEvent {
    /// Whether this is a posted chat message.
    pub fn is_content(&self) -> bool {
        self.kind == EventKind::Content
    }

    /// The id of the message this event is about, if the host supplied one.
    pub fn message_id(&self) -> Option<&str> {
        self.message.as_ref().and_then(|m| m.id.as_deref())
    }
}

/// A chat message as seen by the plugin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingMessage {
    /// Platform id of the message; opaque, only used for reply threading.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Author record, passed through as-is.
    #[serde(default)]
    pub author: Value,
    /// The id of the message to which this message replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A reaction on a watched message. Passed through, so every field is lenient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomingReaction {
    /// The username that reacted.
    pub from: String,
    /// The emoji.
    pub with: String,
    pub message: IncomingMessage,
}

/// The answer to an outbound HTTP request. Passed through, so every field is lenient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomingResponse {
    /// The identifier the plugin attached to the request.
    pub id: String,
    pub status: u16,
    pub body: String,
    pub headers: Value,
}

// Outbound types.

/// A message handed to the host for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Destination channel; `None` lets the host pick its default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// The text to send.
    pub message: String,
    /// Message id to reply to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply: Option<String>,
}

/// What the host reports back after an outbound call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResult {
    /// Zero indicates success; negative numbers indicate failure.
    pub error_code: i32,
    /// Platform id of whatever the host created, if anything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl HandlerResult {
    pub fn ok(id: impl Into<String>) -> Self {
        Self { error_code: 0, id: Some(id.into()) }
    }

    pub fn failed(error_code: i32) -> Self {
        Self { error_code, id: None }
    }

    pub fn is_ok(&self) -> bool {
        self.error_code >= 0
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_content_event() {
        let event: IncomingEvent = serde_json::from_value(json!({
            "kind": "content",
            "channel": "C1",
            "message": { "id": "M1", "content": "how are you", "author": { "username": "pat" } }
        }))
        .unwrap();

        assert!(event.is_content());
        assert_eq!(event.channel, "C1");
        assert_eq!(event.message_id(), Some("M1"));
        assert_eq!(event.message.as_ref().unwrap().content, "how are you");
    }

    #[test]
    fn unknown_kinds_round_trip() {
        let event: IncomingEvent = serde_json::from_value(json!({ "kind": "member:joined", "channel": "C9" })).unwrap();

        assert_eq!(event.kind, EventKind::Other("member:joined".to_string()));
        assert!(!event.is_content());
        assert_eq!(serde_json::to_value(&event).unwrap()["kind"], "member:joined");
    }

    #[test]
    fn parses_reaction_watch_event() {
        let event: IncomingEvent = serde_json::from_value(json!({
            "kind": "watch:reaction:added",
            "channel": "C1",
            "reaction": { "from": "pat", "with": "🤖", "message": { "id": "M7" } }
        }))
        .unwrap();

        assert_eq!(event.kind, EventKind::WatchReactionAdded);
        assert_eq!(event.message_id(), None);
        assert_eq!(event.reaction.unwrap().message.id.as_deref(), Some("M7"));
    }

    #[test]
    fn accepts_partial_pass_through_payloads() {
        let reaction: IncomingEvent = serde_json::from_value(json!({
            "kind": "watch:reaction:removed",
            "channel": "C1",
            "reaction": { "with": "🎤" }
        }))
        .unwrap();

        assert_eq!(reaction.reaction.as_ref().unwrap().from, "");
        assert_eq!(reaction.reaction.as_ref().unwrap().with, "🎤");

        let response: IncomingEvent = serde_json::from_value(json!({
            "kind": "http:response",
            "channel": "C1",
            "response": { "id": "R1", "body": "ok" }
        }))
        .unwrap();

        assert_eq!(response.kind, EventKind::HttpResponse);
        assert_eq!(response.response.as_ref().unwrap().status, 0);
        assert_eq!(response.response.as_ref().unwrap().body, "ok");
    }

    #[test]
    fn outgoing_message_omits_empty_optionals() {
        let message = OutgoingMessage {
            channel: None,
            message: "hello world".to_string(),
            reply: None,
        };

        assert_eq!(serde_json::to_value(&message).unwrap(), json!({ "message": "hello world" }));
    }

    #[test]
    fn handler_result_uses_camel_case() {
        let result: HandlerResult = serde_json::from_value(json!({ "errorCode": -1 })).unwrap();

        assert!(!result.is_ok());
        assert_eq!(result, HandlerResult::failed(-1));
        assert_eq!(serde_json::to_value(HandlerResult::ok("X1")).unwrap(), json!({ "errorCode": 0, "id": "X1" }));
    }
}
