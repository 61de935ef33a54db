//! Event handling for reply-bot.
//!
//! This module decides how the plugin reacts to events delivered by the host:
//! - Classifying inbound events by kind
//! - Building the outbound reply for posted messages
//! - Emitting it through the host's send capability

pub mod reply;
