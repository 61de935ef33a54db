//! Service integrations for external collaborators.
//!
//! This module contains the boundary to the host runtime that delivers events to
//! reply-bot and carries its outbound messages. The boundary is defined as a trait
//! with concrete implementations behind it, allowing for extensibility and easy testing.

pub mod host;
