//! Core components, types, and utilities for the reply-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The wire types exchanged with the host.
//! - Typed handler errors and common result aliases.

pub mod config;
pub mod error;
pub mod types;
