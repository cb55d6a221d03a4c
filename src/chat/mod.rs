//! Interactive chat application built on the pichat client library.
//!
//! This module provides a streaming REPL chat interface:
//!
//! - Streaming responses with real-time token display
//! - Slash commands for session control
//! - Configurable model and sampling parameters
//!
//! The module is organized into several components:
//!
//! - [`config`]: CLI argument parsing and configuration
//! - [`commands`]: Slash command parsing and handling
//! - [`render`]: Output rendering

mod commands;
mod config;
mod render;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use render::{PlainTextRenderer, Renderer};
