//! Client library for the DeepSeek chat-completions API.
//!
//! The crate is built around two layers: [`DeepSeek`], a thin HTTP client
//! whose completion calls recover every failure into error-formatted reply
//! text, and [`ChatSession`], which owns the conversation history and
//! replays it on each send. Streaming responses arrive over SSE and are
//! decoded by the [`sse`] module.

// Public modules
pub mod chat;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod log;
pub mod observability;
pub mod session;
pub mod sse;
pub mod types;

// Re-exports
pub use client::DeepSeek;
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use log::{ErrorLog, LogRecord, LogSink, Severity};
pub use session::ChatSession;
pub use types::*;
