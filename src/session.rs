//! Conversation state management.
//!
//! A [`ChatSession`] owns the credential-bearing client, the completion
//! options, and the ordered turn history. Send operations replay the full
//! history as request context and always append exactly two turns: the
//! user's message before the exchange and the assistant's reply after it.
//! Error-formatted text is stored as the assistant turn like any other
//! reply; that keeps conversational continuity at the cost of error text
//! re-entering future request context.

use std::sync::Arc;

use crate::client::DeepSeek;
use crate::error::{Error, Result};
use crate::log::{LogSink, Severity};
use crate::types::{CompletionOptions, Message, Model};

/// A chat session holding a conversation with the completions API.
///
/// Sessions are single-writer: send operations take `&mut self`, so
/// concurrent calls on one session are excluded by the borrow checker
/// rather than a lock.
pub struct ChatSession {
    client: DeepSeek,
    options: CompletionOptions,
    history: Vec<Message>,
    log: Option<Arc<dyn LogSink>>,
}

impl ChatSession {
    /// Creates a session around an existing client.
    pub fn new(client: DeepSeek, options: CompletionOptions) -> Self {
        Self {
            client,
            options,
            history: Vec::new(),
            log: None,
        }
    }

    /// Creates a session from a bare credential with default options.
    ///
    /// Fails on an empty credential; a session that failed initialization
    /// does not exist, so it cannot be used to send messages.
    pub fn initialize(api_key: impl Into<String>) -> Result<Self> {
        Self::initialize_with(api_key, None)
    }

    /// Creates a session from a bare credential, reporting initialization
    /// failures to the given sink.
    ///
    /// The sink is consulted on failure paths only; it never participates
    /// in control flow.
    pub fn initialize_with(
        api_key: impl Into<String>,
        log: Option<Arc<dyn LogSink>>,
    ) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            if let Some(sink) = &log {
                sink.log(
                    Severity::Error,
                    "refusing to initialize with an empty API key",
                    "ChatSession::initialize",
                );
            }
            return Err(Error::validation(
                "API key must not be empty",
                Some("api_key".to_string()),
            ));
        }

        let client = match DeepSeek::new(Some(api_key)) {
            Ok(client) => client,
            Err(err) => {
                if let Some(sink) = &log {
                    sink.log(Severity::Error, &err.to_string(), "ChatSession::initialize");
                }
                return Err(err);
            }
        };

        Ok(Self {
            client,
            options: CompletionOptions::new(),
            history: Vec::new(),
            log,
        })
    }

    /// Attaches a log sink for failure reporting.
    pub fn with_log_sink(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = Some(log);
        self
    }

    /// Sends a message and returns the full reply.
    ///
    /// Appends the user turn, requests a completion with the entire
    /// history, appends the assistant turn, and returns it. The history
    /// grows by exactly two entries whether the reply is model output or
    /// recovered error text.
    pub async fn send(&mut self, text: &str) -> String {
        self.history.push(Message::user(text));
        let response = self.client.complete(&self.history, &self.options).await;
        self.history.push(Message::assistant(response.clone()));
        response
    }

    /// Sends a message, streaming the reply through `on_chunk`.
    ///
    /// The callback fires zero or more times, strictly before this call
    /// returns. History mutation matches [`ChatSession::send`]; the stored
    /// assistant turn is the concatenation of the delivered fragments.
    pub async fn send_streaming<F>(&mut self, text: &str, on_chunk: F) -> String
    where
        F: FnMut(&str),
    {
        self.history.push(Message::user(text));
        let response = self
            .client
            .complete_streaming(&self.history, &self.options, on_chunk)
            .await;
        self.history.push(Message::assistant(response.clone()));
        response
    }

    /// Empties the conversation history. The credential is untouched.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Returns the conversation history, oldest turn first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Returns the number of turns in the conversation.
    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// Changes the model used for subsequent sends.
    pub fn set_model(&mut self, model: Model) {
        self.options.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.options.model
    }

    /// Sets the sampling temperature, clamped to `[0, 2]`.
    pub fn set_temperature(&mut self, temperature: f32) {
        self.options = std::mem::take(&mut self.options).with_temperature(temperature);
    }

    /// Returns the sampling temperature.
    pub fn temperature(&self) -> f32 {
        self.options.temperature
    }

    /// Sets the maximum tokens per response.
    pub fn set_max_tokens(&mut self, max_tokens: u32) {
        self.options = std::mem::take(&mut self.options).with_max_tokens(max_tokens);
    }

    /// Returns the maximum tokens per response.
    pub fn max_tokens(&self) -> u32 {
        self.options.max_tokens
    }
}
