use serde::{Deserialize, Serialize};

use crate::types::{Message, Model};

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Tunable parameters shared by streaming and non-streaming completions.
///
/// The defaults match the service's documented chat defaults: the
/// `deepseek-chat` model, temperature 0.7, and a 1000 token response cap.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOptions {
    /// The model to use for generating responses.
    pub model: Model,

    /// Sampling temperature, valid over `[0, 2]`.
    pub temperature: f32,

    /// Maximum tokens per response.
    pub max_tokens: u32,
}

impl CompletionOptions {
    /// Creates options with the default model and sampling parameters.
    pub fn new() -> Self {
        Self {
            model: Model::default(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the sampling temperature, clamped to the valid `[0, 2]` range.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = clamp_temperature(temperature);
        self
    }

    /// Sets the maximum tokens per response. Zero is bumped to one token,
    /// since the API rejects non-positive limits.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens.max(1);
        self
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Clamp a temperature into the API's accepted `[0, 2]` range.
///
/// Non-finite values fall back to the default rather than serializing
/// `NaN` into the request body.
pub(crate) fn clamp_temperature(temperature: f32) -> f32 {
    if temperature.is_finite() {
        temperature.clamp(0.0, 2.0)
    } else {
        DEFAULT_TEMPERATURE
    }
}

/// The JSON request body for the chat-completions endpoint.
///
/// Built fresh per call from the conversation history; identical inputs
/// produce identical content (field formatting aside).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionRequest {
    /// The model identifier.
    pub model: Model,

    /// The ordered conversation, oldest turn first.
    pub messages: Vec<Message>,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens the model may generate.
    pub max_tokens: u32,

    /// Whether the response should be delivered as a server-sent-event
    /// stream rather than a single JSON object.
    pub stream: bool,
}

impl ChatCompletionRequest {
    /// Builds a request from a conversation and options.
    pub fn new(messages: &[Message], options: &CompletionOptions, stream: bool) -> Self {
        Self {
            model: options.model.clone(),
            messages: messages.to_vec(),
            temperature: clamp_temperature(options.temperature),
            max_tokens: options.max_tokens.max(1),
            stream,
        }
    }
}
