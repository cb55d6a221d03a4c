//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use std::path::PathBuf;

use arrrg_derive::CommandLine;

use crate::types::{KnownModel, Model};

/// Default maximum tokens per response.
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature.
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Command-line arguments for the pichat-chat tool.
///
/// The temperature is carried as a string here because the arrrg derive
/// requires `Eq` on the whole struct; it is parsed when resolving into
/// [`ChatConfig`].
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: deepseek-chat)", "MODEL")]
    pub model: Option<String>,

    /// Sampling temperature.
    #[arrrg(optional, "Sampling temperature 0.0-2.0 (default: 0.7)", "TEMP")]
    pub temperature: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: 1000)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable streaming responses.
    #[arrrg(flag, "Disable streaming; print whole replies at once")]
    pub no_stream: bool,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,

    /// Use a config file other than ~/.pichat/config.yaml.
    #[arrrg(optional, "Path to the config file", "PATH")]
    pub config_path: Option<String>,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// Sampling temperature.
    pub temperature: f32,

    /// Maximum tokens per response.
    pub max_tokens: u32,

    /// Whether replies stream token by token.
    pub streaming: bool,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional override for the config file location.
    pub config_path: Option<PathBuf>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: deepseek-chat
    /// - Temperature: 0.7
    /// - Max tokens: 1000
    /// - Streaming: enabled
    /// - Color: enabled
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::DeepseekChat),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            streaming: true,
            use_color: true,
            config_path: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the maximum tokens per response.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Disables streaming output.
    pub fn without_streaming(mut self) -> Self {
        self.streaming = false;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or(Model::Known(KnownModel::DeepseekChat));

        // An unparseable temperature falls back to the default; range
        // clamping happens when the options are built.
        let temperature = args
            .temperature
            .and_then(|s| s.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        ChatConfig {
            model,
            temperature,
            max_tokens: args.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            streaming: !args.no_stream,
            use_color: !args.no_color,
            config_path: args.config_path.map(PathBuf::from),
        }
    }
}
