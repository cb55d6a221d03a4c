//! HTTP client for the DeepSeek chat-completions endpoint.
//!
//! Completion calls never fail: transport, protocol, and parse errors are
//! all recovered into error-formatted response text so that display code is
//! uniform (see [`crate::codec`]). Construction is where real errors live —
//! a missing API key or an unbuildable HTTP client is an [`Error`].

use std::env;
use std::time::Duration;

use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, header};

use crate::codec;
use crate::error::{Error, Result};
use crate::observability::{CLIENT_REQUEST_ERRORS, CLIENT_REQUESTS};
use crate::sse::process_sse;
use crate::types::{ChatCompletionRequest, CompletionOptions, Message};

const DEFAULT_API_URL: &str = "https://api.deepseek.com/v1/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the DeepSeek chat-completions API.
#[derive(Debug, Clone)]
pub struct DeepSeek {
    api_key: String,
    client: ReqwestClient,
    base_url: String,
}

impl DeepSeek {
    /// Create a new DeepSeek client.
    ///
    /// The API key can be provided directly or read from the DEEPSEEK_API_KEY
    /// environment variable.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    ///
    /// `base_url` must end in a trailing slash; `timeout` bounds the whole
    /// request, and a timed-out call surfaces through the same error-text
    /// channel as every other transport failure.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var("DEEPSEEK_API_KEY").map_err(|_| {
                Error::authentication(
                    "API key not provided and DEEPSEEK_API_KEY environment variable not set",
                )
            })?,
        };

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        })
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|e| Error::validation(format!("API key is not a valid header: {e}"), None))?;
        headers.insert(header::AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Request a non-streaming completion for the given conversation.
    ///
    /// Returns the assistant reply text, or error-formatted text on any
    /// failure. Blocking with respect to the caller; no retry.
    pub async fn complete(&self, messages: &[Message], options: &CompletionOptions) -> String {
        CLIENT_REQUESTS.click();
        let request = ChatCompletionRequest::new(messages, options, false);
        let url = format!("{}chat/completions", self.base_url);

        let headers = match self.default_headers() {
            Ok(headers) => headers,
            Err(e) => {
                CLIENT_REQUEST_ERRORS.click();
                return codec::transport_error_text(e);
            }
        };

        let response = match self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                CLIENT_REQUEST_ERRORS.click();
                return codec::transport_error_text(e);
            }
        };

        // Error statuses carry a structured error body; the codec turns
        // either shape into text, so no status branch is needed here.
        match response.text().await {
            Ok(body) => codec::extract_text(&body),
            Err(e) => {
                CLIENT_REQUEST_ERRORS.click();
                codec::transport_error_text(e)
            }
        }
    }

    /// Request a streaming completion for the given conversation.
    ///
    /// `on_chunk` is invoked for each content fragment, in arrival order,
    /// strictly before this call returns. The return value is the
    /// concatenation of every fragment delivered to the callback, or
    /// error-formatted text if the exchange failed before any frame could
    /// be processed.
    pub async fn complete_streaming<F>(
        &self,
        messages: &[Message],
        options: &CompletionOptions,
        mut on_chunk: F,
    ) -> String
    where
        F: FnMut(&str),
    {
        CLIENT_REQUESTS.click();
        let request = ChatCompletionRequest::new(messages, options, true);
        let url = format!("{}chat/completions", self.base_url);

        let mut headers = match self.default_headers() {
            Ok(headers) => headers,
            Err(e) => {
                CLIENT_REQUEST_ERRORS.click();
                return codec::transport_error_text(e);
            }
        };
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        let response = match self
            .client
            .post(&url)
            .headers(headers)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                CLIENT_REQUEST_ERRORS.click();
                return codec::transport_error_text(e);
            }
        };

        // A rejected stream request comes back as a plain JSON error body,
        // not SSE frames; recover it through the non-streaming codec path.
        if !response.status().is_success() {
            CLIENT_REQUEST_ERRORS.click();
            return match response.text().await {
                Ok(body) => codec::extract_text(&body),
                Err(e) => codec::transport_error_text(e),
            };
        }

        let mut chunk_stream = Box::pin(process_sse(response.bytes_stream()));
        let mut full_response = String::new();

        while let Some(item) = chunk_stream.next().await {
            match item {
                Ok(chunk) => {
                    if let Some(content) = chunk.content() {
                        full_response.push_str(content);
                        on_chunk(content);
                    }
                }
                Err(e) => {
                    // A transport fault mid-stream discards the partial
                    // reply and reports through the uniform text channel.
                    CLIENT_REQUEST_ERRORS.click();
                    return codec::transport_error_text(e);
                }
            }
        }

        full_response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = DeepSeek::new(Some("test-key".to_string())).unwrap();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_API_URL);

        let client = DeepSeek::with_options(
            Some("test-key".to_string()),
            Some("https://custom-api.example.com/".to_string()),
            Some(Duration::from_secs(30)),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://custom-api.example.com/");
    }

    #[test]
    fn bearer_header() {
        let client = DeepSeek::new(Some("sk-abc".to_string())).unwrap();
        let headers = client.default_headers().unwrap();
        assert_eq!(
            headers.get(header::AUTHORIZATION).unwrap(),
            "Bearer sk-abc"
        );
        assert_eq!(
            headers.get(header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
    }

    #[tokio::test]
    async fn connection_failure_is_recovered_as_text() {
        // Nothing listens on this port; the failure must come back as
        // error-formatted text, not a panic or an Err.
        let client = DeepSeek::with_options(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:1/".to_string()),
            Some(Duration::from_secs(5)),
        )
        .unwrap();

        let reply = client
            .complete(&[Message::user("hi")], &CompletionOptions::new())
            .await;
        assert!(crate::codec::is_error_reply(&reply), "got: {reply}");
    }
}
