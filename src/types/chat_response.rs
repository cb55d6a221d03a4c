use serde::{Deserialize, Serialize};

/// A non-streaming completion response body.
///
/// Only the fields the client reads are modeled; the service sends more
/// (`id`, `object`, `usage`, ...) and serde skips them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatCompletionResponse {
    /// The completion choices; the first carries the assistant reply.
    pub choices: Vec<Choice>,
}

/// One completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Choice {
    /// The generated assistant message.
    pub message: ResponseMessage,
}

/// The assistant message inside a completion choice.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseMessage {
    /// The reply text.
    pub content: String,
}

/// A structured error body returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// The error payload.
    pub error: ApiErrorDetail,
}

/// Detail of a structured API error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiErrorDetail {
    /// Human-readable error message.
    pub message: String,
}

impl ChatCompletionResponse {
    /// Returns the first choice's reply text, if any choice is present.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|choice| choice.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn completion_deserialization() {
        let body = json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": "hello"},
                    "finish_reason": "stop"
                }
            ],
            "usage": {"prompt_tokens": 5, "completion_tokens": 1, "total_tokens": 6}
        });

        let response: ChatCompletionResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.content(), Some("hello"));
    }

    #[test]
    fn empty_choices() {
        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(response.content(), None);
    }

    #[test]
    fn error_deserialization() {
        let body = json!({
            "error": {
                "message": "Authentication Fails",
                "type": "authentication_error",
                "code": "invalid_request_error"
            }
        });

        let response: ErrorResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.error.message, "Authentication Fails");
    }
}
