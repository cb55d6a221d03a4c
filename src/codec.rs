//! Response extraction for the chat-completions wire format.
//!
//! Every failure mode funnels into the returned text so that display code
//! is uniform: the caller always gets a string, never a fault. Recovered
//! failures are distinguishable by a literal prefix (see [`is_error_reply`]).

use serde::Deserialize;

use crate::types::{ChatCompletionResponse, ErrorResponse};

/// Prefix on text recovered from a structured API error body.
pub const API_ERROR_PREFIX: &str = "API Error: ";

/// Prefix on text recovered from a well-formed body of unrecognized shape.
pub const INVALID_FORMAT_PREFIX: &str = "Error: Invalid response format";

/// Prefix on text recovered from a body that failed to parse as JSON.
pub const PARSE_ERROR_PREFIX: &str = "JSON parse error: ";

/// Prefix on text recovered from a transport-level failure.
pub const REQUEST_ERROR_PREFIX: &str = "Request error: ";

/// Extracts assistant text from a non-streaming response body.
///
/// - A completion shape (`choices[0].message.content`) yields that text.
/// - A structured error shape (`error.message`) yields an error-formatted
///   string; this is a recovered condition, not a fault.
/// - Any other JSON yields an error-formatted string embedding the raw body,
///   for diagnosability.
/// - A body that is not JSON at all yields an error-formatted string naming
///   the parse failure and embedding the raw body.
pub fn extract_text(body: &str) -> String {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(err) => return format!("{PARSE_ERROR_PREFIX}{err}\nResponse: {body}"),
    };

    if let Ok(response) = ChatCompletionResponse::deserialize(&value)
        && let Some(content) = response.content()
    {
        return content.to_string();
    }

    if let Ok(response) = ErrorResponse::deserialize(&value) {
        return format!("{API_ERROR_PREFIX}{}", response.error.message);
    }

    format!("{INVALID_FORMAT_PREFIX}\n{body}")
}

/// Formats a transport-level failure into the uniform error-text channel.
pub fn transport_error_text(err: impl std::fmt::Display) -> String {
    format!("{REQUEST_ERROR_PREFIX}{err}")
}

/// Returns true if `text` is an error-formatted reply rather than model
/// output.
///
/// Heuristic by construction: a model reply could start with one of these
/// prefixes. Callers that need a hard distinction should treat this as
/// advisory.
pub fn is_error_reply(text: &str) -> bool {
    text.starts_with(API_ERROR_PREFIX)
        || text.starts_with(INVALID_FORMAT_PREFIX)
        || text.starts_with(PARSE_ERROR_PREFIX)
        || text.starts_with(REQUEST_ERROR_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_completion_content() {
        let body = r#"{"choices":[{"message":{"content":"hello"}}]}"#;
        assert_eq!(extract_text(body), "hello");
    }

    #[test]
    fn extracts_completion_content_with_extra_fields() {
        let body = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "hi"}, "finish_reason": "stop"}
            ],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }"#;
        assert_eq!(extract_text(body), "hi");
    }

    #[test]
    fn recovers_api_error() {
        let body = r#"{"error":{"message":"bad key","type":"authentication_error"}}"#;
        let text = extract_text(body);
        assert_eq!(text, "API Error: bad key");
        assert!(text.contains("bad key"));
        assert!(is_error_reply(&text));
    }

    #[test]
    fn recovers_unrecognized_shape() {
        let body = r#"{"unexpected":"shape"}"#;
        let text = extract_text(body);
        assert!(text.starts_with(INVALID_FORMAT_PREFIX));
        assert!(text.contains(body));
        assert!(is_error_reply(&text));
    }

    #[test]
    fn recovers_parse_failure() {
        let body = "not json";
        let text = extract_text(body);
        assert!(text.starts_with(PARSE_ERROR_PREFIX));
        assert!(text.contains("not json"));
        assert!(is_error_reply(&text));
    }

    #[test]
    fn empty_choices_is_unrecognized() {
        // A choices array with no entries carries no reply; the raw body is
        // surfaced for diagnosability rather than returning empty text.
        let body = r#"{"choices":[]}"#;
        let text = extract_text(body);
        assert!(text.starts_with(INVALID_FORMAT_PREFIX));
    }

    #[test]
    fn transport_error_formatting() {
        let text = transport_error_text("connection refused");
        assert_eq!(text, "Request error: connection refused");
        assert!(is_error_reply(&text));
    }

    #[test]
    fn model_output_is_not_error_reply() {
        assert!(!is_error_reply("hello"));
        assert!(!is_error_reply(""));
    }
}
