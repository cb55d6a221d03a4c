//! Integration tests against the live DeepSeek API.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use pichat::{ChatSession, CompletionOptions, DeepSeek, Message};

    fn api_key() -> Option<String> {
        std::env::var("DEEPSEEK_API_KEY").ok()
    }

    #[tokio::test]
    async fn simple_completion() {
        let Some(key) = api_key() else {
            eprintln!("Skipping test: DEEPSEEK_API_KEY not set");
            return;
        };

        let client = DeepSeek::new(Some(key)).expect("Failed to create client");
        let reply = client
            .complete(
                &[Message::user("Say 'test passed'")],
                &CompletionOptions::new().with_max_tokens(16),
            )
            .await;

        assert!(
            !pichat::codec::is_error_reply(&reply),
            "expected model output, got: {reply}"
        );
        assert!(!reply.is_empty());
    }

    #[tokio::test]
    async fn streaming_completion() {
        let Some(key) = api_key() else {
            eprintln!("Skipping test: DEEPSEEK_API_KEY not set");
            return;
        };

        let client = DeepSeek::new(Some(key)).expect("Failed to create client");
        let mut seen = String::new();
        let reply = client
            .complete_streaming(
                &[Message::user("Count to 3")],
                &CompletionOptions::new().with_max_tokens(32),
                |chunk| seen.push_str(chunk),
            )
            .await;

        assert!(
            !pichat::codec::is_error_reply(&reply),
            "expected model output, got: {reply}"
        );
        assert_eq!(seen, reply);
    }

    #[tokio::test]
    async fn session_round_trip() {
        let Some(key) = api_key() else {
            eprintln!("Skipping test: DEEPSEEK_API_KEY not set");
            return;
        };

        let mut session = ChatSession::initialize(key).expect("Failed to create session");
        session.set_max_tokens(16);
        let reply = session.send("Say 'ok'").await;

        assert!(!reply.is_empty());
        assert_eq!(session.message_count(), 2);
    }
}
