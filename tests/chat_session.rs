//! End-to-end tests for the chat session against a local stub server.
//!
//! These tests stand up a plain TCP listener that speaks just enough
//! HTTP/1.1 to serve canned chat-completions responses, so the whole
//! request path (headers, body, codec, SSE decoding, history mutation)
//! is exercised without a network or an API key.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use pichat::{ChatSession, CompletionOptions, DeepSeek, Role};

/// A stub server that serves one canned response per connection, in order.
///
/// Returns the base URL to point the client at and a shared log of the
/// request bodies it received.
async fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server address");
    let bodies = Arc::new(Mutex::new(Vec::new()));
    let bodies_clone = bodies.clone();

    tokio::spawn(async move {
        for response in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let body = read_request(&mut socket).await;
            bodies_clone.lock().unwrap().push(body);
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}/"), bodies)
}

/// Reads one HTTP request and returns its body.
async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = socket.read(&mut buf).await.expect("read request");
        if n == 0 {
            break;
        }
        raw.extend_from_slice(&buf[..n]);
        if let Some(header_end) = find_header_end(&raw) {
            let headers = String::from_utf8_lossy(&raw[..header_end]).to_string();
            let content_length = headers
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())?
                })
                .unwrap_or(0);
            if raw.len() >= header_end + 4 + content_length {
                let body = &raw[header_end + 4..header_end + 4 + content_length];
                return String::from_utf8_lossy(body).to_string();
            }
        }
    }
    String::new()
}

fn find_header_end(raw: &[u8]) -> Option<usize> {
    raw.windows(4).position(|w| w == b"\r\n\r\n")
}

fn http_response(status: &str, content_type: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    )
}

fn json_response(body: &str) -> String {
    http_response("200 OK", "application/json", body)
}

fn session_against(base_url: &str) -> ChatSession {
    let client = DeepSeek::with_options(
        Some("sk-test".to_string()),
        Some(base_url.to_string()),
        Some(Duration::from_secs(5)),
    )
    .expect("client should build");
    ChatSession::new(client, CompletionOptions::new())
}

#[tokio::test]
async fn send_appends_two_turns_and_returns_reply() {
    let body = r#"{"choices":[{"message":{"role":"assistant","content":"hello!"}}]}"#;
    let (base_url, requests) = serve(vec![json_response(body)]).await;
    let mut session = session_against(&base_url);

    let reply = session.send("hi").await;
    assert_eq!(reply, "hello!");

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "hi");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "hello!");

    // The request carried the conversation and the non-streaming flag.
    let requests = requests.lock().unwrap();
    let request: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(request["model"], "deepseek-chat");
    assert_eq!(request["stream"], false);
    assert_eq!(request["messages"][0]["role"], "user");
    assert_eq!(request["messages"][0]["content"], "hi");
}

#[tokio::test]
async fn second_send_replays_full_history() {
    let first = r#"{"choices":[{"message":{"content":"one"}}]}"#;
    let second = r#"{"choices":[{"message":{"content":"two"}}]}"#;
    let (base_url, requests) = serve(vec![json_response(first), json_response(second)]).await;
    let mut session = session_against(&base_url);

    session.send("a").await;
    session.send("b").await;
    assert_eq!(session.message_count(), 4);

    let requests = requests.lock().unwrap();
    let request: serde_json::Value = serde_json::from_str(&requests[1]).unwrap();
    let messages = request["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["role"], "assistant");
    assert_eq!(messages[1]["content"], "one");
}

#[tokio::test]
async fn streaming_reply_matches_callback_concatenation() {
    let sse = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo!\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n",
        "data: [DONE]\n\n",
    );
    let response = http_response("200 OK", "text/event-stream", sse);
    let (base_url, _requests) = serve(vec![response]).await;
    let mut session = session_against(&base_url);

    let mut seen = String::new();
    let reply = session.send_streaming("hi", |chunk| seen.push_str(chunk)).await;

    assert_eq!(reply, "hello!");
    assert_eq!(seen, reply);

    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, "hello!");
}

#[tokio::test]
async fn streaming_request_sets_stream_flag() {
    let response = http_response("200 OK", "text/event-stream", "data: [DONE]\n\n");
    let (base_url, requests) = serve(vec![response]).await;
    let mut session = session_against(&base_url);

    let reply = session.send_streaming("hi", |_| {}).await;
    assert_eq!(reply, "");

    let requests = requests.lock().unwrap();
    let request: serde_json::Value = serde_json::from_str(&requests[0]).unwrap();
    assert_eq!(request["stream"], true);
}

#[tokio::test]
async fn api_error_body_becomes_error_text_and_enters_history() {
    let body = r#"{"error":{"message":"Insufficient Balance","type":"invalid_request_error"}}"#;
    let (base_url, _requests) =
        serve(vec![http_response("402 Payment Required", "application/json", body)]).await;
    let mut session = session_against(&base_url);

    let reply = session.send("hi").await;
    assert_eq!(reply, "API Error: Insufficient Balance");
    assert!(pichat::codec::is_error_reply(&reply));

    // Error text is stored as the assistant turn like any other reply.
    let history = session.history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[1].content, reply);
}

#[tokio::test]
async fn unparseable_body_becomes_parse_error_text() {
    let (base_url, _requests) =
        serve(vec![http_response("200 OK", "text/html", "<html>oops</html>")]).await;
    let mut session = session_against(&base_url);

    let reply = session.send("hi").await;
    assert!(reply.starts_with("JSON parse error: "), "got: {reply}");
    assert!(reply.contains("<html>oops</html>"));
    assert_eq!(session.message_count(), 2);
}

#[tokio::test]
async fn unexpected_shape_becomes_invalid_format_text() {
    let body = r#"{"id":"cmpl-1","object":"chat.completion"}"#;
    let (base_url, _requests) = serve(vec![json_response(body)]).await;
    let mut session = session_against(&base_url);

    let reply = session.send("hi").await;
    assert!(
        reply.starts_with("Error: Invalid response format"),
        "got: {reply}"
    );
    assert!(reply.contains(body));
}

#[tokio::test]
async fn rejected_stream_request_recovers_error_body() {
    let body = r#"{"error":{"message":"Model Not Exist"}}"#;
    let (base_url, _requests) =
        serve(vec![http_response("400 Bad Request", "application/json", body)]).await;
    let mut session = session_against(&base_url);

    let mut chunks = 0;
    let reply = session.send_streaming("hi", |_| chunks += 1).await;

    assert_eq!(reply, "API Error: Model Not Exist");
    assert_eq!(chunks, 0, "no content should reach the callback");
}
