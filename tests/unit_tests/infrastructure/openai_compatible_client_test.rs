use std::time::Duration;

use futures::StreamExt;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cleverbot::application::ports::{LlmClient, LlmClientError};
use cleverbot::infrastructure::llm::{AuthStyle, OpenAiCompatibleClient};

use super::stalling_server::serve_one_chunk_then_stall;

fn client(server: &MockServer, auth_style: AuthStyle) -> OpenAiCompatibleClient {
    OpenAiCompatibleClient::new(
        &format!("{}/v1", server.uri()),
        "test-key".to_string(),
        auth_style,
        "gpt-4o-mini".to_string(),
        256,
        0.5,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn given_chat_completion_when_completing_then_returns_first_choice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "Question?" }],
            "max_tokens": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "Profit is 60." } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client(&server, AuthStyle::Bearer)
        .complete("Question?")
        .await
        .unwrap();

    assert_eq!(answer, "Profit is 60.");
}

#[tokio::test]
async fn given_api_key_header_style_when_completing_then_sends_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = client(&server, AuthStyle::ApiKeyHeader)
        .complete("hi")
        .await
        .unwrap();

    assert_eq!(answer, "ok");
}

#[tokio::test]
async fn given_empty_choices_when_completing_then_returns_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let result = client(&server, AuthStyle::Bearer).complete("hi").await;

    assert!(matches!(result, Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_sse_body_when_streaming_then_yields_fragments_until_done_marker() {
    let server = MockServer::start().await;
    let body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Profit \"}}]}\n\n",
        ": keep-alive\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"is 60.\"}}]}\n\n",
        "data: [DONE]\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"ignored\"}}]}\n\n",
    );
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "stream": true })))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let fragments: Vec<String> = client(&server, AuthStyle::Bearer)
        .complete_stream("Q")
        .await
        .unwrap()
        .map(Result::unwrap)
        .collect()
        .await;

    assert_eq!(fragments, vec!["Profit ", "is 60."]);
}

#[tokio::test]
async fn given_unauthorized_when_streaming_then_fails_before_any_fragment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let result = client(&server, AuthStyle::Bearer).complete_stream("Q").await;

    assert!(matches!(
        result,
        Err(LlmClientError::ApiRequestFailed(message)) if message.contains("bad key")
    ));
}

#[tokio::test]
async fn given_stream_without_done_marker_when_streaming_then_ends_with_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "data: {\"choices\":[{\"delta\":{\"content\":\"The profit is\"}}]}\n\n",
        ))
        .mount(&server)
        .await;

    let items: Vec<Result<String, LlmClientError>> = client(&server, AuthStyle::Bearer)
        .complete_stream("Q")
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_ref().unwrap(), "The profit is");
    assert!(matches!(items[1], Err(LlmClientError::InvalidResponse(_))));
}

#[tokio::test]
async fn given_server_stalls_mid_body_when_streaming_then_yields_timeout() {
    let base_url = serve_one_chunk_then_stall(
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
    )
    .await;
    let client = OpenAiCompatibleClient::new(
        &base_url,
        "test-key".to_string(),
        AuthStyle::Bearer,
        "gpt-4o-mini".to_string(),
        256,
        0.5,
        Duration::from_millis(300),
    )
    .unwrap();

    let mut stream = client.complete_stream("Q").await.unwrap();

    assert_eq!(stream.next().await.unwrap().unwrap(), "Hel");
    let second = tokio::time::timeout(Duration::from_secs(5), stream.next())
        .await
        .expect("stream kept waiting past the client timeout");
    assert!(matches!(second, Some(Err(LlmClientError::Timeout))));
}
