use marketscout_core::error::ProviderError;
use marketscout_core::message::Message;
use marketscout_core::provider::{Provider, ProviderRequest, ToolChoice, ToolDefinition};
use marketscout_providers::OpenAiCompatProvider;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request_with_tools() -> ProviderRequest {
    ProviderRequest {
        model: "gpt-4o".into(),
        messages: vec![
            Message::system("You are a market research assistant."),
            Message::user("How big is the EV charger market?"),
        ],
        temperature: 0.7,
        max_tokens: Some(256),
        tools: vec![ToolDefinition {
            name: "search".into(),
            description: "Execute a search query".into(),
            parameters: json!({
                "type": "object",
                "properties": {"query": {"type": "string"}},
                "required": ["query"]
            }),
        }],
        tool_choice: ToolChoice::Required,
        response_format: None,
    }
}

#[tokio::test]
async fn completion_selects_a_tool() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "tool_choice": "required",
            "max_tokens": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "gpt-4o-2024-08-06",
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "search", "arguments": "{\"query\":\"EV charger market size\"}"}
                    }]
                }
            }],
            "usage": {"prompt_tokens": 42, "completion_tokens": 7, "total_tokens": 49}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("openai", server.uri(), "sk-test");
    let response = provider
        .complete(request_with_tools())
        .await
        .expect("completion should succeed");

    assert_eq!(response.model, "gpt-4o-2024-08-06");
    assert_eq!(response.tool_calls.len(), 1);
    assert_eq!(response.tool_calls[0].name, "search");
    assert_eq!(
        response.tool_calls[0].decode_arguments().unwrap()["query"],
        "EV charger market size"
    );
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("openai", server.uri(), "sk-wrong");
    let err = provider
        .complete(request_with_tools())
        .await
        .expect_err("401 should fail");

    assert!(matches!(err, ProviderError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAiCompatProvider::new("openai", server.uri(), "sk-test");
    let err = provider
        .complete(request_with_tools())
        .await
        .expect_err("500 should fail");

    assert!(matches!(
        err,
        ProviderError::ApiError { status_code: 500, ref message } if message == "oops"
    ));
}
