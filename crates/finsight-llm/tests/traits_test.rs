use async_trait::async_trait;
use finsight_llm::{ChatClient, ChatOptions, ChatRequest, ChatResponse, Message};

struct EchoClient;

#[async_trait]
impl ChatClient for EchoClient {
    async fn chat(&self, request: ChatRequest) -> anyhow::Result<ChatResponse> {
        let last = request
            .messages
            .last()
            .map(|m| m.content().as_text())
            .unwrap_or_default();
        Ok(ChatResponse::text(last))
    }
}

#[test]
fn test_chat_request_with_options() {
    let options = ChatOptions::new().temperature(0.7).max_tokens(100);
    let request = ChatRequest::new("gpt-4o", vec![Message::human("Hello")]).with_options(options);

    assert_eq!(request.model, "gpt-4o");
    assert_eq!(request.messages.len(), 1);
    assert_eq!(request.options.temperature, Some(0.7));
    assert_eq!(request.options.max_tokens, Some(100));
}

#[test]
fn test_chat_options_default() {
    let options = ChatOptions::default();
    assert_eq!(options.temperature, None);
    assert_eq!(options.max_tokens, None);
}

#[tokio::test]
async fn test_client_usable_as_trait_object() {
    let client: std::sync::Arc<dyn ChatClient> = std::sync::Arc::new(EchoClient);
    let response = client
        .chat(ChatRequest::new("any", vec![Message::human("ping")]))
        .await
        .unwrap();

    assert_eq!(response.content_or_empty(), "ping");
}
