use serde_json::Value;

use crate::core::types::{Fragment, PromptMessage};
use crate::providers::error::ProviderError;

use super::types::{ApiError, ChatCompletionChunk, ChatCompletionRequest, ChatMessage};

pub fn to_api_request(model: &str, messages: &[PromptMessage]) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: model.to_string(),
        messages: messages.iter().map(to_chat_message).collect(),
        stream: true,
        temperature: None,
        max_tokens: None,
    }
}

fn to_chat_message(message: &PromptMessage) -> ChatMessage {
    ChatMessage {
        role: message.role.as_str().to_string(),
        content: message.content.clone(),
    }
}

/// Decodes one `data:` payload of a chat completion stream.
///
/// Returns `Ok(None)` for chunks that carry no content (role announcements,
/// finish markers, empty strings).
pub fn parse_chunk(data: &str) -> Result<Option<Fragment>, ProviderError> {
    if let Ok(api_error) = serde_json::from_str::<ApiError>(data) {
        return Err(ProviderError::StreamError(api_error.error.message));
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_str(data).map_err(|e| ProviderError::ParseError(e.to_string()))?;

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok(None);
    };

    Ok(match choice.delta.content {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) if text.is_empty() => None,
        Some(Value::String(text)) => Some(Fragment::Text(text)),
        Some(other) => Some(Fragment::Structured(other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(delta: &str) -> String {
        format!(
            r#"{{"id":"cmpl-1","object":"chat.completion.chunk","created":1,"model":"open-mistral-7b","choices":[{{"index":0,"delta":{delta},"finish_reason":null}}]}}"#
        )
    }

    #[test]
    fn test_to_api_request() {
        let messages = vec![
            PromptMessage::assistant("Hello! How can I help you today?"),
            PromptMessage::user("Hi"),
        ];
        let request = to_api_request("open-mistral-7b", &messages);

        assert!(request.stream);
        assert_eq!(request.model, "open-mistral-7b");
        assert_eq!(request.messages[0].role, "assistant");
        assert_eq!(request.messages[1].content, "Hi");

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("temperature").is_none());
    }

    #[test]
    fn test_parse_text_delta() {
        let fragment = parse_chunk(&chunk(r#"{"content":"Hel"}"#)).unwrap();
        assert_eq!(fragment, Some(Fragment::Text("Hel".into())));
    }

    #[test]
    fn test_parse_role_only_delta() {
        let fragment = parse_chunk(&chunk(r#"{"role":"assistant","content":""}"#)).unwrap();
        assert!(fragment.is_none());

        let fragment = parse_chunk(&chunk(r#"{"content":null}"#)).unwrap();
        assert!(fragment.is_none());
    }

    #[test]
    fn test_parse_structured_delta() {
        let fragment = parse_chunk(&chunk(r#"{"content":[{"type":"text","text":"x"}]}"#)).unwrap();
        assert!(matches!(fragment, Some(Fragment::Structured(Value::Array(_)))));
    }

    #[test]
    fn test_parse_no_choices() {
        let fragment = parse_chunk(r#"{"id":"x","choices":[]}"#).unwrap();
        assert!(fragment.is_none());
    }

    #[test]
    fn test_parse_in_stream_error() {
        let err = parse_chunk(r#"{"error":{"message":"overloaded","type":"server_error"}}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "Stream error: overloaded");
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_chunk("not json").unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
    }
}
