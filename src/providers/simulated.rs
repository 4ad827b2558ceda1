use async_trait::async_trait;
use futures::{StreamExt, stream};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::error::Result;
use crate::core::llm::ChatModel;
use crate::core::types::{Fragment, FragmentStream, PromptMessage, Role};

pub const DEFAULT_WORD_DELAY: Duration = Duration::from_millis(60);

/// Offline stand-in for a hosted model. Replies with a canned markdown answer
/// one word at a time.
#[derive(Debug, Clone)]
pub struct SimulatedModel {
    delay: Duration,
}

impl SimulatedModel {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    #[must_use]
    pub fn reply_for(messages: &[PromptMessage]) -> String {
        let prompt = messages
            .iter()
            .rev()
            .find(|m| m.role == Role::User)
            .map_or("", |m| m.content.trim());

        format!(
            "This is a **simulated** reply to:\n\n> {prompt}\n\n\
             No request left this machine. Set `provider = \"mistral\"` and an API key \
             to talk to a real model."
        )
    }
}

impl Default for SimulatedModel {
    fn default() -> Self {
        Self::new(DEFAULT_WORD_DELAY)
    }
}

#[async_trait]
impl ChatModel for SimulatedModel {
    fn name(&self) -> &str {
        "simulated"
    }

    fn model(&self) -> &str {
        "canned"
    }

    async fn stream(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream> {
        let words: Vec<String> = Self::reply_for(&messages)
            .split_inclusive(' ')
            .map(String::from)
            .collect();
        let delay = self.delay;

        let fragments = stream::iter(words)
            .then(move |word| async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(Fragment::Text(word))
            })
            .take_until(cancel.cancelled_owned());

        Ok(Box::pin(fragments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_streams_whole_reply() {
        let model = SimulatedModel::new(Duration::ZERO);
        let messages = vec![PromptMessage::user("Hi there")];

        let text: String = model
            .stream(messages.clone(), CancellationToken::new())
            .await
            .unwrap()
            .map(|f| f.unwrap().as_text().unwrap_or_default().to_string())
            .collect::<Vec<_>>()
            .await
            .concat();

        assert_eq!(text, SimulatedModel::reply_for(&messages));
        assert!(text.contains("> Hi there"));
    }

    #[tokio::test]
    async fn test_stops_when_cancelled() {
        let model = SimulatedModel::new(Duration::from_millis(50));
        let token = CancellationToken::new();
        let mut stream = model
            .stream(vec![PromptMessage::user("x")], token.clone())
            .await
            .unwrap();

        assert!(stream.next().await.is_some());
        token.cancel();
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_reply_uses_latest_user_turn() {
        let messages = vec![
            PromptMessage::user("first"),
            PromptMessage::assistant("ok"),
            PromptMessage::user("second"),
        ];
        assert!(SimulatedModel::reply_for(&messages).contains("> second"));
    }
}
