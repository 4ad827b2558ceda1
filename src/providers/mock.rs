use async_trait::async_trait;
use futures::stream;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::core::error::{ChatError, Result};
use crate::core::llm::ChatModel;
use crate::core::types::{Fragment, FragmentStream, PromptMessage};

#[derive(Debug, Clone)]
enum MockStep {
    Fragment(Fragment),
    Error(String),
}

/// Scripted reply for one `stream` call.
#[derive(Debug, Clone, Default)]
pub struct MockScript {
    open_error: Option<String>,
    steps: Vec<MockStep>,
    hang: bool,
    repeat: Option<(String, Duration)>,
}

impl MockScript {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text<I, S>(deltas: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        deltas
            .into_iter()
            .fold(Self::new(), |script, delta| script.then_text(delta))
    }

    /// `stream` itself fails before yielding anything.
    #[must_use]
    pub fn open_error(message: impl Into<String>) -> Self {
        Self {
            open_error: Some(message.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn then_text(mut self, delta: impl Into<String>) -> Self {
        self.steps.push(MockStep::Fragment(Fragment::Text(delta.into())));
        self
    }

    #[must_use]
    pub fn then_structured(mut self, value: serde_json::Value) -> Self {
        self.steps.push(MockStep::Fragment(Fragment::Structured(value)));
        self
    }

    #[must_use]
    pub fn then_error(mut self, message: impl Into<String>) -> Self {
        self.steps.push(MockStep::Error(message.into()));
        self
    }

    /// After the scripted steps, wait until cancelled and then fail the way an
    /// aborted HTTP request would.
    #[must_use]
    pub const fn then_hang(mut self) -> Self {
        self.hang = true;
        self
    }

    /// After the scripted steps, yield `delta` every `interval` forever. The
    /// stream ignores the cancellation token, like a producer that is slow to
    /// notice it.
    #[must_use]
    pub fn then_repeat(mut self, delta: impl Into<String>, interval: Duration) -> Self {
        self.repeat = Some((delta.into(), interval));
        self
    }

    fn into_stream(self, cancel: CancellationToken) -> FragmentStream {
        let items: Vec<Result<Fragment>> = self
            .steps
            .into_iter()
            .map(|step| match step {
                MockStep::Fragment(fragment) => Ok(fragment),
                MockStep::Error(message) => Err(ChatError::Provider(message)),
            })
            .collect();
        let head = stream::iter(items);

        if let Some((delta, interval)) = self.repeat {
            let tail = stream::unfold(delta, move |delta| async move {
                tokio::time::sleep(interval).await;
                Some((Ok(Fragment::Text(delta.clone())), delta))
            });
            return Box::pin(futures::StreamExt::chain(head, tail));
        }

        if self.hang {
            let tail = stream::once(async move {
                cancel.cancelled_owned().await;
                Err(ChatError::Provider("request aborted".to_string()))
            });
            Box::pin(futures::StreamExt::chain(head, tail))
        } else {
            Box::pin(head)
        }
    }
}

#[derive(Clone)]
pub struct MockModel {
    name: String,
    model: String,
    scripts: Arc<Mutex<Vec<MockScript>>>,
    request_history: Arc<Mutex<Vec<Vec<PromptMessage>>>>,
}

impl MockModel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "mock".to_string(),
            model: "mock-model".to_string(),
            scripts: Arc::new(Mutex::new(Vec::new())),
            request_history: Arc::new(Mutex::new(Vec::new())),
        }
    }

    #[must_use]
    pub fn with_script(self, script: MockScript) -> Self {
        self.scripts.lock().push(script);
        self
    }

    #[must_use]
    pub fn request_history(&self) -> Vec<Vec<PromptMessage>> {
        self.request_history.lock().clone()
    }

    #[must_use]
    pub fn request_count(&self) -> usize {
        self.request_history.lock().len()
    }

    fn next_script(&self) -> Result<MockScript> {
        let mut scripts = self.scripts.lock();
        if scripts.is_empty() {
            Err(ChatError::Provider(
                "MockModel: No scripts queued".to_string(),
            ))
        } else {
            Ok(scripts.remove(0))
        }
    }
}

impl Default for MockModel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatModel for MockModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn stream(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream> {
        self.request_history.lock().push(messages);

        let script = self.next_script()?;
        if let Some(message) = script.open_error {
            return Err(ChatError::Provider(message));
        }

        Ok(script.into_stream(cancel))
    }
}
