use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use super::error::Result;
use super::types::{FragmentStream, PromptMessage};

/// Producer of streamed chat completions.
///
/// `stream` receives the whole conversation in order and the session's
/// cancellation token. Implementations are expected to stop yielding once the
/// token fires; callers detach on cancellation and do not wait for that.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;
    fn model(&self) -> &str;
    async fn stream(
        &self,
        messages: Vec<PromptMessage>,
        cancel: CancellationToken,
    ) -> Result<FragmentStream>;
}
