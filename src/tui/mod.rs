pub mod app;
pub mod events;
pub mod layout;
pub mod state;
pub mod widgets;

pub use app::TuiApp;
pub use events::TuiTranscriptObserver;

use crate::config::AppConfig;
use crate::core::error::Result;
use crate::core::{AutoscrollPolicy, ChatModel, StreamingController, TranscriptStore};
use std::sync::Arc;
use tokio::sync::mpsc;

pub async fn run_tui(config: &AppConfig, model: Arc<dyn ChatModel>) -> Result<()> {
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let transcript = TranscriptStore::with_greeting(config.greeting()).shared();
    transcript
        .lock()
        .subscribe(Arc::new(TuiTranscriptObserver::new(event_tx.clone())));

    let controller = StreamingController::new(model, transcript);
    let autoscroll = AutoscrollPolicy::with_threshold(config.scroll_threshold());

    let mut app = TuiApp::with_event_channels(controller, autoscroll, event_tx, event_rx)?;
    app.run().await
}
