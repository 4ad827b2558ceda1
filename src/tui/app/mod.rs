mod render;
mod terminal;

use crate::core::error::Result;
use crate::core::{AutoscrollPolicy, StreamingController};
use crate::tui::events::{AppEvent, terminal_event_loop, tick_loop};
use crate::tui::layout::calculate_layout;
use crate::tui::state::AppState;
use crate::tui::widgets::{ChatWidget, InputAction, InputWidget};
use crossterm::ExecutableCommand;
use crossterm::event::{DisableBracketedPaste, DisableMouseCapture, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{LeaveAlternateScreen, disable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io;
use tokio::sync::mpsc;

use render::{StatusView, render_header, render_status};
use terminal::{restore_terminal, setup_terminal};

const PAGE_SCROLL: i16 = 10;

pub struct TuiApp {
    controller: StreamingController,
    provider_name: String,
    model_name: String,
    state: AppState,
    input_widget: InputWidget<'static>,
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TuiApp {
    pub(crate) fn with_event_channels(
        controller: StreamingController,
        autoscroll: AutoscrollPolicy,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
    ) -> Result<Self> {
        let terminal = setup_terminal()?;

        let provider_name = controller.model().name().to_string();
        let model_name = controller.model().model().to_string();

        Ok(Self {
            controller,
            provider_name,
            model_name,
            state: AppState::new(autoscroll),
            input_widget: InputWidget::new(),
            event_rx,
            event_tx,
            terminal,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let tx1 = self.event_tx.clone();
        let tx2 = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = terminal_event_loop(tx1).await {
                tracing::error!(error = %e, "terminal event loop stopped");
            }
        });

        tokio::spawn(async move {
            tick_loop(tx2).await;
        });

        while !self.state.should_quit {
            self.draw()?;

            match self.event_rx.recv().await {
                Some(event) => self.handle_event(event),
                None => break,
            }
        }

        self.controller.cancel();
        restore_terminal(&mut self.terminal)?;

        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let messages = self.controller.transcript().lock().snapshot();
        let streaming = self.controller.active_target();
        let input_lines = self.input_widget.line_count();
        self.input_widget.set_disabled(self.state.submitting);

        let status = StatusView {
            generating: self.state.submitting,
            elapsed: self.state.elapsed(),
            spinner_frame: self.state.spinner_frame,
            following: self.state.autoscroll.is_tracking(),
            last_outcome: self.state.last_outcome.as_ref(),
        };

        self.terminal.draw(|f| {
            let layout = calculate_layout(f.area(), input_lines);

            render_header(f, layout.header, &self.provider_name, &self.model_name);

            ChatWidget::new(&messages, &mut self.state.scroll)
                .streaming(streaming)
                .render(layout.chat, f.buffer_mut());

            self.input_widget.render(layout.input, f);

            render_status(f, layout.status, &status);
        })?;

        Ok(())
    }

    fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(key) => self.handle_key_input(key),
            AppEvent::Paste(text) => {
                let action = self.input_widget.handle_paste(text);
                self.handle_input_action(action);
            }
            AppEvent::MouseScroll(delta) => self.state.scroll_by(delta),
            AppEvent::Resize(_, _) | AppEvent::TranscriptChanged(_) => {
                self.state.on_transcript_changed();
            }
            AppEvent::Tick => self.state.tick(),
            AppEvent::StreamFinished(outcome) => {
                tracing::debug!(?outcome, "submission finished");
                self.state.finish_submission(outcome);
            }
        }
    }

    fn handle_key_input(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => {
                if self.state.submitting {
                    self.controller.cancel();
                } else if !self.input_widget.is_empty() {
                    self.input_widget.clear();
                } else {
                    self.state.should_quit = true;
                }
            }
            KeyCode::Char('d') if ctrl => {
                if self.input_widget.is_empty() && !self.state.submitting {
                    self.state.should_quit = true;
                }
            }
            KeyCode::Esc => {
                if self.state.submitting {
                    self.controller.cancel();
                }
            }
            KeyCode::PageUp => self.state.scroll_by(-PAGE_SCROLL),
            KeyCode::PageDown => self.state.scroll_by(PAGE_SCROLL),
            KeyCode::Home if ctrl => self.state.scroll_by(-i16::MAX),
            KeyCode::End if ctrl => self.state.jump_to_bottom(),
            _ => {
                let action = self.input_widget.handle_key(key);
                self.handle_input_action(action);
            }
        }
    }

    fn handle_input_action(&mut self, action: InputAction) {
        match action {
            InputAction::Continue | InputAction::Clear => {}
            InputAction::Submit(text) => self.submit(text),
        }
    }

    fn submit(&mut self, text: String) {
        self.state.start_submission();

        let controller = self.controller.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = controller.submit(&text).await;
            let _ = tx.send(AppEvent::StreamFinished(outcome));
        });
    }
}

impl Drop for TuiApp {
    fn drop(&mut self) {
        let _ = self.terminal.backend_mut().execute(DisableMouseCapture);
        let _ = self.terminal.backend_mut().execute(DisableBracketedPaste);
        let _ = disable_raw_mode();
        let _ = self.terminal.backend_mut().execute(LeaveAlternateScreen);
    }
}
