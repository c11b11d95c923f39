//! Headless driver for the TUI, used by the integration tests.

use crate::chat::{ChatMessage, ChatSession, Role};
use crate::cli::app::{
    AppState, KeyAction, Regions, UiState, complete_turn, draw, handle_key, handle_mouse,
    layout_regions, submit_line,
};
use crate::config::ThemeConfig;
use crate::dispatch::Dispatcher;
use crate::http::client::HttpClient;
use crate::http::redact::HttpLogConfig;
use crate::llm::gemini::GeminiProvider;
use crate::models::{GEMINI_PRO, default_model};
use crate::trace::SessionTrace;
use anyhow::Result;
use crossterm::event::{KeyEvent, MouseEvent};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use std::env;
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiStateView {
    pub input: String,
    pub cursor: usize,
    pub timeline_scroll: usize,
    pub model_id: &'static str,
    pub picker_open: bool,
    pub picker_highlighted: usize,
    pub should_quit: bool,
}

pub struct UiHarness {
    terminal: Terminal<TestBackend>,
    state: AppState,
    ui: UiState,
}

impl UiHarness {
    pub fn new(width: u16, height: u16, state: AppState) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        let ui = UiState::new(&state, false);
        Ok(Self {
            terminal,
            state,
            ui,
        })
    }

    pub fn render(&mut self) -> Result<()> {
        let Self {
            terminal,
            state,
            ui,
        } = self;
        terminal.draw(|frame| draw(frame, state, ui))?;
        Ok(())
    }

    /// Mirrors one pass of the interactive loop, including the awaited reply.
    pub async fn send_key(&mut self, key: KeyEvent) -> Result<()> {
        if let KeyAction::Submit(line) = handle_key(&mut self.state, &mut self.ui, key) {
            if let Some(turn) = submit_line(&mut self.state, &mut self.ui, &line) {
                self.render()?;
                complete_turn(&mut self.state, &mut self.ui, turn).await;
            }
        }
        self.render()
    }

    pub fn send_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        handle_mouse(&mut self.ui, mouse);
        Ok(())
    }

    /// Adds a finished exchange without going through dispatch.
    pub fn seed_exchange(&mut self, user: &str, bot: &str) {
        self.state.session.push_user(user);
        self.state.session.push_bot(bot);
        self.ui.timeline.push_message(Role::User, user);
        self.ui.timeline.push_message(Role::Bot, bot);
    }

    pub fn regions(&self) -> Result<Regions> {
        let size = self.terminal.size()?;
        Ok(layout_regions(Rect::new(0, 0, size.width, size.height)))
    }

    pub fn buffer_lines(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        (area.y..area.y + area.height)
            .map(|y| {
                // Cells covered by a wide glyph are never redrawn, so skip them.
                let mut row = String::new();
                let mut covered = 0;
                for x in area.x..area.x + area.width {
                    let symbol = buffer.cell((x, y)).map_or(" ", |cell| cell.symbol());
                    if covered > 0 {
                        covered -= 1;
                        continue;
                    }
                    row.push_str(symbol);
                    covered = symbol.width().saturating_sub(1);
                }
                row
            })
            .collect()
    }

    pub fn line(&self, row: u16) -> Option<String> {
        self.buffer_lines().get(usize::from(row)).cloned()
    }

    pub fn ui_state_view(&self) -> UiStateView {
        UiStateView {
            input: self.ui.input.text().to_string(),
            cursor: self.ui.input.cursor(),
            timeline_scroll: self.ui.timeline_scroll,
            model_id: self.state.session.selected_model().id,
            picker_open: self.ui.picker.is_open(),
            picker_highlighted: self.ui.picker.highlighted(),
            should_quit: self.ui.should_quit,
        }
    }

    pub fn chat_history(&self) -> &[ChatMessage] {
        self.state.session.history()
    }

    pub fn trace_path(&self) -> PathBuf {
        self.state.trace.file_path().to_path_buf()
    }
}

/// No API key, default model selected, trace under the system temp dir.
pub fn deterministic_app_state(session_id: &str) -> Result<AppState> {
    let trace = SessionTrace::create_in_dir(session_id, &test_trace_dir())?;
    Ok(AppState {
        session_id: session_id.to_string(),
        session: ChatSession::new(default_model()),
        dispatcher: Dispatcher::new(None),
        theme_config: ThemeConfig::default(),
        trace,
        startup_notice: None,
    })
}

/// Like [`deterministic_app_state`] but with a live provider pointed at `base_url`.
pub fn app_state_with_gemini(session_id: &str, base_url: &str, api_key: &str) -> Result<AppState> {
    let mut state = deterministic_app_state(session_id)?;
    let http = HttpClient::new(reqwest::Client::new(), HttpLogConfig::default())
        .with_trace(state.trace.clone());
    let provider = GeminiProvider::new(
        http,
        Some(api_key.to_string()),
        GEMINI_PRO.to_string(),
        base_url.to_string(),
    )?;
    state.dispatcher = Dispatcher::new(Some(provider));
    Ok(state)
}

fn test_trace_dir() -> PathBuf {
    env::temp_dir().join("modelchat-test-traces")
}
