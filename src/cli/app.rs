use crate::chat::{ChatSession, Role};
use crate::cli::commands::{Command, HELP_TEXT, is_command_line, parse_command};
use crate::cli::input::{InputBuffer, InputHistory};
use crate::cli::picker::ModelPicker;
use crate::cli::theme::Theme;
use crate::cli::timeline::{NoticeKind, Timeline};
use crate::config::{ThemeConfig, ThemeToken, parse_model};
use crate::dispatch::Dispatcher;
use crate::llm::gemini::GeminiProvider;
use crate::models::{MODEL_OPTIONS, ModelOption};
use crate::trace::SessionTrace;
use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph};
use std::io;
use std::time::Duration;

const APP_TITLE: &str = "Multi-Model Chatbot";
const MOUSE_SCROLL_STEP: usize = 3;
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(200);

pub struct AppState {
    pub session_id: String,
    pub session: ChatSession,
    pub dispatcher: Dispatcher<GeminiProvider>,
    pub theme_config: ThemeConfig,
    pub trace: SessionTrace,
    pub startup_notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub title: Rect,
    pub timeline: Rect,
    pub input: Rect,
    pub status: Rect,
}

pub fn layout_regions(area: Rect) -> Regions {
    let [title, timeline, input, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);

    Regions {
        title,
        timeline,
        input,
        status,
    }
}

pub(crate) struct UiState {
    pub(crate) timeline: Timeline,
    pub(crate) input: InputBuffer,
    pub(crate) history: InputHistory,
    pub(crate) picker: ModelPicker,
    /// Rows scrolled up from the newest line; 0 follows the tail.
    pub(crate) timeline_scroll: usize,
    timeline_max_scroll: usize,
    timeline_height: usize,
    last_area: Rect,
    pub(crate) should_quit: bool,
    pub(crate) theme: Theme,
}

impl UiState {
    pub(crate) fn new(state: &AppState, color: bool) -> Self {
        let mut timeline = Timeline::new();
        if let Some(notice) = &state.startup_notice {
            timeline.push_notice(NoticeKind::Info, notice);
        }

        Self {
            timeline,
            input: InputBuffer::default(),
            history: InputHistory::default(),
            picker: ModelPicker::default(),
            timeline_scroll: 0,
            timeline_max_scroll: 0,
            timeline_height: 0,
            last_area: Rect::default(),
            should_quit: false,
            theme: Theme::from_config(color, &state.theme_config),
        }
    }

    fn scroll_up(&mut self, rows: usize) {
        self.timeline_scroll = (self.timeline_scroll + rows).min(self.timeline_max_scroll);
    }

    fn scroll_down(&mut self, rows: usize) {
        self.timeline_scroll = self.timeline_scroll.saturating_sub(rows);
    }

    fn page_rows(&self) -> usize {
        self.timeline_height.saturating_sub(1).max(1)
    }

    fn notice(&mut self, trace: &SessionTrace, kind: NoticeKind, text: &str) {
        match kind {
            NoticeKind::Info => trace.log_info(text),
            NoticeKind::Error => trace.log_error(text),
        }
        self.timeline.push_notice(kind, text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum KeyAction {
    None,
    Submit(String),
    Quit,
}

/// A chat line accepted for dispatch. The timeline already shows it as pending.
#[derive(Debug, Clone)]
pub(crate) struct PendingTurn {
    index: usize,
    model: ModelOption,
    prompt: String,
}

pub(crate) fn handle_key(state: &mut AppState, ui: &mut UiState, key: KeyEvent) -> KeyAction {
    if key.kind != KeyEventKind::Press {
        return KeyAction::None;
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('d')) {
        ui.should_quit = true;
        return KeyAction::Quit;
    }

    if ui.picker.is_open() {
        match key.code {
            KeyCode::Up => ui.picker.move_up(),
            KeyCode::Down => ui.picker.move_down(),
            KeyCode::Enter => {
                let model = ui.picker.confirm();
                apply_model(state, ui, model);
            }
            KeyCode::Esc => ui.picker.close(),
            _ => {}
        }
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('o') if ctrl => ui.picker.open(state.session.selected_model()),
        KeyCode::F(2) => ui.picker.open(state.session.selected_model()),
        KeyCode::Char('l') if ctrl => clear_chat(state, ui),
        KeyCode::Enter => {
            if ui.input.is_blank() {
                ui.input.take();
                return KeyAction::None;
            }
            let line = ui.input.take();
            ui.history.push(&line);
            return KeyAction::Submit(line);
        }
        KeyCode::Up => {
            let current = ui.input.text().to_string();
            if let Some(previous) = ui.history.previous(&current) {
                let previous = previous.to_string();
                ui.input.set(&previous);
            }
        }
        KeyCode::Down => {
            if let Some(next) = ui.history.next() {
                let next = next.to_string();
                ui.input.set(&next);
            }
        }
        KeyCode::PageUp => {
            let rows = ui.page_rows();
            ui.scroll_up(rows);
        }
        KeyCode::PageDown => {
            let rows = ui.page_rows();
            ui.scroll_down(rows);
        }
        KeyCode::Left => ui.input.move_left(),
        KeyCode::Right => ui.input.move_right(),
        KeyCode::Home => ui.input.move_home(),
        KeyCode::End => ui.input.move_end(),
        KeyCode::Backspace => ui.input.backspace(),
        KeyCode::Delete => ui.input.delete(),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            ui.input.insert(ch);
        }
        _ => {}
    }

    KeyAction::None
}

pub(crate) fn handle_mouse(ui: &mut UiState, mouse: MouseEvent) {
    let regions = layout_regions(ui.last_area);
    if !regions
        .timeline
        .contains(Position::new(mouse.column, mouse.row))
    {
        return;
    }

    match mouse.kind {
        MouseEventKind::ScrollUp => ui.scroll_up(MOUSE_SCROLL_STEP),
        MouseEventKind::ScrollDown => ui.scroll_down(MOUSE_SCROLL_STEP),
        _ => {}
    }
}

/// Handles a submitted line. Commands finish here; chat lines come back as a
/// [`PendingTurn`] for [`complete_turn`].
pub(crate) fn submit_line(state: &mut AppState, ui: &mut UiState, line: &str) -> Option<PendingTurn> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    ui.timeline_scroll = 0;

    if is_command_line(trimmed) {
        ui.timeline.push_command(trimmed);
        state.trace.log_command(trimmed);
        match parse_command(trimmed) {
            Ok(command) => run_command(state, ui, command),
            Err(err) => ui.notice(&state.trace, NoticeKind::Error, err.message()),
        }
        return None;
    }

    let model = state.session.selected_model();
    state.session.push_user(line);
    state.trace.log_message(Role::User, line);
    ui.timeline.push_message(Role::User, line);
    let index = ui.timeline.push_pending(model.id);

    Some(PendingTurn {
        index,
        model,
        prompt: line.to_string(),
    })
}

pub(crate) async fn complete_turn(state: &mut AppState, ui: &mut UiState, turn: PendingTurn) {
    let reply = state.dispatcher.reply(turn.model, &turn.prompt).await;
    state.session.push_bot(reply.text.clone());
    state.trace.log_message(Role::Bot, &reply.text);
    ui.timeline
        .resolve_pending(turn.index, &reply.text, reply.failed);
}

fn run_command(state: &mut AppState, ui: &mut UiState, command: Command) {
    match command {
        Command::Help => ui.notice(&state.trace, NoticeKind::Info, HELP_TEXT),
        Command::Models => {
            let listing = models_listing(state.session.selected_model());
            ui.notice(&state.trace, NoticeKind::Info, &listing);
        }
        Command::Model(None) => {
            let model = state.session.selected_model();
            ui.notice(
                &state.trace,
                NoticeKind::Info,
                &format!("Current model: {} [{}]", model.label, model.id),
            );
        }
        Command::Model(Some(name)) => match parse_model(&name) {
            Ok(model) => apply_model(state, ui, model),
            Err(reason) => ui.notice(&state.trace, NoticeKind::Error, &reason),
        },
        Command::Clear => clear_chat(state, ui),
        Command::History(limit) => {
            let messages = match limit {
                Some(n) => state.session.tail(n),
                None => state.session.history(),
            };
            if messages.is_empty() {
                ui.notice(&state.trace, NoticeKind::Info, "Chat history is empty.");
            } else {
                let text = messages
                    .iter()
                    .map(|message| format!("{}: {}", message.role.as_str(), message.text))
                    .collect::<Vec<_>>()
                    .join("\n");
                ui.notice(&state.trace, NoticeKind::Info, &text);
            }
        }
        Command::Trace => {
            let text = format!("Trace file: {}", state.trace.file_path().display());
            ui.notice(&state.trace, NoticeKind::Info, &text);
        }
        Command::Quit => ui.should_quit = true,
    }
}

fn models_listing(current: ModelOption) -> String {
    MODEL_OPTIONS
        .iter()
        .map(|model| {
            let marker = if *model == current { '*' } else { ' ' };
            let mode = if model.is_remote() { "live" } else { "demo" };
            format!("{marker} {} [{}] ({mode})", model.label, model.id)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn apply_model(state: &mut AppState, ui: &mut UiState, model: ModelOption) {
    state.session.select_model(model);
    state.trace.log_model_selected(model);
    ui.timeline.push_notice(
        NoticeKind::Info,
        &format!("Switched to {} ({})", model.label, model.id),
    );
    if model.is_remote() && !state.dispatcher.has_remote() {
        ui.notice(
            &state.trace,
            NoticeKind::Error,
            "Gemini API key is not configured; replies will report the missing key.",
        );
    }
}

fn clear_chat(state: &mut AppState, ui: &mut UiState) {
    let dropped = state.session.len();
    state.session.clear();
    state.trace.log_clear(dropped);
    ui.timeline.clear();
    ui.timeline_scroll = 0;
}

pub(crate) fn status_text(state: &AppState) -> String {
    let model = state.session.selected_model();
    let mode = match (model.is_remote(), state.dispatcher.has_remote()) {
        (false, _) => "demo",
        (true, true) => "live",
        (true, false) => "live (no key)",
    };
    format!(
        "Model: {} [{}] | {mode} | Messages: {} | Ctrl-O model | Ctrl-L clear | /help | Session: {}",
        model.label,
        model.id,
        state.session.len(),
        state.session_id
    )
}

pub(crate) fn draw(frame: &mut Frame<'_>, state: &AppState, ui: &mut UiState) {
    let area = frame.area();
    ui.last_area = area;
    let regions = layout_regions(area);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            APP_TITLE,
            ui.theme.style(ThemeToken::Title),
        )))
        .alignment(Alignment::Center),
        regions.title,
    );

    draw_timeline(frame, ui, regions.timeline);
    draw_input(frame, ui, regions.input);

    frame.render_widget(
        Paragraph::new(status_text(state)).style(ui.theme.style(ThemeToken::Status)),
        regions.status,
    );

    if ui.picker.is_open() {
        draw_picker(frame, ui, regions.timeline);
    }
}

fn draw_timeline(frame: &mut Frame<'_>, ui: &mut UiState, area: Rect) {
    let lines = ui.timeline.render_lines(&ui.theme, area.width);
    let height = usize::from(area.height);
    let max_scroll = lines.len().saturating_sub(height);

    ui.timeline_height = height;
    ui.timeline_max_scroll = max_scroll;
    ui.timeline_scroll = ui.timeline_scroll.min(max_scroll);

    let top = u16::try_from(max_scroll - ui.timeline_scroll).unwrap_or(u16::MAX);
    frame.render_widget(Paragraph::new(lines).scroll((top, 0)), area);
}

fn draw_input(frame: &mut Frame<'_>, ui: &UiState, area: Rect) {
    let block = Block::bordered()
        .title(" Message ")
        .style(ui.theme.style(ThemeToken::InputBlock));
    let inner = block.inner(area);
    let (shown, column) = ui.input.window(usize::from(inner.width));

    frame.render_widget(Paragraph::new(shown).block(block), area);

    if !ui.picker.is_open() && inner.width > 0 && inner.height > 0 {
        let column = u16::try_from(column).unwrap_or(0);
        frame.set_cursor_position(Position::new(inner.x + column, inner.y));
    }
}

fn draw_picker(frame: &mut Frame<'_>, ui: &UiState, area: Rect) {
    let widest = MODEL_OPTIONS
        .iter()
        .map(|model| model.label.chars().count() + model.id.chars().count() + 3)
        .max()
        .unwrap_or(0);
    let width = u16::try_from(widest + 6).unwrap_or(u16::MAX).min(area.width);
    let height = u16::try_from(MODEL_OPTIONS.len() + 2)
        .unwrap_or(u16::MAX)
        .min(area.height);
    let overlay = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let items: Vec<ListItem<'static>> = MODEL_OPTIONS
        .iter()
        .map(|model| ListItem::new(format!("{} [{}]", model.label, model.id)))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title(" Select model (Enter/Esc) "))
        .highlight_style(ui.theme.style(ThemeToken::PickerHighlight))
        .highlight_symbol("> ");
    let mut list_state = ListState::default().with_selected(Some(ui.picker.highlighted()));

    frame.render_widget(Clear, overlay);
    frame.render_stateful_widget(list, overlay, &mut list_state);
}

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none_or(|value| value.is_empty())
}

pub async fn run_tui(mut state: AppState) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    if let Err(err) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
        let _ = disable_raw_mode();
        return Err(err.into());
    }

    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    let mut ui = UiState::new(&state, color_enabled());
    let result = event_loop(&mut terminal, &mut state, &mut ui).await;

    let _ = disable_raw_mode();
    let _ = execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    );
    let _ = terminal.show_cursor();
    state.trace.log_info("session closed");

    result
}

async fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    state: &mut AppState,
    ui: &mut UiState,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw(frame, state, ui))?;
        if ui.should_quit {
            return Ok(());
        }

        if !event::poll(EVENT_POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            Event::Key(key) => match handle_key(state, ui, key) {
                KeyAction::Submit(line) => {
                    if let Some(turn) = submit_line(state, ui, &line) {
                        terminal.draw(|frame| draw(frame, state, ui))?;
                        complete_turn(state, ui, turn).await;
                    }
                }
                KeyAction::Quit => return Ok(()),
                KeyAction::None => {}
            },
            Event::Mouse(mouse) => handle_mouse(ui, mouse),
            _ => {}
        }
    }
}
