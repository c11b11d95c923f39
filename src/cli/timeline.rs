use crate::chat::Role;
use crate::cli::theme::Theme;
use crate::config::ThemeToken;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const USER_TAG: &str = "[user] ";
const BOT_TAG: &str = "[bot] ";
const COMMAND_PROMPT: &str = "cmd> ";
const WELCOME: &str = "Welcome to Multi-Model Chatbot. Ctrl-O picks a model, Ctrl-L clears the chat, /help lists commands.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimelineEntry {
    Message {
        role: Role,
        text: String,
        failed: bool,
    },
    Pending {
        model_id: &'static str,
    },
    Command(String),
    Notice {
        kind: NoticeKind,
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_message(&mut self, role: Role, text: &str) {
        self.entries.push(TimelineEntry::Message {
            role,
            text: text.to_string(),
            failed: false,
        });
    }

    /// Returns the index to hand back to [`Timeline::resolve_pending`].
    pub(crate) fn push_pending(&mut self, model_id: &'static str) -> usize {
        let index = self.entries.len();
        self.entries.push(TimelineEntry::Pending { model_id });
        index
    }

    pub(crate) fn resolve_pending(&mut self, index: usize, text: &str, failed: bool) {
        let message = TimelineEntry::Message {
            role: Role::Bot,
            text: text.to_string(),
            failed,
        };
        match self.entries.get_mut(index) {
            Some(entry @ TimelineEntry::Pending { .. }) => *entry = message,
            _ => self.entries.push(message),
        }
    }

    pub(crate) fn push_command(&mut self, line: &str) {
        self.entries.push(TimelineEntry::Command(line.to_string()));
    }

    pub(crate) fn push_notice(&mut self, kind: NoticeKind, text: &str) {
        self.entries.push(TimelineEntry::Notice {
            kind,
            text: text.to_string(),
        });
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Lays the transcript out for a region `width` columns wide.
    pub(crate) fn render_lines(&self, theme: &Theme, width: u16) -> Vec<Line<'static>> {
        let context = RenderContext {
            theme,
            width: usize::from(width.max(1)),
        };

        if self.entries.is_empty() {
            let mut lines = Vec::new();
            push_wrapped(
                &context,
                &mut lines,
                None,
                WELCOME,
                theme.style(ThemeToken::SystemInfo),
            );
            return lines;
        }

        let mut lines = Vec::new();
        for entry in &self.entries {
            widget_for_entry(entry).render(&context, &mut lines);
        }

        lines
    }
}

trait TimelineWidget {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>);
}

struct RenderContext<'a> {
    theme: &'a Theme,
    width: usize,
}

struct MessageWidget<'a> {
    role: Role,
    text: &'a str,
    failed: bool,
}

impl TimelineWidget for MessageWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        let (tag, tag_token, text_token) = match self.role {
            Role::User => (USER_TAG, ThemeToken::UserTag, ThemeToken::UserText),
            Role::Bot if self.failed => (BOT_TAG, ThemeToken::BotTag, ThemeToken::BotError),
            Role::Bot => (BOT_TAG, ThemeToken::BotTag, ThemeToken::BotText),
        };
        push_wrapped(
            context,
            lines,
            Some((tag, context.theme.style(tag_token))),
            self.text,
            context.theme.style(text_token),
        );
    }
}

struct PendingWidget {
    model_id: &'static str,
}

impl TimelineWidget for PendingWidget {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        push_wrapped(
            context,
            lines,
            Some((BOT_TAG, context.theme.style(ThemeToken::BotTag))),
            &format!("Thinking... ({})", self.model_id),
            context.theme.style(ThemeToken::BotWaiting),
        );
    }
}

struct CommandWidget<'a> {
    line: &'a str,
}

impl TimelineWidget for CommandWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        push_wrapped(
            context,
            lines,
            Some((
                COMMAND_PROMPT,
                context.theme.style(ThemeToken::CommandPrompt),
            )),
            self.line,
            context.theme.style(ThemeToken::UserText),
        );
    }
}

struct NoticeWidget<'a> {
    kind: NoticeKind,
    text: &'a str,
}

impl TimelineWidget for NoticeWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        let token = match self.kind {
            NoticeKind::Info => ThemeToken::SystemInfo,
            NoticeKind::Error => ThemeToken::SystemError,
        };
        push_wrapped(context, lines, None, self.text, context.theme.style(token));
    }
}

fn widget_for_entry(entry: &TimelineEntry) -> Box<dyn TimelineWidget + '_> {
    match entry {
        TimelineEntry::Message { role, text, failed } => Box::new(MessageWidget {
            role: *role,
            text,
            failed: *failed,
        }),
        TimelineEntry::Pending { model_id } => Box::new(PendingWidget {
            model_id: *model_id,
        }),
        TimelineEntry::Command(line) => Box::new(CommandWidget { line }),
        TimelineEntry::Notice { kind, text } => Box::new(NoticeWidget { kind: *kind, text }),
    }
}

/// Emits `text` wrapped to the context width. With a prefix, the first row
/// carries it and later rows are indented to line up under the text.
fn push_wrapped(
    context: &RenderContext<'_>,
    lines: &mut Vec<Line<'static>>,
    prefix: Option<(&str, Style)>,
    text: &str,
    style: Style,
) {
    let prefix_width = prefix.map_or(0, |(tag, _)| tag.width());
    let body_width = context.width.saturating_sub(prefix_width).max(1);
    let indent = " ".repeat(prefix_width);

    let mut first = true;
    for row in wrap_text(text, body_width) {
        let lead = match prefix {
            Some((tag, tag_style)) if first => Span::styled(tag.to_string(), tag_style),
            _ => Span::raw(indent.clone()),
        };
        first = false;

        if prefix.is_some() {
            lines.push(Line::from(vec![lead, Span::styled(row, style)]));
        } else {
            lines.push(Line::from(Span::styled(row, style)));
        }
    }
}

/// Splits on newlines, then hard-wraps each line at `width` terminal columns.
/// A glyph wider than `width` still gets a row of its own. An empty input
/// still yields one empty row so the entry stays visible.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();

    for line in text.split('\n') {
        let line = line.trim_end_matches('\r');
        let mut row = String::new();
        let mut used = 0;
        for ch in line.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if used + ch_width > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                used = 0;
            }
            row.push(ch);
            used += ch_width;
        }
        rows.push(row);
    }

    rows
}
