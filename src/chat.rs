use crate::models::ModelOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

/// In-memory chat state for one process. Nothing here outlives the session.
#[derive(Debug, Clone)]
pub struct ChatSession {
    history: Vec<ChatMessage>,
    selected: ModelOption,
}

impl ChatSession {
    pub fn new(selected: ModelOption) -> Self {
        Self {
            history: Vec::new(),
            selected,
        }
    }

    pub fn selected_model(&self) -> ModelOption {
        self.selected
    }

    pub fn select_model(&mut self, model: ModelOption) {
        self.selected = model;
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.push(Role::User, text.into());
    }

    pub fn push_bot(&mut self, text: impl Into<String>) {
        self.push(Role::Bot, text.into());
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Last `n` records, oldest first.
    pub fn tail(&self, n: usize) -> &[ChatMessage] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    fn push(&mut self, role: Role, text: String) {
        self.history.push(ChatMessage { role, text });
    }
}
