/// Identifier of the only model backed by a real remote call.
pub const GEMINI_PRO: &str = "gemini-pro";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelOption {
    pub label: &'static str,
    pub id: &'static str,
}

impl ModelOption {
    pub fn is_remote(&self) -> bool {
        self.id == GEMINI_PRO
    }
}

/// Picker order. The first entry is the startup default.
pub const MODEL_OPTIONS: [ModelOption; 8] = [
    ModelOption {
        label: "Gemini Pro (Google)",
        id: GEMINI_PRO,
    },
    ModelOption {
        label: "LLaMA 2 7B",
        id: "llama2-7b",
    },
    ModelOption {
        label: "LLaMA 2 13B",
        id: "llama2-13b",
    },
    ModelOption {
        label: "GPT-4 (OpenAI)",
        id: "gpt-4",
    },
    ModelOption {
        label: "Claude 3 Haiku (Anthropic)",
        id: "claude-3-haiku",
    },
    ModelOption {
        label: "Command R+",
        id: "command-r-plus",
    },
    ModelOption {
        label: "Mixtral 8x7B",
        id: "mixtral-8x7b",
    },
    ModelOption {
        label: "Phi-3 Mini",
        id: "phi-3-mini",
    },
];

pub fn default_model() -> ModelOption {
    MODEL_OPTIONS[0]
}

pub fn find_by_label(label: &str) -> Option<ModelOption> {
    MODEL_OPTIONS
        .iter()
        .copied()
        .find(|option| option.label == label)
}

pub fn find_by_id(id: &str) -> Option<ModelOption> {
    MODEL_OPTIONS.iter().copied().find(|option| option.id == id)
}

/// Accepts either an id or a display label, ignoring ASCII case.
pub fn resolve(name: &str) -> Option<ModelOption> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    MODEL_OPTIONS.iter().copied().find(|option| {
        option.id.eq_ignore_ascii_case(name) || option.label.eq_ignore_ascii_case(name)
    })
}

pub fn position(id: &str) -> Option<usize> {
    MODEL_OPTIONS.iter().position(|option| option.id == id)
}

pub fn available_ids() -> String {
    MODEL_OPTIONS
        .iter()
        .map(|option| option.id)
        .collect::<Vec<_>>()
        .join(", ")
}
