use crate::llm::provider::{AssistantInput, LlmError, LlmProvider};
use crate::models::ModelOption;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Remote,
    Placeholder,
}

pub fn reply_source(model: ModelOption) -> ReplySource {
    if model.is_remote() {
        ReplySource::Remote
    } else {
        ReplySource::Placeholder
    }
}

pub fn placeholder_reply(model_id: &str) -> String {
    format!("*Demo response for `{model_id}`: (API not yet integrated)*")
}

/// One bot turn. `failed` only affects styling; the text is stored either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub failed: bool,
}

impl Reply {
    fn ok(text: String) -> Self {
        Self {
            text,
            failed: false,
        }
    }

    fn failed(err: &LlmError) -> Self {
        Self {
            text: describe_error(err),
            failed: true,
        }
    }
}

pub fn describe_error(err: &LlmError) -> String {
    match err {
        LlmError::HttpStatus { body, .. } => format!("❌ Error from Gemini API: {body}"),
        LlmError::Parse(_) | LlmError::EmptyResponse => {
            "❌ Error parsing Gemini response.".to_string()
        }
        LlmError::Transport(msg) => format!("❌ Error contacting Gemini API: {msg}"),
        LlmError::MissingApiKey => "❌ Gemini API key is not configured. Set GOOGLE_API_KEY or google_api_key in config.toml.".to_string(),
    }
}

pub struct Dispatcher<P> {
    remote: Option<P>,
}

impl<P: LlmProvider> Dispatcher<P> {
    pub fn new(remote: Option<P>) -> Self {
        Self { remote }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Only the current prompt is sent; earlier turns stay local.
    pub async fn reply(&self, model: ModelOption, prompt: &str) -> Reply {
        match reply_source(model) {
            ReplySource::Placeholder => Reply::ok(placeholder_reply(model.id)),
            ReplySource::Remote => {
                let Some(provider) = &self.remote else {
                    return Reply::failed(&LlmError::MissingApiKey);
                };

                match provider
                    .generate(AssistantInput {
                        user_message: prompt.to_string(),
                    })
                    .await
                {
                    Ok(output) => Reply::ok(output.text),
                    Err(err) => Reply::failed(&err),
                }
            }
        }
    }
}
