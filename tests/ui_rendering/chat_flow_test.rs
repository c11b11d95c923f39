use anyhow::Result;
use modelchat::chat::Role;
use std::fs;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::ui_rendering::common::{
    new_gemini_harness, new_harness, press_ctrl, press_down, press_up, select_model, submit_line,
    timeline_snapshot,
};

#[tokio::test]
async fn demo_model_replies_with_placeholder() -> Result<()> {
    let mut harness = new_harness("flow-demo", 100, 24)?;

    select_model(&mut harness, "llama2-7b").await?;
    submit_line(&mut harness, "hello there").await?;

    let history = harness.chat_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].text, "hello there");
    assert_eq!(history[1].role, Role::Bot);
    assert_eq!(
        history[1].text,
        "*Demo response for `llama2-7b`: (API not yet integrated)*"
    );

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("[user] hello there"));
    assert!(timeline.contains("[bot] *Demo response for `llama2-7b`: (API not yet integrated)*"));
    assert!(!timeline.contains("Thinking..."));

    Ok(())
}

#[tokio::test]
async fn leading_indentation_is_kept_in_the_stored_message() -> Result<()> {
    let mut harness = new_harness("flow-indent", 100, 24)?;

    select_model(&mut harness, "gpt-4").await?;
    submit_line(&mut harness, "    fn main() {}").await?;

    let history = harness.chat_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].text, "    fn main() {}");
    assert!(timeline_snapshot(&harness)?.contains("[user]     fn main() {}"));

    let trace = fs::read_to_string(harness.trace_path())?;
    assert!(trace.contains("    fn main() {}"), "trace content:\n{trace}");
    Ok(())
}

#[tokio::test]
async fn gemini_without_key_reports_missing_configuration() -> Result<()> {
    let mut harness = new_harness("flow-no-key", 100, 24)?;

    submit_line(&mut harness, "hello").await?;

    let history = harness.chat_history();
    assert_eq!(history.len(), 2);
    assert!(history[1].text.contains("Gemini API key is not configured"));
    Ok(())
}

#[tokio::test]
async fn gemini_reply_comes_from_the_api() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("key", "test-key"))
        .and(body_json(serde_json::json!({
            "contents": [{"parts": [{"text": "what is rust?"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "A systems language."}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = new_gemini_harness("flow-gemini-ok", &server.uri())?;
    submit_line(&mut harness, "what is rust?").await?;

    let history = harness.chat_history();
    assert_eq!(history[1].text, "A systems language.");
    assert!(timeline_snapshot(&harness)?.contains("[bot] A systems language."));

    let trace = fs::read_to_string(harness.trace_path())?;
    assert!(trace.contains("what is rust?"));
    assert!(trace.contains("A systems language."));
    assert!(trace.contains("REDACTED"));
    assert!(!trace.contains("test-key"));

    Ok(())
}

#[tokio::test]
async fn gemini_failure_is_shown_and_next_prompt_still_works() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(body_json(serde_json::json!({
            "contents": [{"parts": [{"text": "first"}]}]
        })))
        .respond_with(ResponseTemplate::new(500).set_body_string("provider down"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(body_json(serde_json::json!({
            "contents": [{"parts": [{"text": "second"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "Recovered answer"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = new_gemini_harness("flow-gemini-recover", &server.uri())?;
    submit_line(&mut harness, "first").await?;
    submit_line(&mut harness, "second").await?;

    let texts: Vec<&str> = harness
        .chat_history()
        .iter()
        .map(|message| message.text.as_str())
        .collect();
    assert_eq!(
        texts,
        vec![
            "first",
            "❌ Error from Gemini API: provider down",
            "second",
            "Recovered answer",
        ]
    );

    Ok(())
}

#[tokio::test]
async fn commands_never_enter_chat_history() -> Result<()> {
    let mut harness = new_harness("flow-commands", 100, 50)?;

    submit_line(&mut harness, "/help").await?;
    submit_line(&mut harness, "/models").await?;
    submit_line(&mut harness, "/bogus").await?;
    submit_line(&mut harness, "/history").await?;

    assert!(harness.chat_history().is_empty());
    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("cmd> /help"));
    assert!(timeline.contains("Available commands:"));
    assert!(timeline.contains("* Gemini Pro (Google) [gemini-pro] (live)"));
    assert!(timeline.contains("unknown command '/bogus'. Try /help"));
    assert!(timeline.contains("Chat history is empty."));

    Ok(())
}

#[tokio::test]
async fn history_command_lists_recent_messages() -> Result<()> {
    let mut harness = new_harness("flow-history", 100, 24)?;
    select_model(&mut harness, "gpt-4").await?;
    submit_line(&mut harness, "one").await?;
    submit_line(&mut harness, "two").await?;

    submit_line(&mut harness, "/history 2").await?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("user: two"));
    assert!(timeline.contains("bot: *Demo response for `gpt-4`: (API not yet integrated)*"));
    assert!(!timeline.contains("user: one"));

    Ok(())
}

#[tokio::test]
async fn clear_command_and_ctrl_l_empty_the_chat() -> Result<()> {
    let mut harness = new_harness("flow-clear", 100, 24)?;
    harness.seed_exchange("hi", "hello");
    harness.render()?;

    submit_line(&mut harness, "/clear").await?;
    assert!(harness.chat_history().is_empty());
    assert!(timeline_snapshot(&harness)?.contains("Welcome to Multi-Model Chatbot"));

    harness.seed_exchange("again", "sure");
    press_ctrl(&mut harness, 'l').await?;
    assert!(harness.chat_history().is_empty());
    assert!(!timeline_snapshot(&harness)?.contains("again"));

    let trace = fs::read_to_string(harness.trace_path())?;
    assert!(trace.contains("dropped 2 messages"));

    Ok(())
}

#[tokio::test]
async fn up_down_recall_previous_inputs() -> Result<()> {
    let mut harness = new_harness("flow-recall", 100, 24)?;

    submit_line(&mut harness, "/help").await?;
    submit_line(&mut harness, "/models").await?;

    press_up(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "/models");
    press_up(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "/help");
    press_down(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "/models");
    press_down(&mut harness).await?;
    assert_eq!(harness.ui_state_view().input, "");

    Ok(())
}

#[tokio::test]
async fn blank_submission_is_ignored() -> Result<()> {
    let mut harness = new_harness("flow-blank", 100, 24)?;

    submit_line(&mut harness, "   ").await?;

    assert!(harness.chat_history().is_empty());
    assert_eq!(harness.ui_state_view().input, "");
    assert!(timeline_snapshot(&harness)?.contains("Welcome to Multi-Model Chatbot"));
    Ok(())
}

#[tokio::test]
async fn quit_command_and_ctrl_c_stop_the_app() -> Result<()> {
    let mut harness = new_harness("flow-quit", 100, 24)?;
    submit_line(&mut harness, "/exit").await?;
    assert!(harness.ui_state_view().should_quit);

    let mut harness = new_harness("flow-ctrl-c", 100, 24)?;
    press_ctrl(&mut harness, 'c').await?;
    assert!(harness.ui_state_view().should_quit);

    Ok(())
}
