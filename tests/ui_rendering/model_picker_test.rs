use anyhow::Result;
use crossterm::event::KeyCode;
use std::fs;

use crate::ui_rendering::common::{
    new_harness, press, press_ctrl, press_down, press_enter, press_up, status_snapshot,
    submit_line, timeline_snapshot, type_text,
};

#[tokio::test]
async fn ctrl_o_opens_picker_on_current_model() -> Result<()> {
    let mut harness = new_harness("picker-open", 100, 24)?;

    press_ctrl(&mut harness, 'o').await?;

    let view = harness.ui_state_view();
    assert!(view.picker_open);
    assert_eq!(view.picker_highlighted, 0);

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Select model"));
    assert!(timeline.contains("> Gemini Pro (Google) [gemini-pro]"));
    assert!(timeline.contains("Phi-3 Mini [phi-3-mini]"));

    Ok(())
}

#[tokio::test]
async fn picking_a_model_switches_and_routes_replies() -> Result<()> {
    let mut harness = new_harness("picker-select", 160, 24)?;

    press(&mut harness, KeyCode::F(2)).await?;
    press_down(&mut harness).await?;
    press_down(&mut harness).await?;
    press_down(&mut harness).await?;
    press_enter(&mut harness).await?;

    let view = harness.ui_state_view();
    assert!(!view.picker_open);
    assert_eq!(view.model_id, "gpt-4");
    assert!(timeline_snapshot(&harness)?.contains("Switched to GPT-4 (OpenAI) (gpt-4)"));
    assert!(status_snapshot(&harness)?.starts_with("Model: GPT-4 (OpenAI) [gpt-4] | demo |"));

    submit_line(&mut harness, "hi").await?;
    assert_eq!(
        harness.chat_history()[1].text,
        "*Demo response for `gpt-4`: (API not yet integrated)*"
    );

    let trace = fs::read_to_string(harness.trace_path())?;
    assert!(trace.contains("gpt-4 (GPT-4 (OpenAI))"));

    Ok(())
}

#[tokio::test]
async fn picker_keys_do_not_reach_the_input() -> Result<()> {
    let mut harness = new_harness("picker-keys", 100, 24)?;

    type_text(&mut harness, "draft").await?;
    press_ctrl(&mut harness, 'o').await?;
    type_text(&mut harness, "xyz").await?;
    press_up(&mut harness).await?;
    press(&mut harness, KeyCode::Esc).await?;

    let view = harness.ui_state_view();
    assert!(!view.picker_open);
    assert_eq!(view.model_id, "gemini-pro");
    assert_eq!(view.input, "draft");

    Ok(())
}

#[tokio::test]
async fn escape_keeps_current_model() -> Result<()> {
    let mut harness = new_harness("picker-escape", 100, 24)?;

    press_ctrl(&mut harness, 'o').await?;
    press_up(&mut harness).await?;
    press(&mut harness, KeyCode::Esc).await?;

    assert_eq!(harness.ui_state_view().model_id, "gemini-pro");
    assert!(!timeline_snapshot(&harness)?.contains("Select model"));

    Ok(())
}

#[tokio::test]
async fn model_command_accepts_ids_and_labels() -> Result<()> {
    let mut harness = new_harness("picker-command", 100, 24)?;

    submit_line(&mut harness, "/model mixtral-8x7b").await?;
    assert_eq!(harness.ui_state_view().model_id, "mixtral-8x7b");

    submit_line(&mut harness, "/model Claude 3 Haiku (Anthropic)").await?;
    assert_eq!(harness.ui_state_view().model_id, "claude-3-haiku");

    submit_line(&mut harness, "/model").await?;
    assert!(
        timeline_snapshot(&harness)?
            .contains("Current model: Claude 3 Haiku (Anthropic) [claude-3-haiku]")
    );

    submit_line(&mut harness, "/model gpt-5").await?;
    assert_eq!(harness.ui_state_view().model_id, "claude-3-haiku");
    assert!(timeline_snapshot(&harness)?.contains("unknown model 'gpt-5'"));

    Ok(())
}

#[tokio::test]
async fn switching_to_gemini_without_key_warns() -> Result<()> {
    let mut harness = new_harness("picker-no-key", 100, 24)?;

    submit_line(&mut harness, "/model phi-3-mini").await?;
    submit_line(&mut harness, "/model gemini-pro").await?;

    assert!(timeline_snapshot(&harness)?.contains("Gemini API key is not configured"));
    Ok(())
}
