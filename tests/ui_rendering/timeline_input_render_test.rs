use anyhow::Result;
use crossterm::event::KeyCode;
use modelchat::cli::test_support::{UiHarness, app_state_with_gemini, deterministic_app_state};

use crate::ui_rendering::common::{
    input_snapshot, new_harness, press, select_model, status_snapshot, submit_line,
    timeline_snapshot, title_snapshot, type_text,
};

#[tokio::test]
async fn initial_render_shows_title_welcome_and_status() -> Result<()> {
    let mut harness = new_harness("render-welcome", 160, 24)?;
    harness.render()?;

    assert_eq!(title_snapshot(&harness)?.trim(), "Multi-Model Chatbot");
    assert!(timeline_snapshot(&harness)?.contains("Welcome to Multi-Model Chatbot"));

    insta::assert_snapshot!(
        status_snapshot(&harness)?,
        @"Model: Gemini Pro (Google) [gemini-pro] | live (no key) | Messages: 0 | Ctrl-O model | Ctrl-L clear | /help | Session: render-welcome"
    );

    Ok(())
}

#[tokio::test]
async fn status_shows_plain_live_when_gemini_has_a_key() -> Result<()> {
    let state = app_state_with_gemini("render-keyed", "http://127.0.0.1:9", "test-key")?;
    let mut harness = UiHarness::new(160, 24, state)?;
    harness.render()?;

    let status = status_snapshot(&harness)?;
    assert!(status.starts_with("Model: Gemini Pro (Google) [gemini-pro] | live | Messages: 0 |"));
    Ok(())
}

#[tokio::test]
async fn status_counts_messages() -> Result<()> {
    let mut harness = new_harness("render-count", 160, 24)?;

    select_model(&mut harness, "phi-3-mini").await?;
    submit_line(&mut harness, "one").await?;
    submit_line(&mut harness, "two").await?;

    let status = status_snapshot(&harness)?;
    assert!(status.starts_with("Model: Phi-3 Mini [phi-3-mini] | demo | Messages: 4 |"));
    Ok(())
}

#[tokio::test]
async fn input_box_shows_typed_text_and_edits() -> Result<()> {
    let mut harness = new_harness("render-input", 100, 24)?;

    type_text(&mut harness, "helo").await?;
    press(&mut harness, KeyCode::Left).await?;
    type_text(&mut harness, "l").await?;
    press(&mut harness, KeyCode::End).await?;
    type_text(&mut harness, "!").await?;

    let view = harness.ui_state_view();
    assert_eq!(view.input, "hello!");
    assert_eq!(view.cursor, 6);
    assert!(input_snapshot(&harness)?.contains("hello!"));
    assert!(input_snapshot(&harness)?.contains("Message"));

    Ok(())
}

#[tokio::test]
async fn long_input_keeps_the_cursor_end_visible() -> Result<()> {
    let mut harness = new_harness("render-long-input", 40, 12)?;

    let text = format!("start-{}-end", "x".repeat(60));
    type_text(&mut harness, &text).await?;

    let input = input_snapshot(&harness)?;
    assert!(input.contains("-end"));
    assert!(!input.contains("start-"));
    assert_eq!(harness.ui_state_view().input, text);

    Ok(())
}

#[tokio::test]
async fn long_messages_wrap_inside_the_transcript() -> Result<()> {
    let mut harness = new_harness("render-wrap", 30, 20)?;
    harness.seed_exchange("abcdefghijklmnopqrstuvwxyz0123456789", "ok");
    harness.render()?;

    let timeline = timeline_snapshot(&harness)?;
    let lines: Vec<&str> = timeline.lines().collect();
    assert_eq!(lines[0], "[user] abcdefghijklmnopqrstuvw");
    assert_eq!(lines[1], "       xyz0123456789");
    assert_eq!(lines[2], "[bot] ok");

    Ok(())
}

fn without_spaces(text: &str) -> String {
    text.split_whitespace().collect()
}

#[tokio::test]
async fn wide_glyph_messages_wrap_by_terminal_columns() -> Result<()> {
    let mut harness = new_harness("render-wide", 30, 12)?;
    harness.seed_exchange("日本語テキスト長い文章です", "ok");
    harness.render()?;

    let timeline = timeline_snapshot(&harness)?;
    let lines: Vec<&str> = timeline.lines().collect();
    assert!(lines[0].starts_with("[user] 日"));
    assert_eq!(without_spaces(lines[1]), "です");
    assert_eq!(lines[2], "[bot] ok");
    assert!(without_spaces(&timeline).contains("日本語テキスト長い文章です"));

    Ok(())
}

#[tokio::test]
async fn failed_reply_with_error_mark_is_drawn_in_full() -> Result<()> {
    let mut harness = new_harness("render-error-mark", 30, 12)?;
    let reply = "❌ Error from Gemini API: quota exceeded for this project";
    harness.seed_exchange("hi", reply);
    harness.render()?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(without_spaces(&timeline).contains(&without_spaces(reply)));

    Ok(())
}

#[tokio::test]
async fn wide_glyph_input_stays_inside_the_box() -> Result<()> {
    let mut harness = new_harness("render-wide-input", 20, 12)?;

    type_text(&mut harness, "日本語テキスト").await?;
    let input = input_snapshot(&harness)?;
    assert!(without_spaces(&input).contains("日本語テキスト"));

    type_text(&mut harness, "長い文章です").await?;
    let input = input_snapshot(&harness)?;
    assert!(without_spaces(&input).contains("文章です"));
    assert!(!input.contains("日"));
    assert_eq!(harness.ui_state_view().cursor, 13);

    Ok(())
}

#[tokio::test]
async fn startup_notice_is_shown_in_the_transcript() -> Result<()> {
    let mut state = deterministic_app_state("render-notice")?;
    state.startup_notice = Some("Gemini API key not found.".to_string());
    let mut harness = UiHarness::new(100, 24, state)?;
    harness.render()?;

    let timeline = timeline_snapshot(&harness)?;
    assert!(timeline.contains("Gemini API key not found."));
    assert!(!timeline.contains("Welcome to Multi-Model Chatbot"));

    Ok(())
}
