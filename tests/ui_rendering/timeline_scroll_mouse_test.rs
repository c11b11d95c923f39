use anyhow::Result;
use crossterm::event::KeyCode;

use crate::ui_rendering::common::{
    new_harness, press, scroll_down, scroll_up, submit_line, timeline_snapshot,
};

fn seed_many(harness: &mut modelchat::cli::test_support::UiHarness, count: usize) -> Result<()> {
    for i in 0..count {
        harness.seed_exchange(&format!("question {i}"), &format!("answer {i}"));
    }
    harness.render()
}

#[tokio::test]
async fn mouse_wheel_scroll_only_applies_inside_timeline_region() -> Result<()> {
    let mut harness = new_harness("scroll-mouse-area", 100, 24)?;
    seed_many(&mut harness, 24)?;

    let regions = harness.regions()?;

    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    scroll_up(&mut harness, regions.input.x + 1, regions.input.y + 1)?;
    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    let after_timeline_up = harness.ui_state_view().timeline_scroll;
    assert!(after_timeline_up > 0);

    scroll_down(&mut harness, regions.status.x + 1, regions.status.y)?;
    assert_eq!(harness.ui_state_view().timeline_scroll, after_timeline_up);

    scroll_down(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    assert!(harness.ui_state_view().timeline_scroll < after_timeline_up);

    Ok(())
}

#[tokio::test]
async fn timeline_scroll_clamps_to_valid_bounds() -> Result<()> {
    let mut harness = new_harness("scroll-clamp", 100, 24)?;
    seed_many(&mut harness, 32)?;

    let regions = harness.regions()?;
    for _ in 0..200 {
        scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    }

    let max_reached = harness.ui_state_view().timeline_scroll;
    assert_eq!(max_reached, 64 - usize::from(regions.timeline.height));

    harness.render()?;
    assert!(timeline_snapshot(&harness)?.starts_with("[user] question 0"));

    for _ in 0..200 {
        scroll_down(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    }

    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    Ok(())
}

#[tokio::test]
async fn newest_lines_are_visible_by_default_and_page_keys_scroll() -> Result<()> {
    let mut harness = new_harness("scroll-pages", 100, 24)?;
    seed_many(&mut harness, 30)?;

    let tail = timeline_snapshot(&harness)?;
    assert!(tail.ends_with("[bot] answer 29"));
    assert!(!tail.contains("question 0\n"));

    press(&mut harness, KeyCode::PageUp).await?;
    let scrolled = harness.ui_state_view().timeline_scroll;
    assert!(scrolled > 0);
    assert!(!timeline_snapshot(&harness)?.ends_with("[bot] answer 29"));

    press(&mut harness, KeyCode::PageDown).await?;
    assert_eq!(harness.ui_state_view().timeline_scroll, 0);

    Ok(())
}

#[tokio::test]
async fn submitting_jumps_back_to_the_newest_line() -> Result<()> {
    let mut harness = new_harness("scroll-follow", 100, 24)?;
    seed_many(&mut harness, 30)?;

    let regions = harness.regions()?;
    scroll_up(&mut harness, regions.timeline.x + 1, regions.timeline.y + 1)?;
    assert!(harness.ui_state_view().timeline_scroll > 0);

    submit_line(&mut harness, "/trace").await?;
    assert_eq!(harness.ui_state_view().timeline_scroll, 0);
    assert!(timeline_snapshot(&harness)?.contains("Trace file:"));

    Ok(())
}
