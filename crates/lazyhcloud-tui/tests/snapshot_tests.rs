//! Snapshot tests for full-screen rendering using insta
//!
//! Small terminals keep the expected screens readable inline.

mod helpers;

use helpers::render_state;
use lazyhcloud_core::*;

#[test]
fn test_loading_screen() {
    let state = AppState::new(Multiplexer::None);

    let output = render_state(&state, 40, 9);
    insta::assert_snapshot!(output, @r"
    ┌ lazyhcloud ──────────────────────────┐
    │Hetzner Cloud resource browser        │
    └──────────────────────────────────────┘
    ┌ Projects ────────────────────────────┐
    │Loading configuration...              │
    └──────────────────────────────────────┘
    ┌──────────────────────────────────────┐
    │Loading configuration...  q: Quit     │
    └──────────────────────────────────────┘
    ");
}

/// The error screen replaces the content area and only offers quitting
#[test]
fn test_error_screen() {
    let (state, _) = transition(
        AppState::new(Multiplexer::None),
        Message::Failed("boom".to_string()),
    );
    assert_eq!(state.phase, Phase::Error);

    let output = render_state(&state, 40, 12);
    insta::assert_snapshot!(output, @r"
    ┌ lazyhcloud ──────────────────────────┐
    │Hetzner Cloud resource browser        │
    └──────────────────────────────────────┘
    ┌ Error ───────────────────────────────┐
    │                                      │
    │boom                                  │
    │                                      │
    │Press q or Esc to quit                │
    └──────────────────────────────────────┘
    ┌──────────────────────────────────────┐
    │q/Esc: Quit                           │
    └──────────────────────────────────────┘
    ");
}
