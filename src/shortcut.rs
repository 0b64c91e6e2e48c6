//! App-wide keyboard chords
//!
//! `global_action` backs the handler registered with `EventBus::register_global`
//! for the lifetime of the run loop; components also consult it first so the
//! chords never reach a text input. Every chord here maps to an idempotent
//! action, so seeing the same key twice is harmless.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_dispatch::EventKind;

use crate::action::Action;

/// Label shown next to the search box
pub const FOCUS_SEARCH_HINT: &str = "Ctrl+/";

/// Ctrl+/ focuses the search box. Terminals without the kitty keyboard
/// protocol report the chord as Ctrl+7 or Ctrl+_.
pub fn is_focus_search(key: &KeyEvent) -> bool {
    key.kind != KeyEventKind::Release
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('/' | '7' | '_'))
}

pub fn is_force_quit(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

pub fn global_action(event: &EventKind) -> Option<Action> {
    let EventKind::Key(key) = event else {
        return None;
    };
    if is_focus_search(key) {
        Some(Action::SearchFocus)
    } else if is_force_quit(key) {
        Some(Action::Quit)
    } else {
        None
    }
}

/// Tab / Shift+Tab move focus between panes
pub fn focus_cycle(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Tab => Some(Action::FocusNext),
        KeyCode::BackTab => Some(Action::FocusPrev),
        _ => None,
    }
}
