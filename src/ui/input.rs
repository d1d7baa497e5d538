//! Keyboard handling for the console

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::ui::state::ConsoleState;

/// What the main loop should do after a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    None,
    /// A finished command line
    Submit(String),
    Quit,
}

/// Fold one key event into the console state
pub fn handle_key(console: &mut ConsoleState, key: KeyEvent) -> UiAction {
    if key.kind == KeyEventKind::Release {
        return UiAction::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return UiAction::Quit;
    }

    match key.code {
        KeyCode::Enter => console.submit().map_or(UiAction::None, UiAction::Submit),
        KeyCode::Tab | KeyCode::Esc => {
            console.toggle_screen();
            UiAction::None
        }
        KeyCode::Up => {
            console.history_prev();
            UiAction::None
        }
        KeyCode::Down => {
            console.history_next();
            UiAction::None
        }
        KeyCode::Backspace => {
            console.backspace();
            UiAction::None
        }
        KeyCode::Char(c) => {
            console.push_char(c);
            UiAction::None
        }
        _ => UiAction::None,
    }
}
