//! Query editing keys (pure state transitions).
//!
//! Called only for keys that are not bound to a [`crate::model::KeyAction`],
//! so reserved navigation keys never reach the editor.

use crate::state::QueryInput;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Apply an editing key to `input`.
///
/// Returns true if the key was an editing key (whether or not the text
/// changed), false if it was ignored.
pub fn handle_query_key(input: &mut QueryInput, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char(ch) if !ctrl && !alt => {
            input.insert(ch);
            true
        }
        KeyCode::Char(ch) if ctrl && !alt => handle_ctrl_char(input, ch),
        KeyCode::Backspace => {
            input.backspace();
            true
        }
        KeyCode::Delete => {
            input.delete();
            true
        }
        _ => false,
    }
}

fn handle_ctrl_char(input: &mut QueryInput, ch: char) -> bool {
    match ch.to_ascii_lowercase() {
        'a' => input.move_home(),
        'e' => input.move_end(),
        'b' => input.move_left(),
        'f' => input.move_right(),
        'u' => input.clear_to_start(),
        'k' => input.clear_to_end(),
        'w' => input.delete_word(),
        _ => return false,
    }
    true
}

// ===== Tests =====

#[cfg(test)]
#[path = "query_input_handler_tests.rs"]
mod tests;
