//! Domain-level keyboard actions independent of key bindings.

/// Reserved actions that take precedence over text entry.
///
/// These represent user intent, not specific keys. The mapping from
/// crossterm::event::KeyEvent to KeyAction is handled by KeyBindings; any key
/// without a binding is offered to the query editor instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    // Session
    /// Run a search with the current query. Default: Enter
    SubmitSearch,
    /// Download the selected row in the background. Default: Ctrl+d
    Download,
    /// End the session. Default: Esc/Ctrl+c
    Quit,

    // Table navigation
    /// Select the next row. Default: j/↓
    NextRow,
    /// Select the previous row. Default: k/↑
    PrevRow,
    /// Move the selection down one page. Default: l/→/Page Down
    PageDown,
    /// Move the selection up one page. Default: h/←/Page Up
    PageUp,
    /// Select the first row. Default: Home
    FirstRow,
    /// Select the last row. Default: End
    LastRow,
}

impl KeyAction {
    /// Whether this action only moves the table cursor.
    pub fn is_navigation(self) -> bool {
        matches!(
            self,
            KeyAction::NextRow
                | KeyAction::PrevRow
                | KeyAction::PageDown
                | KeyAction::PageUp
                | KeyAction::FirstRow
                | KeyAction::LastRow
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_actions_are_classified() {
        for action in [
            KeyAction::NextRow,
            KeyAction::PrevRow,
            KeyAction::PageDown,
            KeyAction::PageUp,
            KeyAction::FirstRow,
            KeyAction::LastRow,
        ] {
            assert!(action.is_navigation(), "{action:?} should be navigation");
        }
    }

    #[test]
    fn session_actions_are_not_navigation() {
        assert!(!KeyAction::SubmitSearch.is_navigation());
        assert!(!KeyAction::Download.is_navigation());
        assert!(!KeyAction::Quit.is_navigation());
    }
}
