//! Event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Result of event handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventResult {
    /// Continue processing.
    Continue,
    /// Exit application.
    Exit,
    /// Event was consumed.
    Consumed,
}

/// What a key press asks the carousel to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Next,
    Previous,
    /// 0-based target index.
    GoTo(usize),
    CycleCategory,
    Quit,
}

impl KeyCommand {
    /// Maps a key press to a command.
    #[must_use]
    pub fn from_key(key: &KeyEvent) -> Option<Self> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        if is_quit_event(key) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Right | KeyCode::Char('l') => Some(Self::Next),
            KeyCode::Left | KeyCode::Char('h') => Some(Self::Previous),
            KeyCode::Tab => Some(Self::CycleCategory),
            KeyCode::Char(c @ '1'..='9') => c
                .to_digit(10)
                .map(|d| Self::GoTo(d as usize - 1)),
            _ => None,
        }
    }
}

/// Checks if key is a quit event.
#[must_use]
pub fn is_quit_event(key: &KeyEvent) -> bool {
    matches!(
        key,
        KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            ..
        } | KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        } | KeyEvent {
            code: KeyCode::Esc,
            modifiers: KeyModifiers::NONE,
            ..
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn make_key_event(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new_with_kind(code, modifiers, KeyEventKind::Press)
    }

    #[test]
    fn test_quit_events() {
        assert!(is_quit_event(&make_key_event(
            KeyCode::Char('q'),
            KeyModifiers::NONE
        )));
        assert!(is_quit_event(&make_key_event(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(is_quit_event(&make_key_event(
            KeyCode::Esc,
            KeyModifiers::NONE
        )));
        assert!(!is_quit_event(&make_key_event(
            KeyCode::Char('c'),
            KeyModifiers::NONE
        )));
    }

    #[test_case(KeyCode::Right, Some(KeyCommand::Next) ; "right arrow")]
    #[test_case(KeyCode::Char('l'), Some(KeyCommand::Next) ; "vim right")]
    #[test_case(KeyCode::Left, Some(KeyCommand::Previous) ; "left arrow")]
    #[test_case(KeyCode::Char('h'), Some(KeyCommand::Previous) ; "vim left")]
    #[test_case(KeyCode::Tab, Some(KeyCommand::CycleCategory) ; "tab")]
    #[test_case(KeyCode::Char('1'), Some(KeyCommand::GoTo(0)) ; "first")]
    #[test_case(KeyCode::Char('9'), Some(KeyCommand::GoTo(8)) ; "ninth")]
    #[test_case(KeyCode::Char('0'), None ; "zero")]
    #[test_case(KeyCode::Enter, None ; "enter")]
    fn test_key_commands(code: KeyCode, expected: Option<KeyCommand>) {
        assert_eq!(
            KeyCommand::from_key(&make_key_event(code, KeyModifiers::NONE)),
            expected
        );
    }

    #[test]
    fn test_release_is_ignored() {
        let key = KeyEvent::new_with_kind(KeyCode::Right, KeyModifiers::NONE, KeyEventKind::Release);
        assert_eq!(KeyCommand::from_key(&key), None);
    }
}
