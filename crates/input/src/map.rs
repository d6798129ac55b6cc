//! Key mapping from terminal events to control commands.

use crate::types::{ControlCommand, Direction};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to a control command.
///
/// Arrows and `hjkl` move the cursor, `wasd` switch screens, space or `t` fires the
/// trigger under the cursor and `r` resets the level.
pub fn handle_key_event(key: KeyEvent) -> Option<ControlCommand> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => {
            Some(ControlCommand::Cursor(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => {
            Some(ControlCommand::Cursor(Direction::Right))
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => {
            Some(ControlCommand::Cursor(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => {
            Some(ControlCommand::Cursor(Direction::Down))
        }

        // Screens
        KeyCode::Char('a') | KeyCode::Char('A') => Some(ControlCommand::Screen(Direction::Left)),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(ControlCommand::Screen(Direction::Right)),
        KeyCode::Char('w') | KeyCode::Char('W') => Some(ControlCommand::Screen(Direction::Up)),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(ControlCommand::Screen(Direction::Down)),

        // Actions
        KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Char('t') | KeyCode::Char('T') => {
            Some(ControlCommand::Trigger)
        }
        KeyCode::Char('r') | KeyCode::Char('R') => Some(ControlCommand::Reset),

        _ => None,
    }
}

/// Check if key should quit the runner.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Check if key toggles pause (the engine stops cycling; the screen stays up).
pub fn is_pause_toggle(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('p') | KeyCode::Char('P'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn test_cursor_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Left)),
            Some(ControlCommand::Cursor(Direction::Left))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('j'))),
            Some(ControlCommand::Cursor(Direction::Down))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('K'))),
            Some(ControlCommand::Cursor(Direction::Up))
        );
    }

    #[test]
    fn test_screen_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('d'))),
            Some(ControlCommand::Screen(Direction::Right))
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('W'))),
            Some(ControlCommand::Screen(Direction::Up))
        );
    }

    #[test]
    fn test_action_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char(' '))),
            Some(ControlCommand::Trigger)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            Some(ControlCommand::Reset)
        );
        assert_eq!(handle_key_event(KeyEvent::from(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_release_events_are_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(handle_key_event(release), None);
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(is_pause_toggle(KeyEvent::from(KeyCode::Char('p'))));
    }
}
