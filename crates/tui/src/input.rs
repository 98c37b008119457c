//! Key mapping from terminal events to game actions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pegsol_core::Action;

/// Translate a key press into a game action. Unmapped keys yield `None` and never
/// reach the game. Release events are filtered by the caller.
pub fn action_for(key: &KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Action::Quit),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('h') | KeyCode::Left => Some(Action::MoveLeft),
        KeyCode::Char('l') | KeyCode::Right => Some(Action::MoveRight),
        KeyCode::Char('k') | KeyCode::Up => Some(Action::MoveUp),
        KeyCode::Char('j') | KeyCode::Down => Some(Action::MoveDown),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Action::Confirm),
        KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('s') => Some(Action::Save),
        KeyCode::Char('r') => Some(Action::Load),
        _ => None,
    }
}

/// Key help shown in the side panel.
pub const KEY_HELP: &[(&str, &str)] = &[
    ("h j k l / arrows", "move cursor"),
    ("Enter / Space", "select, jump or cancel"),
    ("s", "save board"),
    ("r", "load last save"),
    ("q / Esc", "quit"),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn vim_keys_and_arrows_move() {
        assert_eq!(action_for(&press(KeyCode::Char('h'))), Some(Action::MoveLeft));
        assert_eq!(action_for(&press(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(action_for(&press(KeyCode::Enter)), Some(Action::Confirm));
        assert_eq!(action_for(&press(KeyCode::Char('r'))), Some(Action::Load));
    }

    #[test]
    fn unmapped_keys_are_dropped() {
        assert_eq!(action_for(&press(KeyCode::Char('x'))), None);
        assert_eq!(action_for(&press(KeyCode::Tab)), None);
    }

    #[test]
    fn ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&key), Some(Action::Quit));
        let key = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(action_for(&key), None);
    }
}
