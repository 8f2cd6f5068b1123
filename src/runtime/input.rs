use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::panel::PanelIntent;
use crate::session::ResultFlag;

/// What a key press asks the workbench to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    NextTab,
    PrevTab,
    CursorUp,
    CursorDown,
    /// Flag the entry under the cursor.
    ToggleSelected(ResultFlag),
    RemoveSelected,
    Panel(PanelIntent),
}

pub fn map_key(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Command::Exit),
            KeyCode::Char('s') => Some(Command::ToggleSelected(ResultFlag::Saved)),
            KeyCode::Char('b') => Some(Command::ToggleSelected(ResultFlag::Bookmarked)),
            KeyCode::Char('l') => Some(Command::Panel(PanelIntent::Clear)),
            KeyCode::Char('y') => Some(Command::Panel(PanelIntent::Copy)),
            _ => None,
        };
    }

    let command = match key.code {
        KeyCode::Esc => Command::Exit,
        KeyCode::Tab => Command::NextTab,
        KeyCode::BackTab => Command::PrevTab,
        KeyCode::Up => Command::CursorUp,
        KeyCode::Down => Command::CursorDown,
        KeyCode::Left => Command::Panel(PanelIntent::CycleCategory(-1)),
        KeyCode::Right => Command::Panel(PanelIntent::CycleCategory(1)),
        KeyCode::Enter => Command::Panel(PanelIntent::Generate),
        KeyCode::Backspace => Command::Panel(PanelIntent::DeleteChar),
        KeyCode::Delete => Command::RemoveSelected,
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
            Command::Panel(PanelIntent::InsertChar(ch))
        }
        _ => return None,
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
        map_key(&KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_chords_map_to_log_commands() {
        assert_eq!(
            press(KeyCode::Char('s'), KeyModifiers::CONTROL),
            Some(Command::ToggleSelected(ResultFlag::Saved))
        );
        assert_eq!(
            press(KeyCode::Char('y'), KeyModifiers::CONTROL),
            Some(Command::Panel(PanelIntent::Copy))
        );
        assert_eq!(press(KeyCode::Char('q'), KeyModifiers::CONTROL), None);
    }

    #[test]
    fn plain_and_shifted_chars_are_typed() {
        assert_eq!(
            press(KeyCode::Char('A'), KeyModifiers::SHIFT),
            Some(Command::Panel(PanelIntent::InsertChar('A')))
        );
        assert_eq!(press(KeyCode::Char('a'), KeyModifiers::ALT), None);
    }

    #[test]
    fn releases_are_ignored() {
        let mut key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(&key), None);
        key.kind = KeyEventKind::Press;
        assert_eq!(map_key(&key), Some(Command::Panel(PanelIntent::Generate)));
    }
}
