// Text field editing
//
// Fields are plain Strings owned by the controller's forms; editing appends
// at the end and Backspace removes the last char. Enter submits single-line
// fields and inserts a line break in multi-line ones.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Changed,
    Submit,
    /// Esc: leave the field, keeping its text
    Done,
    Ignored,
}

pub fn edit(target: &mut String, key: KeyEvent, multiline: bool) -> Edit {
    match key.code {
        KeyCode::Esc => Edit::Done,
        KeyCode::Enter if multiline => {
            target.push('\n');
            Edit::Changed
        }
        KeyCode::Enter => Edit::Submit,
        KeyCode::Backspace => {
            target.pop();
            Edit::Changed
        }
        // Ctrl+U clears the whole field
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.clear();
            Edit::Changed
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            target.push(c);
            Edit::Changed
        }
        _ => Edit::Ignored,
    }
}

/// Password fields render as bullets
pub fn masked(value: &str) -> String {
    "•".repeat(value.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_and_backspace() {
        let mut text = String::new();
        for c in "3614".chars() {
            assert_eq!(edit(&mut text, key(KeyCode::Char(c)), false), Edit::Changed);
        }
        edit(&mut text, key(KeyCode::Backspace), false);
        assert_eq!(text, "361");
        assert_eq!(edit(&mut text, key(KeyCode::Enter), false), Edit::Submit);
    }

    #[test]
    fn multiline_enter_breaks_line() {
        let mut text = "Léger".to_string();
        assert_eq!(edit(&mut text, key(KeyCode::Enter), true), Edit::Changed);
        assert_eq!(text, "Léger\n");
        assert_eq!(edit(&mut text, key(KeyCode::Esc), true), Edit::Done);
    }

    #[test]
    fn ctrl_u_clears() {
        let mut text = "abc".to_string();
        let ctrl_u = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        edit(&mut text, ctrl_u, false);
        assert!(text.is_empty());
        assert_eq!(masked("abc"), "•••");
    }
}
