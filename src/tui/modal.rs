// Modal dialog system
//
// Modals are overlays that capture input until dismissed. Each variant maps
// keys to a ModalAction; the event loop carries the action out, since most
// actions need the controller.

use crossterm::event::KeyCode;

/// Active modal dialog
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Modal {
    /// Keyboard shortcuts
    Help,
    /// Full product card (product id)
    ProductDetail(String),
    /// Full sheet with SEO and weight info (sheet id)
    SheetDetail(String),
    /// Yes/no prompt for the controller's pending confirmation
    ConfirmDelete,
    /// Recent tracing output
    Logs,
}

/// Result of handling input in a modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Key consumed, modal stays open
    None,
    Close,
    Confirm,
    ScrollUp,
    ScrollDown,
    /// Copy the shown item to the clipboard
    Copy,
    /// Generate a sheet for the shown product
    GenerateSheet,
    /// Ask to delete the shown product
    Delete,
    /// Export the shown sheet in the given format
    Export(ExportFormat),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Prestashop,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Prestashop => "prestashop",
            ExportFormat::Json => "json",
        }
    }
}

impl Modal {
    pub fn title(&self) -> &'static str {
        match self {
            Modal::Help => " Aide ",
            Modal::ProductDetail(_) => " Produit ",
            Modal::SheetDetail(_) => " Fiche produit ",
            Modal::ConfirmDelete => " Confirmation ",
            Modal::Logs => " Journal ",
        }
    }

    pub fn handle_input(&self, key: KeyCode) -> ModalAction {
        match self {
            Modal::Help => match key {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::ConfirmDelete => match key {
                KeyCode::Char('y') | KeyCode::Char('o') | KeyCode::Enter => ModalAction::Confirm,
                KeyCode::Char('n') | KeyCode::Esc | KeyCode::Char('q') => ModalAction::Close,
                _ => ModalAction::None,
            },
            Modal::ProductDetail(_) => match key {
                KeyCode::Char('g') => ModalAction::GenerateSheet,
                KeyCode::Char('d') => ModalAction::Delete,
                _ => Self::scroll_or_copy(key),
            },
            Modal::SheetDetail(_) => match key {
                KeyCode::Char('e') => ModalAction::Export(ExportFormat::Prestashop),
                KeyCode::Char('E') => ModalAction::Export(ExportFormat::Json),
                _ => Self::scroll_or_copy(key),
            },
            Modal::Logs => match key {
                KeyCode::Char('L') => ModalAction::Close,
                _ => Self::scroll_or_copy(key),
            },
        }
    }

    /// Keys shared by the scrollable modals
    fn scroll_or_copy(key: KeyCode) -> ModalAction {
        match key {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
            KeyCode::Up | KeyCode::Char('k') => ModalAction::ScrollUp,
            KeyCode::Down | KeyCode::Char('j') => ModalAction::ScrollDown,
            KeyCode::Char('c') | KeyCode::Char('y') => ModalAction::Copy,
            _ => ModalAction::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirm_accepts_french_and_english_yes() {
        let modal = Modal::ConfirmDelete;
        assert_eq!(modal.handle_input(KeyCode::Char('y')), ModalAction::Confirm);
        assert_eq!(modal.handle_input(KeyCode::Char('o')), ModalAction::Confirm);
        assert_eq!(modal.handle_input(KeyCode::Char('n')), ModalAction::Close);
        assert_eq!(modal.handle_input(KeyCode::Char('x')), ModalAction::None);
    }

    #[test]
    fn detail_actions_depend_on_kind() {
        let product = Modal::ProductDetail("p1".into());
        let sheet = Modal::SheetDetail("s1".into());
        assert_eq!(
            product.handle_input(KeyCode::Char('g')),
            ModalAction::GenerateSheet
        );
        assert_eq!(sheet.handle_input(KeyCode::Char('g')), ModalAction::None);
        assert_eq!(
            sheet.handle_input(KeyCode::Char('E')),
            ModalAction::Export(ExportFormat::Json)
        );
        assert_eq!(sheet.handle_input(KeyCode::Down), ModalAction::ScrollDown);
    }
}
