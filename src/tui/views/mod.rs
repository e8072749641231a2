// Views module - screen-level rendering logic
//
// One view per tab plus the login screen shown before authentication:
// - Login: username/password (and email when registering)
// - Search: EAN lookup or manual form, with dashboard and preview
// - Products / Sheets: card lists
//
// This module builds the shell layout and dispatches to the current view.

mod login;
mod modal;
mod products;
mod search;
mod sheets;

use super::app::App;
use crate::controller::Tab;
use crate::tui::components::{status_bar, title_bar, toast};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

/// Main UI render function - called on every frame
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(2),
        ])
        .split(f.area());

    title_bar::render(f, chunks[0], app);

    if !app.controller.is_authenticated() {
        login::render(f, chunks[1], app);
    } else {
        match app.controller.tab {
            Tab::Search => search::render(f, chunks[1], app),
            Tab::Products => products::render(f, chunks[1], app),
            Tab::Sheets => sheets::render(f, chunks[1], app),
        }
    }

    status_bar::render(f, chunks[2], app);

    // Take modal temporarily to avoid borrow conflict with mutable app
    if let Some(modal_state) = app.modal.take() {
        modal::render(f, &modal_state, app);
        app.modal = Some(modal_state);
    }

    // Toast on top of modal too
    if let Some(alert) = &app.controller.alert {
        toast::render(f, f.area(), alert, &app.theme);
    }

    app.controller.clear_expired_alert();
}
