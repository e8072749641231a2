// TUI module - Terminal User Interface
//
// This module manages the terminal UI using ratatui. It handles:
// - Terminal initialization and cleanup
// - Event loop (keyboard input, timer ticks, finished network operations)
// - Layered key dispatch into the controller
//
// Network work never blocks the loop: controller operations return futures,
// App::spawn runs them on tokio and their outcomes come back over a channel.

pub mod app;
pub mod clipboard;
pub mod components;
pub mod input;
pub mod layout;
pub mod modal;
pub mod views;

use crate::catalog;
use crate::config::{CardVariant, Config};
use crate::controller::{AlertKind, Controller, DetailTarget, Outcome, Tab};
use crate::export;
use crate::form::AuthMode;
use crate::logging::LogBuffer;
use crate::theme::Theme;
use anyhow::{Context, Result};
use app::{App, FormField, LoginField, SearchMode};
use components::cards::CardAction;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use input::Edit;
use modal::{Modal, ModalAction};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Number of log lines shown (and copied) by the logs modal
pub const LOG_LINES: usize = 200;

/// Run the TUI
///
/// Sets up the terminal, resumes a stored session, runs the event loop and
/// restores the terminal when done.
pub async fn run_tui(controller: Controller, log_buffer: LogBuffer, config: Config) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to setup terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (outcome_tx, mut outcome_rx) = mpsc::channel(64);
    let mut app = App::new(
        controller,
        log_buffer,
        Theme::by_name(&config.theme),
        config.ui.variant,
        outcome_tx,
    );
    let restore = app.controller.restore();
    app.spawn(restore);

    let result = run_event_loop(&mut terminal, &mut app, &mut outcome_rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

/// Main event loop
///
/// Waits on three sources at once with tokio::select!:
/// 1. Keyboard input
/// 2. Timer ticks (spinner frames, alert expiry)
/// 3. Outcomes of spawned network operations
async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    outcome_rx: &mut mpsc::Receiver<Outcome>,
) -> Result<()> {
    let mut tick_interval = tokio::time::interval(Duration::from_millis(200));

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw terminal")?;

        tokio::select! {
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(Event::Key(key_event)) = event::read() {
                        handle_key_event(app, key_event);
                    }
                }
            } => {}

            _ = tick_interval.tick() => {
                app.on_tick();
            }

            Some(outcome) = outcome_rx.recv() => {
                app.on_outcome(outcome);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Handle keyboard input
/// Layered dispatch: Modal → Login screen → Text field → Global → View
fn handle_key_event(app: &mut App, key_event: KeyEvent) {
    if key_event.kind != KeyEventKind::Press {
        return;
    }
    if key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL)
    {
        app.should_quit = true;
        return;
    }

    // Layer 1: Modal captures all input when active
    if let Some(modal) = app.modal.clone() {
        let action = modal.handle_input(key_event.code);
        handle_modal_action(app, &modal, action);
        return;
    }

    // Layer 2: nothing but the login form until authenticated
    if !app.controller.is_authenticated() {
        handle_login_keys(app, key_event);
        return;
    }

    // Layer 3: an active text field swallows printable keys
    if app.editing {
        handle_editing(app, key_event);
        return;
    }

    // Layer 4: global keys
    if handle_global_keys(app, key_event.code) {
        return;
    }

    // Layer 5: current tab
    match app.controller.tab {
        Tab::Search => handle_search_keys(app, key_event.code),
        Tab::Products => handle_products_keys(app, key_event.code),
        Tab::Sheets => handle_sheets_keys(app, key_event.code),
    }
}

fn handle_modal_action(app: &mut App, modal: &Modal, action: ModalAction) {
    match action {
        ModalAction::None => {}
        ModalAction::Close => app.close_modal(),
        ModalAction::Confirm => {
            let pending = app.controller.confirm();
            app.modal = None;
            app.spawn(pending);
        }
        ModalAction::ScrollUp => app.modal_scroll = app.modal_scroll.saturating_sub(1),
        ModalAction::ScrollDown => app.modal_scroll = app.modal_scroll.saturating_add(1),
        ModalAction::Copy => {
            let text = match modal {
                Modal::ProductDetail(id) => app.controller.product(id).map(export::clipboard_text),
                Modal::SheetDetail(id) => app.controller.sheet(id).map(export::sheet_clipboard_text),
                Modal::Logs => Some(
                    app.log_buffer
                        .recent(LOG_LINES)
                        .iter()
                        .map(|e| e.line())
                        .collect::<Vec<_>>()
                        .join("\n"),
                ),
                _ => None,
            };
            if let Some(text) = text {
                copy(app, &text);
            }
        }
        ModalAction::GenerateSheet => {
            if let Modal::ProductDetail(id) = modal {
                let pending = app.controller.generate_sheet_for_product(id);
                app.close_modal();
                app.spawn(pending);
            }
        }
        ModalAction::Delete => {
            if let Modal::ProductDetail(id) = modal {
                app.close_modal();
                app.request_delete(id);
            }
        }
        ModalAction::Export(format) => {
            if let Modal::SheetDetail(id) = modal {
                let pending = app.controller.export_sheet(id, format.as_str());
                app.spawn(pending);
            }
        }
    }
}

fn copy(app: &mut App, text: &str) {
    match clipboard::copy_text(text) {
        Ok(()) => app
            .controller
            .notify(AlertKind::Success, "Copié dans le presse-papiers"),
        Err(e) => {
            tracing::warn!("Clipboard copy failed: {:#}", e);
            app.controller
                .notify(AlertKind::Error, format!("{e:#}"));
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Login screen
// ─────────────────────────────────────────────────────────────────────────────

fn login_fields(mode: AuthMode) -> &'static [LoginField] {
    match mode {
        AuthMode::Login => &[LoginField::Username, LoginField::Password],
        AuthMode::Register => &[LoginField::Username, LoginField::Email, LoginField::Password],
    }
}

fn move_login_field(app: &mut App, forward: bool) {
    let fields = login_fields(app.controller.login_form.mode);
    let current = fields.iter().position(|f| *f == app.login_field).unwrap_or(0);
    let next = if forward {
        (current + 1) % fields.len()
    } else {
        (current + fields.len() - 1) % fields.len()
    };
    app.login_field = fields[next];
}

fn handle_login_keys(app: &mut App, key_event: KeyEvent) {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    match key_event.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => move_login_field(app, true),
        KeyCode::BackTab | KeyCode::Up => move_login_field(app, false),
        KeyCode::F(2) => toggle_auth_mode(app),
        KeyCode::Char('r') if ctrl => toggle_auth_mode(app),
        KeyCode::Enter => {
            let pending = app.controller.login();
            app.spawn(pending);
        }
        _ => {
            let form = &mut app.controller.login_form;
            let target = match app.login_field {
                LoginField::Username => &mut form.username,
                LoginField::Email => &mut form.email,
                LoginField::Password => &mut form.password,
            };
            input::edit(target, key_event, false);
        }
    }
}

fn toggle_auth_mode(app: &mut App) {
    app.controller.login_form.toggle_mode();
    if !login_fields(app.controller.login_form.mode).contains(&app.login_field) {
        app.login_field = LoginField::Username;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text fields
// ─────────────────────────────────────────────────────────────────────────────

/// The String behind a free-text row of the manual form
fn form_text(app: &mut App, field: FormField) -> Option<&mut String> {
    let form = &mut app.controller.form;
    Some(match field {
        FormField::Name => &mut form.name,
        FormField::Price => &mut form.price,
        FormField::OldPrice => &mut form.old_price,
        FormField::Sku => &mut form.sku,
        FormField::ShortDescription => &mut form.short_description,
        FormField::Description => &mut form.description,
        FormField::Features => &mut form.features,
        FormField::Image => &mut app.search.image_path,
        _ => return None,
    })
}

fn handle_editing(app: &mut App, key_event: KeyEvent) {
    match app.controller.tab {
        Tab::Search if app.search.mode == SearchMode::Ean => {
            match input::edit(&mut app.search.ean, key_event, false) {
                Edit::Submit => {
                    app.editing = false;
                    let ean = app.search.ean.clone();
                    let pending = app.controller.generate_from_ean(&ean, app.search.also_sheet);
                    app.spawn(pending);
                }
                Edit::Done => app.editing = false,
                Edit::Changed | Edit::Ignored => {}
            }
        }
        Tab::Search => {
            let field = app.search.field();
            let multiline = matches!(field, FormField::Description | FormField::Features);
            let Some(target) = form_text(app, field) else {
                app.editing = false;
                return;
            };
            match input::edit(target, key_event, multiline) {
                Edit::Submit if field == FormField::Image => {
                    app.editing = false;
                    upload_image(app);
                }
                Edit::Submit | Edit::Done => app.editing = false,
                Edit::Changed | Edit::Ignored => {}
            }
        }
        Tab::Products => match input::edit(&mut app.product_filter, key_event, false) {
            Edit::Changed => app.product_selected = 0,
            Edit::Submit | Edit::Done => app.editing = false,
            Edit::Ignored => {}
        },
        Tab::Sheets => app.editing = false,
    }
}

fn upload_image(app: &mut App) {
    let path = app.search.image_path.trim();
    if path.is_empty() {
        app.controller.notify(
            AlertKind::Warning,
            "Indiquez le chemin de l'image",
        );
        return;
    }
    let pending = app.controller.upload_image(PathBuf::from(path));
    app.spawn(pending);
}

// ─────────────────────────────────────────────────────────────────────────────
// Global keys
// ─────────────────────────────────────────────────────────────────────────────

/// Returns true if the key was handled
fn handle_global_keys(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('?') => app.open_modal(Modal::Help),
        KeyCode::Char('L') => app.open_modal(Modal::Logs),
        KeyCode::Tab => app.set_tab(app.controller.tab.next()),
        KeyCode::BackTab => app.set_tab(app.controller.tab.prev()),
        KeyCode::Char('1') => app.set_tab(Tab::Search),
        KeyCode::Char('2') => app.set_tab(Tab::Products),
        KeyCode::Char('3') => app.set_tab(Tab::Sheets),
        KeyCode::Char('t') => {
            app.theme = app.theme.next();
            tracing::debug!("Theme switched to {}", app.theme.name);
        }
        KeyCode::Char('v') => app.variant = app.variant.toggle(),
        KeyCode::Char('r') => {
            use crate::controller::Collection;
            let pending = app.controller.reload(&[
                Collection::Products,
                Collection::Sheets,
                Collection::Stats,
            ]);
            app.spawn(pending);
        }
        KeyCode::Char('X') => {
            app.controller.logout();
            app.login_field = LoginField::Username;
            app.product_filter.clear();
            app.product_selected = 0;
            app.sheet_selected = 0;
        }
        _ => return false,
    }
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// Generate tab
// ─────────────────────────────────────────────────────────────────────────────

fn handle_search_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Char('m') => {
            app.search.mode = match app.search.mode {
                SearchMode::Ean => SearchMode::Manual,
                SearchMode::Manual => SearchMode::Ean,
            };
            return;
        }
        KeyCode::Char('H') => {
            app.controller.export_preview_html();
            return;
        }
        KeyCode::Char('J') => {
            app.controller.export_preview_json();
            return;
        }
        KeyCode::Char('C') => {
            match app.controller.preview_clipboard_text() {
                Some(text) => copy(app, &text),
                None => app.controller.notify(
                    AlertKind::Warning,
                    "Aucune fiche à copier",
                ),
            }
            return;
        }
        _ => {}
    }

    match app.search.mode {
        SearchMode::Ean => match key {
            KeyCode::Enter | KeyCode::Char('/') | KeyCode::Char('e') => app.editing = true,
            KeyCode::Char('s') => app.search.also_sheet = !app.search.also_sheet,
            _ => {}
        },
        SearchMode::Manual => handle_form_keys(app, key),
    }
}

fn handle_form_keys(app: &mut App, key: KeyCode) {
    let field = app.search.field();
    match key {
        KeyCode::Up | KeyCode::Char('k') => {
            app.search.field = app.search.field.saturating_sub(1);
            app.search.chip = 0;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.search.field = (app.search.field + 1).min(FormField::ALL.len() - 1);
            app.search.chip = 0;
        }
        KeyCode::Left | KeyCode::Char('h') => step_field(app, field, -1),
        KeyCode::Right | KeyCode::Char('l') => step_field(app, field, 1),
        KeyCode::Char(' ') => toggle_chip(app, field),
        KeyCode::Char('n') => {
            app.controller.form = Default::default();
            app.search.image_path.clear();
            app.search.field = 0;
        }
        KeyCode::Enter => match field {
            FormField::Submit => {
                let pending = app.controller.create_product();
                app.spawn(pending);
            }
            FormField::Sizes | FormField::Colors => toggle_chip(app, field),
            f if f.is_text() => app.editing = true,
            _ => step_field(app, field, 1),
        },
        _ => {}
    }
}

/// ←/→ on a row: cycle a fixed choice or move the chip cursor
fn step_field(app: &mut App, field: FormField, delta: isize) {
    if let Some(choices) = field.choices() {
        let form = &mut app.controller.form;
        let current = match field {
            FormField::Brand => &form.brand,
            FormField::Category => &form.category,
            FormField::Gender => &form.gender,
            FormField::Material => &form.material,
            _ => &form.season,
        };
        let next = match choices.iter().position(|c| *c == current.as_str()) {
            Some(i) => (i as isize + delta).rem_euclid(choices.len() as isize) as usize,
            None => 0,
        };
        let value = choices[next];
        match field {
            FormField::Brand => form.brand = value.to_string(),
            FormField::Category => form.set_category(value),
            FormField::Gender => form.set_gender(value),
            FormField::Material => form.material = value.to_string(),
            _ => form.season = value.to_string(),
        }
        return;
    }

    let len = chip_count(app, field);
    if len > 0 {
        app.search.chip = (app.search.chip as isize + delta).clamp(0, len as isize - 1) as usize;
    }
}

fn chip_count(app: &App, field: FormField) -> usize {
    match field {
        FormField::Sizes => app.controller.form.available_sizes().len(),
        FormField::Colors => catalog::COLORS.len(),
        _ => 0,
    }
}

fn toggle_chip(app: &mut App, field: FormField) {
    let chip = app.search.chip;
    match field {
        FormField::Sizes => {
            if let Some(size) = app.controller.form.available_sizes().get(chip).cloned() {
                app.controller.form.toggle_size(&size);
            }
        }
        FormField::Colors => {
            if let Some(color) = catalog::COLORS.get(chip) {
                app.controller.form.toggle_color(color.name);
            }
        }
        _ => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Lists
// ─────────────────────────────────────────────────────────────────────────────

fn handle_products_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => return app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => return app.select_next(),
        KeyCode::Char('/') => {
            app.editing = true;
            return;
        }
        KeyCode::Esc => {
            app.product_filter.clear();
            app.product_selected = 0;
            return;
        }
        _ => {}
    }

    let Some(action) = CardAction::from_key(key) else {
        return;
    };
    let Some(id) = app.selected_product_id() else {
        return;
    };
    match action {
        CardAction::Details => app.open_details(DetailTarget::Product(id)),
        CardAction::GenerateSheet => {
            let pending = app.controller.generate_sheet_for_product(&id);
            app.spawn(pending);
        }
        CardAction::Delete => app.request_delete(&id),
        CardAction::Copy => {
            if let Some(text) = app.controller.product(&id).map(export::clipboard_text) {
                copy(app, &text);
            }
        }
        CardAction::Export(_) => {}
    }
}

fn handle_sheets_keys(app: &mut App, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => return app.select_previous(),
        KeyCode::Down | KeyCode::Char('j') => return app.select_next(),
        _ => {}
    }

    let Some(action) = CardAction::from_key(key) else {
        return;
    };
    let Some(id) = app.selected_sheet_id() else {
        return;
    };
    match action {
        CardAction::Details => app.open_details(DetailTarget::Sheet(id)),
        CardAction::Export(format) => {
            let pending = app.controller.export_sheet(&id, format.as_str());
            app.spawn(pending);
        }
        CardAction::Copy => {
            if let Some(text) = app.controller.sheet(&id).map(export::sheet_clipboard_text) {
                copy(app, &text);
            }
        }
        CardAction::GenerateSheet | CardAction::Delete => {}
    }
}

/// Card layout names, for the help modal
pub fn variant_label(variant: CardVariant) -> &'static str {
    match variant {
        CardVariant::Simple => "simple",
        CardVariant::Detailed => "détaillé",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiClient;
    use crate::controller::ControllerSettings;
    use crate::demo::DemoBackend;
    use crate::session::MemorySessionStore;
    use std::sync::Arc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, press(KeyCode::Char(c)));
        }
    }

    fn app_for(url: &str) -> (App, mpsc::Receiver<Outcome>) {
        let (tx, rx) = mpsc::channel(16);
        let controller = Controller::new(
            ApiClient::new(url),
            Arc::new(MemorySessionStore::default()),
            ControllerSettings::default(),
        );
        let app = App::new(
            controller,
            LogBuffer::new(),
            Theme::default(),
            CardVariant::Detailed,
            tx,
        );
        (app, rx)
    }

    /// Apply outcomes until nothing is in flight
    async fn settle(app: &mut App, rx: &mut mpsc::Receiver<Outcome>) {
        while app.is_busy() {
            let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
                .await
                .expect("outcome in time")
                .expect("channel open");
            app.on_outcome(outcome);
        }
    }

    async fn logged_in() -> (DemoBackend, App, mpsc::Receiver<Outcome>) {
        let backend = DemoBackend::spawn().await.unwrap();
        let (mut app, mut rx) = app_for(&backend.base_url());
        type_text(&mut app, "demo");
        handle_key_event(&mut app, press(KeyCode::Tab));
        type_text(&mut app, "demo");
        handle_key_event(&mut app, press(KeyCode::Enter));
        settle(&mut app, &mut rx).await;
        (backend, app, rx)
    }

    #[test]
    fn login_fields_follow_mode() {
        let (mut app, _rx) = app_for("http://127.0.0.1:9/api");
        handle_key_event(&mut app, press(KeyCode::F(2)));
        assert_eq!(app.controller.login_form.mode, AuthMode::Register);

        handle_key_event(&mut app, press(KeyCode::Tab));
        assert_eq!(app.login_field, LoginField::Email);
        type_text(&mut app, "a@b.fr");
        assert_eq!(app.controller.login_form.email, "a@b.fr");

        // Email disappears in login mode; the cursor falls back
        handle_key_event(&mut app, press(KeyCode::F(2)));
        assert_eq!(app.login_field, LoginField::Username);
    }

    #[test]
    fn global_keys_are_ignored_before_login() {
        let (mut app, _rx) = app_for("http://127.0.0.1:9/api");
        type_text(&mut app, "q2");
        assert!(!app.should_quit);
        assert_eq!(app.controller.login_form.username, "q2");
        assert_eq!(app.controller.tab, Tab::Search);
    }

    #[tokio::test]
    async fn login_through_keys_loads_collections() {
        let (_backend, app, _rx) = logged_in().await;
        assert!(app.controller.is_authenticated());
        assert_eq!(app.controller.products.data().len(), 2);
        assert_eq!(app.controller.sheets.data().len(), 1);
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (backend, mut app, mut rx) = logged_in().await;
        handle_key_event(&mut app, press(KeyCode::Char('2')));
        assert_eq!(app.controller.tab, Tab::Products);

        handle_key_event(&mut app, press(KeyCode::Char('d')));
        assert_eq!(app.modal, Some(Modal::ConfirmDelete));
        assert!(app.controller.confirmation.is_some());

        // Declining leaves the backend untouched
        handle_key_event(&mut app, press(KeyCode::Char('n')));
        assert!(app.modal.is_none());
        assert!(app.controller.confirmation.is_none());
        assert_eq!(backend.product_count(), 2);

        handle_key_event(&mut app, press(KeyCode::Char('d')));
        handle_key_event(&mut app, press(KeyCode::Char('o')));
        settle(&mut app, &mut rx).await;
        assert_eq!(backend.product_count(), 1);
        assert_eq!(app.controller.products.data().len(), 1);
    }

    #[tokio::test]
    async fn ean_entry_generates_and_switches_tab() {
        let (_backend, mut app, mut rx) = logged_in().await;
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(app.editing);
        type_text(&mut app, "3614270357637");
        handle_key_event(&mut app, press(KeyCode::Enter));
        assert!(!app.editing);
        settle(&mut app, &mut rx).await;

        assert_eq!(app.controller.tab, Tab::Sheets);
        assert_eq!(app.controller.products.data().len(), 3);
    }

    #[tokio::test]
    async fn product_filter_narrows_selection() {
        let (_backend, mut app, _rx) = logged_in().await;
        handle_key_event(&mut app, press(KeyCode::Char('2')));
        handle_key_event(&mut app, press(KeyCode::Char('/')));
        type_text(&mut app, "capuche");
        handle_key_event(&mut app, press(KeyCode::Enter));

        let visible = app.controller.visible_products(&app.product_filter);
        assert_eq!(visible.len(), 1);
        let id = visible[0].id.clone();
        assert_eq!(app.selected_product_id(), Some(id.clone()));

        handle_key_event(&mut app, press(KeyCode::Enter));
        assert_eq!(app.modal, Some(Modal::ProductDetail(id)));
        handle_key_event(&mut app, press(KeyCode::Esc));
        assert!(app.modal.is_none());
        assert!(!app.controller.detail.visible);
    }

    #[test]
    fn form_pickers_cycle_and_prune_sizes() {
        let (mut app, _rx) = app_for("http://127.0.0.1:9/api");
        app.search.mode = SearchMode::Manual;
        app.search.field = FormField::ALL
            .iter()
            .position(|f| *f == FormField::Category)
            .unwrap();

        handle_form_keys(&mut app, KeyCode::Right);
        let first = catalog::all_categories().next().unwrap();
        assert_eq!(app.controller.form.category, first);
        handle_form_keys(&mut app, KeyCode::Left);
        let last = catalog::all_categories().last().unwrap();
        assert_eq!(app.controller.form.category, last);
    }
}
