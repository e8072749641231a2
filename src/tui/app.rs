// App state for the TUI
//
// The controller owns everything that is shared with the CLI (session,
// collections, forms, alerts). App adds what only the terminal needs:
// focus, cursors, open modal, theme and the channel used to hand spawned
// work back to the event loop.

use super::modal::Modal;
use crate::catalog;
use crate::config::CardVariant;
use crate::controller::{Controller, DetailTarget, Outcome, Pending, Tab};
use crate::logging::LogBuffer;
use crate::theme::Theme;
use tokio::sync::mpsc;

/// Spinner frames for operations in flight
const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Email,
    Password,
}

/// Which half of the Generate tab has the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    #[default]
    Ean,
    Manual,
}

/// Rows of the manual product form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Brand,
    Category,
    Gender,
    Price,
    OldPrice,
    Sku,
    Material,
    Season,
    ShortDescription,
    Description,
    Features,
    Sizes,
    Colors,
    Image,
    Submit,
}

impl FormField {
    pub const ALL: [FormField; 16] = [
        FormField::Name,
        FormField::Brand,
        FormField::Category,
        FormField::Gender,
        FormField::Price,
        FormField::OldPrice,
        FormField::Sku,
        FormField::Material,
        FormField::Season,
        FormField::ShortDescription,
        FormField::Description,
        FormField::Features,
        FormField::Sizes,
        FormField::Colors,
        FormField::Image,
        FormField::Submit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Name => "Nom *",
            FormField::Brand => "Marque *",
            FormField::Category => "Catégorie *",
            FormField::Gender => "Genre",
            FormField::Price => "Prix *",
            FormField::OldPrice => "Ancien prix",
            FormField::Sku => "SKU",
            FormField::Material => "Matière",
            FormField::Season => "Saison",
            FormField::ShortDescription => "Résumé",
            FormField::Description => "Description",
            FormField::Features => "Points forts",
            FormField::Sizes => "Tailles",
            FormField::Colors => "Couleurs",
            FormField::Image => "Image",
            FormField::Submit => "Créer le produit",
        }
    }

    /// Free-text rows are edited in place; the others cycle or toggle
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::Name
                | FormField::Price
                | FormField::OldPrice
                | FormField::Sku
                | FormField::ShortDescription
                | FormField::Description
                | FormField::Features
                | FormField::Image
        )
    }

    /// Fixed option lists cycled with ←/→
    pub fn choices(&self) -> Option<Vec<&'static str>> {
        match self {
            FormField::Brand => Some(catalog::BRANDS.to_vec()),
            FormField::Category => Some(catalog::all_categories().collect()),
            FormField::Gender => Some(catalog::GENDERS.to_vec()),
            FormField::Material => Some(catalog::MATERIALS.to_vec()),
            FormField::Season => Some(catalog::SEASONS.to_vec()),
            _ => None,
        }
    }
}

/// Generate tab state
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub mode: SearchMode,
    pub ean: String,
    pub also_sheet: bool,
    pub field: usize,
    /// Cursor inside the sizes/colors chip rows
    pub chip: usize,
    /// Local path typed into the Image row, uploaded on Enter
    pub image_path: String,
}

impl SearchState {
    pub fn field(&self) -> FormField {
        FormField::ALL[self.field.min(FormField::ALL.len() - 1)]
    }
}

pub struct App {
    pub controller: Controller,
    pub log_buffer: LogBuffer,
    pub theme: Theme,
    pub variant: CardVariant,
    pub should_quit: bool,

    /// Overlay drawn above the current view
    pub modal: Option<Modal>,
    pub modal_scroll: u16,

    /// A text field currently has the keyboard
    pub editing: bool,

    pub login_field: LoginField,
    pub search: SearchState,

    pub product_selected: usize,
    pub product_filter: String,
    pub sheet_selected: usize,

    tick: usize,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl App {
    pub fn new(
        controller: Controller,
        log_buffer: LogBuffer,
        theme: Theme,
        variant: CardVariant,
        outcome_tx: mpsc::Sender<Outcome>,
    ) -> Self {
        Self {
            controller,
            log_buffer,
            theme,
            variant,
            should_quit: false,
            modal: None,
            modal_scroll: 0,
            editing: false,
            login_field: LoginField::default(),
            search: SearchState {
                also_sheet: true,
                ..SearchState::default()
            },
            product_selected: 0,
            product_filter: String::new(),
            sheet_selected: 0,
            tick: 0,
            outcome_tx,
        }
    }

    /// Run each future on the runtime; its outcome comes back through the channel
    pub fn spawn(&self, pending: Vec<Pending>) {
        for future in pending {
            let tx = self.outcome_tx.clone();
            tokio::spawn(async move {
                let outcome = future.await;
                if tx.send(outcome).await.is_err() {
                    tracing::debug!("Outcome dropped: event loop has exited");
                }
            });
        }
    }

    /// Fold a finished operation back in and start whatever it triggers
    pub fn on_outcome(&mut self, outcome: Outcome) {
        let follow_up = self.controller.apply(outcome);
        self.clamp_selection();
        self.spawn(follow_up);
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.controller.clear_expired_alert();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER[self.tick % SPINNER.len()]
    }

    pub fn is_busy(&self) -> bool {
        let b = &self.controller.busy;
        b.auth
            || b.generating
            || b.creating
            || b.uploading
            || b.deleting
            || self.controller.products.is_loading()
            || self.controller.sheets.is_loading()
            || self.controller.stats.is_loading()
    }

    pub fn set_tab(&mut self, tab: Tab) {
        let pending = self.controller.set_tab(tab);
        self.editing = false;
        self.spawn(pending);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lists
    // ─────────────────────────────────────────────────────────────────────────

    /// Id of the highlighted product, after filtering
    pub fn selected_product_id(&self) -> Option<String> {
        self.controller
            .visible_products(&self.product_filter)
            .get(self.product_selected)
            .map(|p| p.id.clone())
    }

    pub fn selected_sheet_id(&self) -> Option<String> {
        self.controller
            .sheets
            .data()
            .get(self.sheet_selected)
            .map(|s| s.id.clone())
    }

    fn list_len(&self) -> usize {
        match self.controller.tab {
            Tab::Products => self.controller.visible_products(&self.product_filter).len(),
            Tab::Sheets => self.controller.sheets.data().len(),
            Tab::Search => 0,
        }
    }

    pub fn select_previous(&mut self) {
        let selected = self.selection_mut();
        *selected = selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        let len = self.list_len();
        let selected = self.selection_mut();
        if *selected + 1 < len {
            *selected += 1;
        }
    }

    fn selection_mut(&mut self) -> &mut usize {
        match self.controller.tab {
            Tab::Sheets => &mut self.sheet_selected,
            _ => &mut self.product_selected,
        }
    }

    /// Keep cursors inside lists that shrank after a reload or delete
    pub fn clamp_selection(&mut self) {
        let products = self.controller.visible_products(&self.product_filter).len();
        self.product_selected = self.product_selected.min(products.saturating_sub(1));
        let sheets = self.controller.sheets.data().len();
        self.sheet_selected = self.sheet_selected.min(sheets.saturating_sub(1));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────

    pub fn open_modal(&mut self, modal: Modal) {
        self.modal_scroll = 0;
        self.modal = Some(modal);
    }

    pub fn open_details(&mut self, target: DetailTarget) {
        let modal = match &target {
            DetailTarget::Product(id) => Modal::ProductDetail(id.clone()),
            DetailTarget::Sheet(id) => Modal::SheetDetail(id.clone()),
        };
        self.controller.open_details(target);
        self.open_modal(modal);
    }

    pub fn close_modal(&mut self) {
        if matches!(
            self.modal,
            Some(Modal::ProductDetail(_)) | Some(Modal::SheetDetail(_))
        ) {
            self.controller.close_details();
        }
        if matches!(self.modal, Some(Modal::ConfirmDelete)) {
            self.controller.cancel_confirm();
        }
        self.modal = None;
        self.modal_scroll = 0;
    }

    pub fn request_delete(&mut self, id: &str) {
        self.controller.request_delete(id);
        self.open_modal(Modal::ConfirmDelete);
    }
}
