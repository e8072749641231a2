//! Tab/session controller
//!
//! Owns every piece of client state: the session, the active tab, the three
//! remote collections, the manual form, the detail selection, the pending
//! confirmation and the current alert.
//!
//! Network operations never block the controller. Each one is returned as a
//! detached [`Pending`] future resolving to an [`Outcome`]; feeding that outcome
//! to [`Controller::apply`] folds it into state and yields the follow-up loads.
//! The TUI spawns pendings and sends outcomes back over a channel, while the
//! CLI and tests run them in order with [`Controller::drive`].

pub mod alert;
pub mod remote;

pub use alert::{Alert, AlertKind, DEFAULT_ALERT_TTL};
pub use remote::Remote;

use crate::api::types::{
    AuthResponse, ExportPayload, GenerateResponse, Product, ProductSheet, SearchSummary, Stats,
    User,
};
use crate::api::{ApiClient, ApiError};
use crate::export;
use crate::form::{AuthMode, LoginForm, ProductForm};
use crate::session::{Session, SessionStore};
use chrono::Local;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// A network operation in flight
pub type Pending = BoxFuture<'static, Outcome>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Search,
    Products,
    Sheets,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Search, Tab::Products, Tab::Sheets];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Search => "Générer",
            Tab::Products => "Produits",
            Tab::Sheets => "Fiches",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::Search => 0,
            Tab::Products => 1,
            Tab::Sheets => 2,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Tab::Search => Tab::Products,
            Tab::Products => Tab::Sheets,
            Tab::Sheets => Tab::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Tab::Search => Tab::Sheets,
            Tab::Products => Tab::Search,
            Tab::Sheets => Tab::Products,
        }
    }

    /// Collection displayed by this tab
    fn collection(&self) -> Option<Collection> {
        match self {
            Tab::Search => None,
            Tab::Products => Some(Collection::Products),
            Tab::Sheets => Some(Collection::Sheets),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Products,
    Sheets,
    Stats,
}

impl Collection {
    fn error_message(&self) -> &'static str {
        match self {
            Collection::Products => "Erreur lors du chargement des produits",
            Collection::Sheets => "Erreur lors du chargement des fiches",
            Collection::Stats => "Erreur lors du chargement des statistiques",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailTarget {
    Product(String),
    Sheet(String),
}

/// Details modal state; closing clears both fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailState {
    pub selected: Option<DetailTarget>,
    pub visible: bool,
}

/// Destructive action waiting for an explicit yes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingConfirm {
    DeleteProduct { id: String, label: String },
}

impl PendingConfirm {
    pub fn prompt(&self) -> String {
        match self {
            PendingConfirm::DeleteProduct { label, .. } => {
                format!("Êtes-vous sûr de vouloir supprimer ce produit ?\n\n{label}")
            }
        }
    }
}

/// Result of a [`Pending`], consumed by [`Controller::apply`]
#[derive(Debug)]
pub enum Outcome {
    Auth {
        mode: AuthMode,
        result: Result<AuthResponse, ApiError>,
    },
    Products {
        generation: u64,
        result: Result<Vec<Product>, ApiError>,
    },
    Sheets {
        generation: u64,
        result: Result<Vec<ProductSheet>, ApiError>,
    },
    Stats {
        generation: u64,
        result: Result<Stats, ApiError>,
    },
    Generated {
        epoch: u64,
        also_sheet: bool,
        result: Result<GenerateResponse, ApiError>,
    },
    Deleted {
        epoch: u64,
        id: String,
        result: Result<(), ApiError>,
    },
    SheetCreated {
        epoch: u64,
        product_id: String,
        result: Result<ProductSheet, ApiError>,
    },
    Exported {
        epoch: u64,
        sheet_id: String,
        format: String,
        result: Result<ExportPayload, ApiError>,
    },
    ProductCreated {
        epoch: u64,
        result: Result<Product, ApiError>,
    },
    ImageUploaded {
        epoch: u64,
        result: Result<String, ApiError>,
    },
}

impl Outcome {
    /// Session epoch of a user action; list loads carry generations instead
    fn epoch(&self) -> Option<u64> {
        match self {
            Outcome::Generated { epoch, .. }
            | Outcome::Deleted { epoch, .. }
            | Outcome::SheetCreated { epoch, .. }
            | Outcome::Exported { epoch, .. }
            | Outcome::ProductCreated { epoch, .. }
            | Outcome::ImageUploaded { epoch, .. } => Some(*epoch),
            Outcome::Auth { .. }
            | Outcome::Products { .. }
            | Outcome::Sheets { .. }
            | Outcome::Stats { .. } => None,
        }
    }
}

/// Behavior switches taken from configuration
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    /// Load Products/Sheets on first entry to their tab instead of at login
    pub lazy_tabs: bool,
    pub list_limit: Option<u32>,
    pub export_dir: PathBuf,
    pub alert_ttl: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            lazy_tabs: false,
            list_limit: Some(50),
            export_dir: PathBuf::from("."),
            alert_ttl: DEFAULT_ALERT_TTL,
        }
    }
}

/// Operations in flight, for spinners and to ignore double submits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Busy {
    pub auth: bool,
    pub generating: bool,
    pub creating: bool,
    pub uploading: bool,
    pub deleting: bool,
}

pub struct Controller {
    api: ApiClient,
    store: Arc<dyn SessionStore>,
    settings: ControllerSettings,
    visited: HashSet<Tab>,
    /// Bumped on logout so actions from the previous session are ignored
    epoch: u64,

    pub session: SessionState,
    pub tab: Tab,
    pub products: Remote<Vec<Product>>,
    pub sheets: Remote<Vec<ProductSheet>>,
    pub stats: Remote<Stats>,
    pub login_form: LoginForm,
    pub form: ProductForm,
    /// Product returned by the last manual creation
    pub preview: Option<Product>,
    pub last_search: Option<SearchSummary>,
    pub detail: DetailState,
    pub confirmation: Option<PendingConfirm>,
    pub alert: Option<Alert>,
    pub busy: Busy,
    pub last_export: Option<PathBuf>,
}

impl Controller {
    pub fn new(api: ApiClient, store: Arc<dyn SessionStore>, settings: ControllerSettings) -> Self {
        Self {
            api,
            store,
            settings,
            visited: HashSet::new(),
            epoch: 0,
            session: SessionState::Anonymous,
            tab: Tab::Search,
            products: Remote::default(),
            sheets: Remote::default(),
            stats: Remote::default(),
            login_form: LoginForm::default(),
            form: ProductForm::default(),
            preview: None,
            last_search: None,
            detail: DetailState::default(),
            confirmation: None,
            alert: None,
            busy: Busy::default(),
            last_export: None,
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn set_list_limit(&mut self, limit: Option<u32>) {
        self.settings.list_limit = limit;
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.session, SessionState::Authenticated(_))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Alerts
    // ─────────────────────────────────────────────────────────────────────────

    pub fn notify(&mut self, kind: AlertKind, message: impl Into<String>) {
        let alert = Alert::new(kind, message, self.settings.alert_ttl);
        match kind {
            AlertKind::Error => tracing::warn!("{}", alert.message),
            _ => tracing::info!("{}", alert.message),
        }
        self.alert = Some(alert);
    }

    pub fn clear_expired_alert(&mut self) {
        if self.alert.as_ref().is_some_and(|a| a.is_expired()) {
            self.alert = None;
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Session
    // ─────────────────────────────────────────────────────────────────────────

    /// Resume a stored session, if any
    pub fn restore(&mut self) -> Vec<Pending> {
        match self.store.load() {
            Ok(Some(session)) => {
                tracing::info!("Restored session for {}", session.user.username);
                self.api.set_token(&session.token);
                self.session = SessionState::Authenticated(session.user);
                self.initial_load()
            }
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Ignoring stored session: {}", e);
                Vec::new()
            }
        }
    }

    /// Submit the login form in its current mode
    pub fn login(&mut self) -> Vec<Pending> {
        if let Err(e) = self.login_form.validate() {
            self.notify(AlertKind::Warning, e.to_string());
            return Vec::new();
        }
        if self.busy.auth {
            return Vec::new();
        }
        self.busy.auth = true;

        let api = self.api.clone();
        let form = self.login_form.clone();
        let mode = form.mode;
        vec![async move {
            let result = match mode {
                AuthMode::Login => api.login(form.username.trim(), &form.password).await,
                AuthMode::Register => {
                    api.register(form.username.trim(), form.email.trim(), &form.password)
                        .await
                }
            };
            Outcome::Auth { mode, result }
        }
        .boxed()]
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!("Failed to clear stored session: {}", e);
        }
        self.api.clear_token();
        self.epoch += 1;
        self.session = SessionState::Anonymous;
        self.tab = Tab::Search;
        self.visited.clear();
        self.products.reset();
        self.sheets.reset();
        self.stats.reset();
        self.form = ProductForm::default();
        self.login_form = LoginForm::default();
        self.preview = None;
        self.last_search = None;
        self.detail = DetailState::default();
        self.confirmation = None;
        self.busy = Busy::default();
        self.notify(AlertKind::Success, "Déconnexion réussie");
    }

    /// Loads issued right after authentication
    fn initial_load(&mut self) -> Vec<Pending> {
        if !self.settings.lazy_tabs {
            return self.reload(&[Collection::Products, Collection::Sheets, Collection::Stats]);
        }
        let mut pending = vec![self.load(Collection::Stats)];
        if let Some(collection) = self.tab.collection() {
            self.visited.insert(self.tab);
            pending.push(self.load(collection));
        }
        pending
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Collections
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch one collection wholesale
    pub fn load(&mut self, collection: Collection) -> Pending {
        let api = self.api.clone();
        let limit = self.settings.list_limit;
        match collection {
            Collection::Products => {
                let generation = self.products.begin();
                async move {
                    let result = api.list_products(limit).await;
                    Outcome::Products { generation, result }
                }
                .boxed()
            }
            Collection::Sheets => {
                let generation = self.sheets.begin();
                async move {
                    let result = api.list_sheets(limit).await;
                    Outcome::Sheets { generation, result }
                }
                .boxed()
            }
            Collection::Stats => {
                let generation = self.stats.begin();
                async move {
                    let result = api.stats().await;
                    Outcome::Stats { generation, result }
                }
                .boxed()
            }
        }
    }

    pub fn reload(&mut self, collections: &[Collection]) -> Vec<Pending> {
        collections.iter().map(|c| self.load(*c)).collect()
    }

    pub fn set_tab(&mut self, tab: Tab) -> Vec<Pending> {
        self.tab = tab;
        if !self.settings.lazy_tabs || !self.is_authenticated() || !self.visited.insert(tab) {
            return Vec::new();
        }
        match tab.collection() {
            Some(Collection::Products) if !self.products.is_loaded() => {
                vec![self.load(Collection::Products)]
            }
            Some(Collection::Sheets) if !self.sheets.is_loaded() => {
                vec![self.load(Collection::Sheets)]
            }
            _ => Vec::new(),
        }
    }

    /// Case-insensitive match on title and brand
    pub fn visible_products(&self, term: &str) -> Vec<&Product> {
        let term = term.trim().to_lowercase();
        self.products
            .data()
            .iter()
            .filter(|p| {
                term.is_empty()
                    || p.title.to_lowercase().contains(&term)
                    || p.brand.to_lowercase().contains(&term)
            })
            .collect()
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.data().iter().find(|p| p.id == id)
    }

    pub fn sheet(&self, id: &str) -> Option<&ProductSheet> {
        self.sheets.data().iter().find(|s| s.id == id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Details modal
    // ─────────────────────────────────────────────────────────────────────────

    pub fn open_details(&mut self, target: DetailTarget) {
        self.detail = DetailState {
            selected: Some(target),
            visible: true,
        };
    }

    pub fn close_details(&mut self) {
        self.detail = DetailState::default();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation
    // ─────────────────────────────────────────────────────────────────────────

    pub fn generate_from_ean(&mut self, ean: &str, also_sheet: bool) -> Vec<Pending> {
        let ean = ean.trim().to_string();
        if ean.is_empty() {
            self.notify(AlertKind::Warning, "Veuillez saisir un code EAN");
            return Vec::new();
        }
        if self.busy.generating {
            return Vec::new();
        }
        self.busy.generating = true;
        tracing::info!("Generating product from EAN {}", ean);

        let api = self.api.clone();
        let epoch = self.epoch;
        vec![async move {
            let result = api.generate_from_ean(&ean, also_sheet).await;
            Outcome::Generated {
                epoch,
                also_sheet,
                result,
            }
        }
        .boxed()]
    }

    pub fn generate_sheet_for_product(&mut self, product_id: &str) -> Vec<Pending> {
        let api = self.api.clone();
        let product_id = product_id.to_string();
        let epoch = self.epoch;
        vec![async move {
            let result = api.create_sheet(&product_id, true).await;
            Outcome::SheetCreated {
                epoch,
                product_id,
                result,
            }
        }
        .boxed()]
    }

    /// Submit the manual form
    pub fn create_product(&mut self) -> Vec<Pending> {
        let draft = match self.form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.notify(AlertKind::Warning, e.to_string());
                return Vec::new();
            }
        };
        if self.busy.creating {
            return Vec::new();
        }
        self.busy.creating = true;

        let api = self.api.clone();
        let epoch = self.epoch;
        vec![async move {
            let result = api.create_product(&draft).await;
            Outcome::ProductCreated { epoch, result }
        }
        .boxed()]
    }

    pub fn upload_image(&mut self, path: PathBuf) -> Vec<Pending> {
        self.busy.uploading = true;
        let api = self.api.clone();
        let epoch = self.epoch;
        vec![async move {
            let result = api.upload_image(&path).await;
            Outcome::ImageUploaded { epoch, result }
        }
        .boxed()]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Deletion (confirmation gated)
    // ─────────────────────────────────────────────────────────────────────────

    pub fn request_delete(&mut self, id: &str) {
        let label = self
            .product(id)
            .map(|p| format!("{} - {}", p.brand, p.title))
            .unwrap_or_else(|| id.to_string());
        self.confirmation = Some(PendingConfirm::DeleteProduct {
            id: id.to_string(),
            label,
        });
    }

    pub fn cancel_confirm(&mut self) {
        self.confirmation = None;
    }

    /// Execute the pending confirmation; without one this does nothing
    pub fn confirm(&mut self) -> Vec<Pending> {
        let Some(PendingConfirm::DeleteProduct { id, .. }) = self.confirmation.take() else {
            return Vec::new();
        };
        self.busy.deleting = true;
        tracing::info!("Deleting product {}", id);

        let api = self.api.clone();
        let epoch = self.epoch;
        vec![async move {
            let result = api.delete_product(&id).await;
            Outcome::Deleted { epoch, id, result }
        }
        .boxed()]
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exports
    // ─────────────────────────────────────────────────────────────────────────

    pub fn export_sheet(&mut self, sheet_id: &str, format: &str) -> Vec<Pending> {
        let api = self.api.clone();
        let sheet_id = sheet_id.to_string();
        let format = format.to_string();
        let epoch = self.epoch;
        vec![async move {
            let result = api.export_sheet(&sheet_id, &format).await;
            Outcome::Exported {
                epoch,
                sheet_id,
                format,
                result,
            }
        }
        .boxed()]
    }

    pub fn export_preview_html(&mut self) -> Option<PathBuf> {
        let product = self.preview_or_warn()?;
        let now = Local::now();
        let html = export::render_html(&product, now);
        self.write_preview(&export::preview_file_name("html", now), &html)
    }

    pub fn export_preview_json(&mut self) -> Option<PathBuf> {
        let product = self.preview_or_warn()?;
        let now = Local::now();
        let doc = export::render_json(&product, now);
        let json = match serde_json::to_string_pretty(&doc) {
            Ok(json) => json,
            Err(e) => {
                self.notify(AlertKind::Error, format!("Export impossible : {e}"));
                return None;
            }
        };
        self.write_preview(&export::preview_file_name("json", now), &json)
    }

    /// Plain-text rendition of the preview for the clipboard
    pub fn preview_clipboard_text(&self) -> Option<String> {
        self.preview.as_ref().map(export::clipboard_text)
    }

    fn preview_or_warn(&mut self) -> Option<Product> {
        if self.preview.is_none() {
            self.notify(AlertKind::Warning, "Aucune fiche à exporter");
        }
        self.preview.clone()
    }

    fn write_preview(&mut self, name: &str, contents: &str) -> Option<PathBuf> {
        match export::write_file(&self.settings.export_dir, name, contents) {
            Ok(path) => {
                self.notify(
                    AlertKind::Success,
                    format!("Fichier exporté : {}", path.display()),
                );
                self.last_export = Some(path.clone());
                Some(path)
            }
            Err(e) => {
                self.notify(AlertKind::Error, format!("Export impossible : {e:#}"));
                None
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Outcomes
    // ─────────────────────────────────────────────────────────────────────────

    /// Fold an outcome into state, returning the loads it triggers
    pub fn apply(&mut self, outcome: Outcome) -> Vec<Pending> {
        if outcome.epoch().is_some_and(|epoch| epoch != self.epoch) {
            tracing::debug!("Discarded outcome from a previous session");
            return Vec::new();
        }
        match outcome {
            Outcome::Auth { mode, result } => {
                self.busy.auth = false;
                match result {
                    Ok(auth) => self.on_authenticated(auth),
                    Err(e) => {
                        tracing::debug!("{:?} failed: {}", mode, e);
                        self.notify(AlertKind::Error, e.user_message("Erreur de connexion"));
                        Vec::new()
                    }
                }
            }

            Outcome::Products { generation, result } => {
                if generation != self.products.generation() {
                    tracing::debug!("Discarded stale products response (gen {})", generation);
                    return Vec::new();
                }
                let result = self.collection_result(Collection::Products, result);
                self.products.settle(generation, result);
                Vec::new()
            }
            Outcome::Sheets { generation, result } => {
                if generation != self.sheets.generation() {
                    tracing::debug!("Discarded stale sheets response (gen {})", generation);
                    return Vec::new();
                }
                let result = self.collection_result(Collection::Sheets, result);
                self.sheets.settle(generation, result);
                Vec::new()
            }
            Outcome::Stats { generation, result } => {
                if generation != self.stats.generation() {
                    tracing::debug!("Discarded stale stats response (gen {})", generation);
                    return Vec::new();
                }
                let result = self.collection_result(Collection::Stats, result);
                self.stats.settle(generation, result);
                Vec::new()
            }

            Outcome::Generated { also_sheet, result, .. } => {
                self.busy.generating = false;
                match result {
                    Ok(response) => {
                        let count = response.search_summary.results_count;
                        self.last_search = Some(response.search_summary);
                        let tab = if also_sheet { Tab::Sheets } else { Tab::Products };
                        self.tab = tab;
                        self.visited.insert(tab);
                        self.notify(
                            AlertKind::Success,
                            format!("Produit généré avec succès ! {count} résultats analysés"),
                        );
                        self.reload(&[Collection::Products, Collection::Sheets])
                    }
                    Err(e) => {
                        self.notify(
                            AlertKind::Error,
                            e.user_message("Erreur lors de la génération du produit"),
                        );
                        Vec::new()
                    }
                }
            }

            Outcome::Deleted { id, result, .. } => {
                self.busy.deleting = false;
                match result {
                    Ok(()) => {
                        if self.detail.selected == Some(DetailTarget::Product(id)) {
                            self.close_details();
                        }
                        self.notify(AlertKind::Success, "✅ Produit supprimé avec succès");
                        self.reload(&[Collection::Products, Collection::Sheets, Collection::Stats])
                    }
                    Err(e) => {
                        tracing::warn!("Delete of {} failed: {}", id, e);
                        self.notify(AlertKind::Error, "❌ Erreur lors de la suppression");
                        Vec::new()
                    }
                }
            }

            Outcome::SheetCreated { product_id, result, .. } => match result {
                Ok(sheet) => {
                    tracing::info!("Sheet {} created for product {}", sheet.id, product_id);
                    self.notify(AlertKind::Success, "Fiche produit générée avec succès !");
                    self.reload(&[Collection::Sheets, Collection::Stats])
                }
                Err(e) => {
                    self.notify(
                        AlertKind::Error,
                        e.user_message("Erreur lors de la génération de la fiche"),
                    );
                    Vec::new()
                }
            },

            Outcome::Exported {
                sheet_id,
                format,
                result,
                ..
            } => {
                match result {
                    Ok(payload) => match export::write_sheet_payload(
                        &self.settings.export_dir,
                        &sheet_id,
                        &format,
                        &payload,
                    ) {
                        Ok(path) => {
                            self.notify(
                                AlertKind::Success,
                                format!("Fiche exportée : {}", path.display()),
                            );
                            self.last_export = Some(path);
                        }
                        Err(e) => {
                            self.notify(AlertKind::Error, format!("Export impossible : {e:#}"))
                        }
                    },
                    Err(e) => self.notify(
                        AlertKind::Error,
                        e.user_message("Erreur lors de l'export de la fiche"),
                    ),
                }
                Vec::new()
            }

            Outcome::ProductCreated { result, .. } => {
                self.busy.creating = false;
                match result {
                    Ok(product) => {
                        self.preview = Some(product);
                        self.notify(AlertKind::Success, "Fiche produit générée avec succès !");
                        self.reload(&[Collection::Products, Collection::Stats])
                    }
                    Err(e) => {
                        self.notify(
                            AlertKind::Error,
                            e.user_message("Erreur lors de la génération de la fiche"),
                        );
                        Vec::new()
                    }
                }
            }

            Outcome::ImageUploaded { result, .. } => {
                self.busy.uploading = false;
                match result {
                    Ok(url) => {
                        self.form.set_image(url);
                        self.notify(AlertKind::Success, "Image téléchargée");
                    }
                    Err(e) => {
                        tracing::warn!("Upload failed: {}", e);
                        self.notify(
                            AlertKind::Error,
                            "Erreur lors du téléchargement de l'image",
                        );
                    }
                }
                Vec::new()
            }
        }
    }

    fn on_authenticated(&mut self, auth: AuthResponse) -> Vec<Pending> {
        let session = Session {
            token: auth.access_token,
            user: auth.user,
        };
        if let Err(e) = self.store.save(&session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
        self.api.set_token(&session.token);
        self.login_form.password.clear();
        self.notify(
            AlertKind::Success,
            format!("Bienvenue {} !", session.user.username),
        );
        self.session = SessionState::Authenticated(session.user);
        self.initial_load()
    }

    /// Report a collection failure and turn the error into its message
    fn collection_result<T>(
        &mut self,
        collection: Collection,
        result: Result<T, ApiError>,
    ) -> Result<T, String> {
        result.map_err(|e| {
            let message = e.user_message(collection.error_message());
            self.notify(AlertKind::Error, message.clone());
            message
        })
    }

    /// Run pendings without their follow-up loads
    pub async fn drive_once(&mut self, pending: Vec<Pending>) {
        for next in pending {
            let outcome = next.await;
            drop(self.apply(outcome));
        }
    }

    /// Run pendings and every follow-up in order, one request at a time
    pub async fn drive(&mut self, pending: Vec<Pending>) {
        let mut queue: VecDeque<Pending> = pending.into();
        while let Some(next) = queue.pop_front() {
            let outcome = next.await;
            queue.extend(self.apply(outcome));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoBackend;
    use crate::session::MemorySessionStore;

    const EAN: &str = "3614270357637";

    fn settings(lazy_tabs: bool) -> ControllerSettings {
        ControllerSettings {
            lazy_tabs,
            ..ControllerSettings::default()
        }
    }

    async fn anonymous(lazy_tabs: bool) -> (DemoBackend, Controller, Arc<MemorySessionStore>) {
        let backend = DemoBackend::spawn().await.unwrap();
        let store = Arc::new(MemorySessionStore::default());
        let controller = Controller::new(
            ApiClient::new(backend.base_url()),
            store.clone(),
            settings(lazy_tabs),
        );
        (backend, controller, store)
    }

    async fn logged_in(lazy_tabs: bool) -> (DemoBackend, Controller, Arc<MemorySessionStore>) {
        let (backend, mut c, store) = anonymous(lazy_tabs).await;
        c.login_form.username = "demo".to_string();
        c.login_form.password = "demo".to_string();
        let pending = c.login();
        c.drive(pending).await;
        assert!(c.is_authenticated());
        backend.clear_requests();
        (backend, c, store)
    }

    #[tokio::test]
    async fn empty_username_issues_no_request() {
        let (backend, mut c, _) = anonymous(false).await;
        c.login_form.password = "demo".to_string();

        assert!(c.login().is_empty());
        assert!(backend.requests().is_empty());
        assert_eq!(c.alert.as_ref().map(|a| a.kind), Some(AlertKind::Warning));
        assert!(!c.is_authenticated());
    }

    #[tokio::test]
    async fn login_persists_session_and_loads_everything() {
        let (backend, mut c, store) = anonymous(false).await;
        c.login_form.username = "demo".to_string();
        c.login_form.password = "demo".to_string();
        let pending = c.login();
        c.drive(pending).await;

        assert_eq!(
            backend.requests(),
            vec![
                "POST /login",
                "GET /products?limit=50",
                "GET /sheets?limit=50",
                "GET /stats",
            ]
        );
        assert_eq!(store.load().unwrap().unwrap().user.username, "demo");
        assert!(c.login_form.password.is_empty());
        assert!(c.products.is_loaded() && c.sheets.is_loaded() && c.stats.is_loaded());
        assert_eq!(c.alert.as_ref().unwrap().message, "Bienvenue demo !");
    }

    #[tokio::test]
    async fn bad_credentials_show_server_detail() {
        let (_backend, mut c, store) = anonymous(false).await;
        c.login_form.username = "demo".to_string();
        c.login_form.password = "wrong".to_string();
        let pending = c.login();
        c.drive(pending).await;

        assert!(!c.is_authenticated());
        assert!(store.load().unwrap().is_none());
        assert_eq!(c.alert.as_ref().unwrap().message, "Identifiants invalides");
    }

    #[tokio::test]
    async fn register_then_authenticated() {
        let (_backend, mut c, _) = anonymous(false).await;
        c.login_form.toggle_mode();
        c.login_form.username = "alice".to_string();
        c.login_form.email = "alice@example.com".to_string();
        c.login_form.password = "pw".to_string();
        let pending = c.login();
        c.drive(pending).await;

        assert_eq!(c.session.user().map(|u| u.username.as_str()), Some("alice"));
    }

    #[tokio::test]
    async fn ean_generation_reloads_twice_and_switches_to_sheets() {
        let (backend, mut c, _) = logged_in(false).await;
        let sheets_before = c.sheets.data().len();

        let pending = c.generate_from_ean(EAN, true);
        c.drive(pending).await;

        assert_eq!(
            backend.requests(),
            vec![
                "POST /generate/product",
                "GET /products?limit=50",
                "GET /sheets?limit=50",
            ]
        );
        assert_eq!(c.tab, Tab::Sheets);
        assert_eq!(c.sheets.data().len(), sheets_before + 1);
        assert!(c.last_search.is_some());
        assert!(!c.busy.generating);
    }

    #[tokio::test]
    async fn ean_generation_without_sheet_switches_to_products() {
        let (_backend, mut c, _) = logged_in(false).await;
        let pending = c.generate_from_ean(EAN, false);
        c.drive(pending).await;
        assert_eq!(c.tab, Tab::Products);
    }

    #[tokio::test]
    async fn invalid_ean_leaves_state_untouched() {
        let (backend, mut c, _) = logged_in(false).await;
        let products = c.products.data().clone();

        let pending = c.generate_from_ean("123", true);
        c.drive(pending).await;

        assert_eq!(backend.requests(), vec!["POST /generate/product"]);
        assert_eq!(c.tab, Tab::Search);
        assert_eq!(c.products.data(), &products);
        assert_eq!(c.alert.as_ref().unwrap().message, "Code EAN invalide");
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let (backend, mut c, _) = logged_in(false).await;
        let id = c.products.data()[0].id.clone();

        c.request_delete(&id);
        assert!(c.confirmation.as_ref().unwrap().prompt().starts_with("Êtes-vous sûr"));
        c.cancel_confirm();
        assert!(c.confirm().is_empty());
        assert!(backend.requests().is_empty());
    }

    #[tokio::test]
    async fn confirmed_delete_reloads_all_collections() {
        let (backend, mut c, _) = logged_in(false).await;
        let id = c.products.data()[0].id.clone();

        c.request_delete(&id);
        let pending = c.confirm();
        c.drive(pending).await;

        assert!(c.product(&id).is_none());
        assert_eq!(
            backend.requests(),
            vec![
                format!("DELETE /products/{id}"),
                "GET /products?limit=50".to_string(),
                "GET /sheets?limit=50".to_string(),
                "GET /stats".to_string(),
            ]
        );
        assert_eq!(
            c.alert.as_ref().unwrap().message,
            "✅ Produit supprimé avec succès"
        );
    }

    #[tokio::test]
    async fn failed_delete_keeps_product() {
        let (backend, mut c, _) = logged_in(false).await;
        backend.fail_route("DELETE /products");
        let id = c.products.data()[0].id.clone();

        c.request_delete(&id);
        let pending = c.confirm();
        c.drive(pending).await;

        assert!(c.product(&id).is_some());
        assert_eq!(backend.requests().len(), 1);
        assert_eq!(c.alert.as_ref().unwrap().kind, AlertKind::Error);
        assert_eq!(backend.product_count(), 2);
    }

    #[tokio::test]
    async fn stale_list_response_is_discarded() {
        let (backend, mut c, _) = logged_in(false).await;
        let api = ApiClient::new(backend.base_url());
        let auth = api.login("demo", "demo").await.unwrap();
        api.set_token(&auth.access_token);

        let older = c.load(Collection::Products);
        let newer = c.load(Collection::Products);

        let outcome = newer.await;
        c.apply(outcome);
        let fresh = c.products.data().len();

        // The older request observes a newer backend state but must lose
        api.generate_from_ean(EAN, false).await.unwrap();
        let outcome = older.await;
        c.apply(outcome);

        assert_eq!(c.products.data().len(), fresh);
    }

    #[tokio::test]
    async fn reload_is_idempotent() {
        let (_backend, mut c, _) = logged_in(false).await;
        let first = c.products.data().clone();
        let pending = c.reload(&[Collection::Products]);
        c.drive(pending).await;
        assert_eq!(c.products.data(), &first);
    }

    #[tokio::test]
    async fn collections_fail_independently() {
        let (backend, mut c, _) = logged_in(false).await;
        backend.fail_route("GET /stats");
        let pending = c.reload(&[Collection::Products, Collection::Stats]);
        c.drive(pending).await;

        assert!(c.products.error().is_none());
        assert!(c.stats.error().is_some());
        assert!(c.stats.is_loaded());
    }

    #[tokio::test]
    async fn lazy_tabs_load_once_on_first_entry() {
        let (backend, mut c, _) = anonymous(true).await;
        c.login_form.username = "demo".to_string();
        c.login_form.password = "demo".to_string();
        let pending = c.login();
        c.drive(pending).await;
        assert_eq!(backend.requests(), vec!["POST /login", "GET /stats"]);
        assert!(!c.products.is_loaded());

        let pending = c.set_tab(Tab::Products);
        assert_eq!(pending.len(), 1);
        c.drive(pending).await;
        assert!(c.products.is_loaded());

        assert!(c.set_tab(Tab::Search).is_empty());
        assert!(c.set_tab(Tab::Products).is_empty());
    }

    #[tokio::test]
    async fn eager_tabs_never_load_on_switch() {
        let (_backend, mut c, _) = logged_in(false).await;
        assert!(c.set_tab(Tab::Sheets).is_empty());
        assert_eq!(c.tab, Tab::Sheets);
    }

    #[tokio::test]
    async fn restore_uses_stored_session() {
        let backend = DemoBackend::spawn().await.unwrap();
        let api = ApiClient::new(backend.base_url());
        let auth = api.login("demo", "demo").await.unwrap();
        let store = Arc::new(MemorySessionStore::with_session(Session {
            token: auth.access_token,
            user: auth.user,
        }));

        let mut c = Controller::new(
            ApiClient::new(backend.base_url()),
            store,
            settings(false),
        );
        let pending = c.restore();
        c.drive(pending).await;

        assert!(c.is_authenticated());
        assert!(c.products.error().is_none());
        assert!(!c.products.data().is_empty());
    }

    #[tokio::test]
    async fn logout_resets_everything() {
        let (_backend, mut c, store) = logged_in(false).await;
        c.set_tab(Tab::Sheets);
        c.open_details(DetailTarget::Sheet("x".to_string()));

        c.logout();

        assert!(!c.is_authenticated());
        assert!(store.load().unwrap().is_none());
        assert_eq!(c.tab, Tab::Search);
        assert!(c.products.data().is_empty());
        assert_eq!(c.detail, DetailState::default());
        assert_eq!(c.alert.as_ref().unwrap().message, "Déconnexion réussie");
    }

    #[tokio::test]
    async fn generation_settling_after_logout_is_ignored() {
        let (backend, mut c, _) = logged_in(false).await;
        let pending = c.generate_from_ean(EAN, true);
        c.logout();

        let mut follow_ups = Vec::new();
        for next in pending {
            let outcome = next.await;
            follow_ups.extend(c.apply(outcome));
        }

        assert!(follow_ups.is_empty());
        assert_eq!(c.tab, Tab::Search);
        assert!(c.last_search.is_none());
        assert_eq!(c.alert.as_ref().unwrap().message, "Déconnexion réussie");
        assert_eq!(backend.requests().len(), 1);
    }

    #[tokio::test]
    async fn sheet_generation_reloads_sheets_and_stats() {
        let (backend, mut c, _) = logged_in(false).await;
        let id = c.products.data()[0].id.clone();

        let pending = c.generate_sheet_for_product(&id);
        c.drive(pending).await;

        assert_eq!(
            backend.requests(),
            vec!["POST /sheets", "GET /sheets?limit=50", "GET /stats"]
        );
    }

    #[tokio::test]
    async fn export_writes_payload_file() {
        let (backend, mut c, _) = logged_in(false).await;
        let dir = tempfile::tempdir().unwrap();
        c.settings.export_dir = dir.path().to_path_buf();
        let sheet_id = c.sheets.data()[0].id.clone();

        let pending = c.export_sheet(&sheet_id, "prestashop");
        c.drive(pending).await;

        let path = c.last_export.clone().unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            export::sheet_file_name(&sheet_id, "prestashop")
        );
        assert!(path.exists());
        assert_eq!(
            backend.requests(),
            vec![format!("GET /sheets/{sheet_id}/export?format=prestashop")]
        );
    }

    #[tokio::test]
    async fn manual_creation_validates_then_previews() {
        let (backend, mut c, _) = logged_in(false).await;
        assert!(c.create_product().is_empty());
        assert_eq!(
            c.alert.as_ref().unwrap().message,
            "Veuillez remplir tous les champs obligatoires"
        );
        assert!(backend.requests().is_empty());

        c.form.name = "Polo".to_string();
        c.form.brand = "Lacoste".to_string();
        c.form.set_category("polos");
        c.form.set_gender("homme");
        c.form.price = "89".to_string();
        let pending = c.create_product();
        c.drive(pending).await;

        let preview = c.preview.as_ref().unwrap();
        assert_eq!(export::display_title(preview), "Lacoste Polo");
        assert!(c.preview_clipboard_text().unwrap().starts_with("Lacoste Polo\n89.00€"));
        assert_eq!(
            backend.requests(),
            vec!["POST /products", "GET /products?limit=50", "GET /stats"]
        );
    }

    #[tokio::test]
    async fn preview_exports_need_a_preview() {
        let (_backend, mut c, _) = logged_in(false).await;
        assert!(c.export_preview_html().is_none());
        assert_eq!(c.alert.as_ref().unwrap().kind, AlertKind::Warning);
    }

    #[tokio::test]
    async fn upload_sets_single_image() {
        let (_backend, mut c, _) = logged_in(false).await;
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shoe.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();
        c.form.images = vec!["old".to_string()];

        let pending = c.upload_image(path);
        c.drive(pending).await;

        assert_eq!(c.form.images.len(), 1);
        assert!(c.form.images[0].starts_with("/uploads/"));
    }

    #[tokio::test]
    async fn product_search_is_case_insensitive() {
        let (_backend, c, _) = logged_in(false).await;
        assert_eq!(c.visible_products("").len(), c.products.data().len());
        assert_eq!(c.visible_products("CAPUCHE").len(), 1);
        assert!(c.visible_products("zzz").is_empty());
    }
}
