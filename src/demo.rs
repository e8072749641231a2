// Demo mode: in-process mock of the product-sheet backend
//
// Serves the same `/api` routes the client consumes, backed by in-memory
// collections, so the TUI can be showcased without the real service and the
// controller can be exercised end to end in tests.
//
// Generation is fake but deterministic: an EAN always maps to the same brand
// and category.
//
// Run with: FICHEGEN_DEMO=1 cargo run --release   (or `fichegen --demo`)

use crate::api::types::{
    ApiStatus, GeneratedContent, Product, ProductDraft, ProductSheet, SearchSummary, SheetStatus,
    Stats, User,
};
use crate::catalog;
use anyhow::{Context, Result};
use axum::{
    extract::{Multipart, Path, Query, Request, State},
    http::{HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Account seeded into every demo backend
pub const DEMO_USERNAME: &str = "demo";
pub const DEMO_PASSWORD: &str = "demo";

type Shared = Arc<Mutex<DemoState>>;
type Reply<T> = Result<Json<T>, (StatusCode, Json<Value>)>;

#[derive(Default)]
struct DemoState {
    seed: String,
    counter: u64,
    /// username -> (email, password)
    users: HashMap<String, (String, String)>,
    /// token -> username
    tokens: HashMap<String, String>,
    products: Vec<Product>,
    sheets: Vec<ProductSheet>,
    searches: u64,
    /// "METHOD /path?query" per request, `/api` prefix stripped
    requests: Vec<String>,
    /// Request prefixes answered with a 500
    failing: Vec<String>,
}

impl DemoState {
    fn seeded() -> Self {
        let mut state = Self {
            seed: Utc::now().to_rfc3339(),
            ..Self::default()
        };
        state.users.insert(
            DEMO_USERNAME.to_string(),
            ("demo@dmsports.fr".to_string(), DEMO_PASSWORD.to_string()),
        );

        let hoodie = state.product_from_draft(ProductDraft {
            name: "Sweat à capuche Club".to_string(),
            brand: "Nike".to_string(),
            category: "sweats".to_string(),
            gender: "homme".to_string(),
            price: 59.99,
            old_price: Some(69.99),
            sku: "REF-001".to_string(),
            sizes: vec!["S".to_string(), "M".to_string(), "L".to_string()],
            colors: vec!["Noir".to_string(), "Gris".to_string()],
            material: "Coton/Polyester".to_string(),
            ..ProductDraft::default()
        });
        let runner = state.product_from_ean("0195866137738");
        let sheet = state.sheet_for(&runner);

        state.products.push(hoodie);
        state.products.push(runner);
        state.sheets.push(sheet);
        state
    }

    fn next_id(&mut self) -> String {
        self.counter += 1;
        let mut hasher = Sha256::new();
        hasher.update(self.seed.as_bytes());
        hasher.update(self.counter.to_le_bytes());
        hasher
            .finalize()
            .iter()
            .take(12)
            .map(|b| format!("{b:02x}"))
            .collect()
    }

    fn issue_token(&mut self, username: &str) -> String {
        let token = format!("demo-{}", self.next_id());
        self.tokens.insert(token.clone(), username.to_string());
        token
    }

    fn product_from_draft(&mut self, draft: ProductDraft) -> Product {
        let title = format!("{} {}", draft.brand, draft.name);
        let mut description = format!(
            "<p>Découvrez le {} de {}, pensé pour le quotidien.</p>",
            draft.name, draft.brand
        );
        if !draft.features.is_empty() {
            description.push_str("<h4>Points forts</h4><ul>");
            for feature in &draft.features {
                description.push_str(&format!("<li>{feature}</li>"));
            }
            description.push_str("</ul>");
        }

        let mut characteristics = BTreeMap::new();
        if !draft.material.is_empty() {
            characteristics.insert("Matière".to_string(), draft.material.clone());
        }
        if !draft.season.is_empty() {
            characteristics.insert("Saison".to_string(), draft.season.clone());
        }

        Product {
            id: self.next_id(),
            title: draft.name,
            brand: draft.brand,
            category: draft.category,
            gender: Some(draft.gender),
            price: Some(draft.price),
            old_price: draft.old_price,
            sku: Some(draft.sku),
            description: Some(description.clone()),
            sizes: draft.sizes,
            colors: draft.colors,
            images: draft.images,
            characteristics,
            generated_content: Some(GeneratedContent { title, description }),
            created_at: Some(Utc::now()),
            ..Product::default()
        }
    }

    fn product_from_ean(&mut self, ean: &str) -> Product {
        let digest = Sha256::digest(ean.as_bytes());
        let pick = |n: usize| digest[0] as usize % n;
        let brand = catalog::BRANDS[pick(catalog::BRANDS.len())];
        let category = catalog::shoe_categories()[pick(catalog::shoe_categories().len())];
        let model = format!("Modèle {}", &ean[ean.len().saturating_sub(4)..]);
        let price = 59.99 + f64::from(digest[1] % 8) * 10.0;

        let mut characteristics = BTreeMap::new();
        characteristics.insert("Marque".to_string(), brand.to_string());
        characteristics.insert("EAN".to_string(), ean.to_string());

        Product {
            id: self.next_id(),
            title: format!("{brand} {model}"),
            brand: brand.to_string(),
            category: category.to_string(),
            gender: Some("unisexe".to_string()),
            price: Some(price),
            ean_code: Some(ean.to_string()),
            model: Some(model),
            color: Some("Noir".to_string()),
            description: Some(format!(
                "<p>{brand} référence {ean}, fiche enrichie automatiquement.</p>"
            )),
            sizes: catalog::sizes_for(category, "unisexe")
                .iter()
                .map(|s| s.to_string())
                .collect(),
            characteristics,
            created_at: Some(Utc::now()),
            ..Product::default()
        }
    }

    fn sheet_for(&mut self, product: &Product) -> ProductSheet {
        let reference_src = product.ean_code.as_deref().unwrap_or(&product.id);
        let reference = format!(
            "REF-{}",
            &reference_src[reference_src.len().saturating_sub(8)..]
        );
        let description = product.description.clone().unwrap_or_default();
        let mut seo_description: String = description.chars().take(155).collect();
        seo_description.push_str("...");

        let weight_info = [
            ("baskets", 1.0),
            ("ensemble", 0.75),
            ("sweat", 0.5),
            ("t-shirt", 0.25),
            ("maroquinerie", 0.3),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        ProductSheet {
            id: self.next_id(),
            product_id: product.id.clone(),
            title: product.title.clone(),
            reference,
            description,
            characteristics: product.characteristics.clone(),
            seo_title: format!("{} - {}", product.title, product.brand),
            seo_description,
            price_ttc: Some(product.price.unwrap_or(99.99)),
            status: SheetStatus::Draft,
            weight_info,
            created_at: Some(Utc::now()),
        }
    }
}

fn lock(state: &Shared) -> MutexGuard<'_, DemoState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn fail(status: StatusCode, detail: &str) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "detail": detail })))
}

fn authorize(state: &Shared, headers: &HeaderMap) -> Result<String, (StatusCode, Json<Value>)> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    token
        .and_then(|t| lock(state).tokens.get(t).cloned())
        .ok_or_else(|| fail(StatusCode::UNAUTHORIZED, "Non authentifié"))
}

/// Running mock backend; the server task stops when this is dropped
pub struct DemoBackend {
    addr: SocketAddr,
    state: Shared,
    handle: JoinHandle<()>,
}

impl DemoBackend {
    /// Bind an ephemeral local port and start serving
    pub async fn spawn() -> Result<Self> {
        let state: Shared = Arc::new(Mutex::new(DemoState::seeded()));
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .context("Failed to bind demo backend")?;
        let addr = listener
            .local_addr()
            .context("Failed to read demo backend address")?;

        let app = router(state.clone());
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("Demo backend stopped: {}", e);
            }
        });

        tracing::info!("Demo backend listening on http://{}/api", addr);

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    /// Requests seen so far, oldest first
    pub fn requests(&self) -> Vec<String> {
        lock(&self.state).requests.clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.state).requests.clear();
    }

    /// Answer every request starting with `prefix` (e.g. `"DELETE /products"`) with a 500
    pub fn fail_route(&self, prefix: &str) {
        lock(&self.state).failing.push(prefix.to_string());
    }

    pub fn product_count(&self) -> usize {
        lock(&self.state).products.len()
    }
}

impl Drop for DemoBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router(state: Shared) -> Router {
    let api = Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/upload-image", post(upload_image))
        .route("/products", post(create_product).get(list_products))
        .route("/products/:id", delete(delete_product))
        .route("/sheets", post(create_sheet).get(list_sheets))
        .route("/sheets/:id/export", get(export_sheet))
        .route("/generate/product", post(generate_product))
        .route("/stats", get(stats));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Request log + failure injection
async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let path = path.strip_prefix("/api").unwrap_or(path);
    let entry = match req.uri().query() {
        Some(q) => format!("{} {}?{}", req.method(), path, q),
        None => format!("{} {}", req.method(), path),
    };

    let failing = {
        let mut state = lock(&state);
        let failing = state.failing.iter().any(|p| entry.starts_with(p.as_str()));
        state.requests.push(entry);
        failing
    };

    if failing {
        return fail(StatusCode::INTERNAL_SERVER_ERROR, "Erreur simulée").into_response();
    }
    next.run(req).await
}

// ─────────────────────────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct Credentials {
    username: String,
    #[serde(default)]
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct ListQuery {
    limit: Option<usize>,
}

#[derive(Deserialize)]
struct ExportQuery {
    format: Option<String>,
}

#[derive(Deserialize)]
struct SheetBody {
    product_id: String,
    #[serde(default)]
    generate_with_ai: bool,
}

#[derive(Deserialize)]
struct GenerateBody {
    ean_code: String,
    #[serde(default = "default_true")]
    generate_sheet: bool,
}

fn default_true() -> bool {
    true
}

async fn login(State(state): State<Shared>, Json(body): Json<Credentials>) -> Reply<Value> {
    let mut state = lock(&state);
    let Some((email, password)) = state.users.get(&body.username).cloned() else {
        return Err(fail(StatusCode::UNAUTHORIZED, "Identifiants invalides"));
    };
    if password != body.password {
        return Err(fail(StatusCode::UNAUTHORIZED, "Identifiants invalides"));
    }
    let token = state.issue_token(&body.username);
    let user = User {
        username: body.username,
        email,
    };
    Ok(Json(json!({ "access_token": token, "user": user })))
}

async fn register(State(state): State<Shared>, Json(body): Json<Credentials>) -> Reply<Value> {
    let mut state = lock(&state);
    if state.users.contains_key(&body.username) {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Nom d'utilisateur déjà utilisé",
        ));
    }
    state.users.insert(
        body.username.clone(),
        (body.email.clone(), body.password.clone()),
    );
    let token = state.issue_token(&body.username);
    let user = User {
        username: body.username,
        email: body.email,
    };
    Ok(Json(json!({ "access_token": token, "user": user })))
}

async fn upload_image(
    State(state): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Reply<Value> {
    authorize(&state, &headers)?;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| fail(StatusCode::BAD_REQUEST, "Fichier illisible"))?;
        if bytes.is_empty() {
            return Err(fail(StatusCode::BAD_REQUEST, "Fichier vide"));
        }
        let id = lock(&state).next_id();
        return Ok(Json(json!({ "image_url": format!("/uploads/{id}-{file_name}") })));
    }
    Err(fail(StatusCode::BAD_REQUEST, "Champ 'file' manquant"))
}

async fn create_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<ProductDraft>,
) -> Reply<Product> {
    authorize(&state, &headers)?;
    let mut state = lock(&state);
    let product = state.product_from_draft(draft);
    state.products.push(product.clone());
    Ok(Json(product))
}

async fn list_products(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply<Vec<Product>> {
    authorize(&state, &headers)?;
    let state = lock(&state);
    let limit = query.limit.unwrap_or(50);
    Ok(Json(state.products.iter().rev().take(limit).cloned().collect()))
}

async fn delete_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Reply<Value> {
    authorize(&state, &headers)?;
    let mut state = lock(&state);
    let before = state.products.len();
    state.products.retain(|p| p.id != id);
    if state.products.len() == before {
        return Err(fail(StatusCode::NOT_FOUND, "Produit non trouvé"));
    }
    state.sheets.retain(|s| s.product_id != id);
    Ok(Json(json!({ "message": "Produit supprimé avec succès" })))
}

async fn create_sheet(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<SheetBody>,
) -> Reply<ProductSheet> {
    authorize(&state, &headers)?;
    let mut state = lock(&state);
    let Some(product) = state
        .products
        .iter()
        .find(|p| p.id == body.product_id)
        .cloned()
    else {
        return Err(fail(StatusCode::NOT_FOUND, "Produit non trouvé"));
    };
    let mut sheet = state.sheet_for(&product);
    if !body.generate_with_ai {
        sheet.seo_title = format!("{} - {}", product.title, product.brand);
    }
    state.sheets.push(sheet.clone());
    Ok(Json(sheet))
}

async fn list_sheets(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Reply<Vec<ProductSheet>> {
    authorize(&state, &headers)?;
    let state = lock(&state);
    let limit = query.limit.unwrap_or(50);
    Ok(Json(state.sheets.iter().rev().take(limit).cloned().collect()))
}

async fn export_sheet(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Reply<Value> {
    authorize(&state, &headers)?;
    let state = lock(&state);
    let Some(sheet) = state.sheets.iter().find(|s| s.id == id) else {
        return Err(fail(StatusCode::NOT_FOUND, "Fiche non trouvée"));
    };

    match query.format.as_deref().unwrap_or("prestashop") {
        "prestashop" => Ok(Json(json!({
            "format": "prestashop",
            "data": {
                "name": sheet.title,
                "reference": sheet.reference,
                "price": sheet.price_ttc,
                "description": sheet.description,
                "meta_title": sheet.seo_title,
                "meta_description": sheet.seo_description,
                "features": sheet.characteristics,
            },
            "instructions": "Importez ces données dans PrestaShop via CSV ou API",
        }))),
        "json" => Ok(Json(json!({ "format": "json", "data": sheet }))),
        _ => Err(fail(StatusCode::BAD_REQUEST, "Format non supporté")),
    }
}

async fn generate_product(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Reply<Value> {
    authorize(&state, &headers)?;
    let ean = body.ean_code.trim();
    if !catalog::is_valid_ean(ean) {
        return Err(fail(StatusCode::BAD_REQUEST, "Code EAN invalide"));
    }

    let mut state = lock(&state);
    state.searches += 1;
    let product = state.product_from_ean(ean);
    let sheet = body.generate_sheet.then(|| state.sheet_for(&product));

    state.products.push(product.clone());
    if let Some(sheet) = &sheet {
        state.sheets.push(sheet.clone());
    }

    let summary = SearchSummary {
        results_count: 3 + u32::from(ean.as_bytes()[0] % 5),
        brands_found: vec![product.brand.clone()],
        category_detected: product.category.clone(),
    };

    Ok(Json(json!({
        "success": true,
        "product": product,
        "product_sheet": sheet,
        "search_summary": summary,
    })))
}

async fn stats(State(state): State<Shared>, headers: HeaderMap) -> Reply<Stats> {
    authorize(&state, &headers)?;
    let state = lock(&state);
    let mut categories = BTreeMap::new();
    for product in &state.products {
        *categories.entry(product.category.clone()).or_insert(0) += 1;
    }
    Ok(Json(Stats {
        total_products: state.products.len() as u64,
        total_sheets: state.sheets.len() as u64,
        total_searches: state.searches,
        categories,
        api_status: ApiStatus {
            openai_configured: false,
            google_configured: false,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ean_generation_is_deterministic() {
        let mut state = DemoState::seeded();
        let a = state.product_from_ean("3614270357637");
        let b = state.product_from_ean("3614270357637");
        assert_eq!(a.brand, b.brand);
        assert_eq!(a.category, b.category);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn sheet_reference_uses_last_eight_digits() {
        let mut state = DemoState::seeded();
        let product = state.product_from_ean("3614270357637");
        let sheet = state.sheet_for(&product);
        assert_eq!(sheet.reference, "REF-70357637");
        assert_eq!(sheet.product_id, product.id);
    }

    #[tokio::test]
    async fn failing_route_answers_500_and_is_logged() {
        let backend = DemoBackend::spawn().await.unwrap();
        backend.fail_route("POST /login");

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/login", backend.base_url()))
            .json(&json!({ "username": "demo", "password": "demo" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        assert_eq!(backend.requests(), vec!["POST /login".to_string()]);
    }
}
