//! HTTP client adapter for the product-sheet backend
//!
//! Thin wrapper over `reqwest` that knows the `/api` routes and attaches the
//! bearer token once a session exists. It deliberately has no retry, backoff or
//! timeout policy: every failure is handed back to the controller, which turns
//! it into an alert.
//!
//! # Errors
//!
//! Non-2xx responses become [`ApiError::Status`] carrying the backend's
//! `detail` string when the body has one (FastAPI style `{"detail": "..."}`).

pub mod types;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::{Arc, RwLock};
use thiserror::Error;

use types::{
    AuthResponse, ExportPayload, GenerateRequest, GenerateResponse, LoginRequest, Product,
    ProductDraft, ProductSheet, RegisterRequest, SheetRequest, Stats, UploadResponse,
};

/// Errors surfaced by backend calls
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ApiError {
    /// Backend answered with a non-2xx status
    #[error("HTTP {status}{}", .detail.as_ref().map(|d| format!(": {d}")).unwrap_or_default())]
    Status { status: u16, detail: Option<String> },

    /// Request never got an HTTP answer (DNS, refused connection, TLS...)
    #[error("network error: {0}")]
    Transport(String),

    /// 2xx answer whose body did not match the expected shape
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Local file could not be read before upload
    #[error("cannot read {path}: {message}")]
    File { path: String, message: String },
}

impl ApiError {
    /// Server-provided detail message, if any
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// Message for the user: server detail when present, fallback otherwise
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail().unwrap_or(fallback).to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Backend client
///
/// Cloning is cheap: the connection pool and the token slot are shared, so a
/// token installed on one clone is seen by requests issued from any other.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: Arc::from(base_url.as_ref().trim_end_matches('/')),
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Install the default `Authorization: Bearer` header
    pub fn set_token(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    /// Remove the default `Authorization` header
    pub fn clear_token(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.read().map(|t| t.is_some()).unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        tracing::debug!("{} {}", method, url);
        let builder = self.http.request(method, url);
        let token = self.token.read().ok().and_then(|t| t.clone());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Map a non-2xx response to `ApiError::Status`, keeping the detail message
    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from));

        tracing::warn!("Backend returned {}: {}", status, detail.as_deref().unwrap_or(body.as_str()));

        Err(ApiError::Status {
            status: status.as_u16(),
            detail,
        })
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = Self::check(builder.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_discard(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authentication
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = LoginRequest { username, password };
        self.send(self.request(Method::POST, "/login").json(&body))
            .await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        let body = RegisterRequest {
            username,
            email,
            password,
        };
        self.send(self.request(Method::POST, "/register").json(&body))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Products
    // ─────────────────────────────────────────────────────────────────────────

    /// Upload an image file as multipart field `file`, returns its public URL
    pub async fn upload_image(&self, path: &Path) -> Result<String, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|e| ApiError::File {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(image_mime(path))
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response: UploadResponse = self
            .send(self.request(Method::POST, "/upload-image").multipart(form))
            .await?;
        Ok(response.image_url)
    }

    pub async fn create_product(&self, draft: &ProductDraft) -> Result<Product, ApiError> {
        self.send(self.request(Method::POST, "/products").json(draft))
            .await
    }

    pub async fn list_products(&self, limit: Option<u32>) -> Result<Vec<Product>, ApiError> {
        let mut builder = self.request(Method::GET, "/products");
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit)]);
        }
        self.send(builder).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<(), ApiError> {
        self.send_discard(self.request(Method::DELETE, &format!("/products/{id}")))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sheets
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn create_sheet(
        &self,
        product_id: &str,
        generate_with_ai: bool,
    ) -> Result<ProductSheet, ApiError> {
        let body = SheetRequest {
            product_id,
            generate_with_ai,
        };
        self.send(self.request(Method::POST, "/sheets").json(&body))
            .await
    }

    pub async fn list_sheets(&self, limit: Option<u32>) -> Result<Vec<ProductSheet>, ApiError> {
        let mut builder = self.request(Method::GET, "/sheets");
        if let Some(limit) = limit {
            builder = builder.query(&[("limit", limit)]);
        }
        self.send(builder).await
    }

    pub async fn export_sheet(&self, id: &str, format: &str) -> Result<ExportPayload, ApiError> {
        let builder = self
            .request(Method::GET, &format!("/sheets/{id}/export"))
            .query(&[("format", format)]);
        self.send(builder).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Generation and dashboard
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn generate_from_ean(
        &self,
        ean_code: &str,
        generate_sheet: bool,
    ) -> Result<GenerateResponse, ApiError> {
        let body = GenerateRequest {
            ean_code,
            generate_sheet,
        };
        self.send(self.request(Method::POST, "/generate/product").json(&body))
            .await
    }

    pub async fn stats(&self) -> Result<Stats, ApiError> {
        self.send(self.request(Method::GET, "/stats")).await
    }
}

/// MIME type from the file extension (backend only accepts images)
fn image_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::DemoBackend;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("http://localhost:8001/api/");
        assert_eq!(api.base_url(), "http://localhost:8001/api");
        assert_eq!(api.url("/products"), "http://localhost:8001/api/products");
    }

    #[test]
    fn token_is_shared_between_clones() {
        let api = ApiClient::new("http://localhost:8001/api");
        let clone = api.clone();
        api.set_token("abc");
        assert!(clone.has_token());
        clone.clear_token();
        assert!(!api.has_token());
    }

    #[test]
    fn user_message_prefers_server_detail() {
        let with_detail = ApiError::Status {
            status: 401,
            detail: Some("Identifiants invalides".to_string()),
        };
        assert_eq!(
            with_detail.user_message("Erreur de connexion"),
            "Identifiants invalides"
        );

        let without = ApiError::Transport("connection refused".to_string());
        assert_eq!(without.user_message("Erreur de connexion"), "Erreur de connexion");
    }

    #[test]
    fn image_mime_from_extension() {
        assert_eq!(image_mime(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(image_mime(Path::new("a")), "application/octet-stream");
    }

    #[tokio::test]
    async fn protected_routes_require_token() {
        let backend = DemoBackend::spawn().await.unwrap();
        let api = ApiClient::new(backend.base_url());

        let err = api.list_products(None).await.unwrap_err();
        assert_eq!(err.detail(), Some("Non authentifié"));
        assert!(matches!(err, ApiError::Status { status: 401, .. }));

        let auth = api.login("demo", "demo").await.unwrap();
        api.set_token(&auth.access_token);
        assert!(api.list_products(Some(10)).await.unwrap().len() <= 10);
    }

    #[tokio::test]
    async fn delete_unknown_product_surfaces_detail() {
        let backend = DemoBackend::spawn().await.unwrap();
        let api = ApiClient::new(backend.base_url());
        let auth = api.login("demo", "demo").await.unwrap();
        api.set_token(&auth.access_token);

        let err = api.delete_product("missing").await.unwrap_err();
        assert_eq!(err.detail(), Some("Produit non trouvé"));
    }

    #[tokio::test]
    async fn export_sheet_requests_prestashop_format() {
        let backend = DemoBackend::spawn().await.unwrap();
        let api = ApiClient::new(backend.base_url());
        let auth = api.login("demo", "demo").await.unwrap();
        api.set_token(&auth.access_token);

        let generated = api.generate_from_ean("3614270357637", true).await.unwrap();
        let sheet = generated.product_sheet.unwrap();
        let payload = api.export_sheet(&sheet.id, "prestashop").await.unwrap();
        assert_eq!(payload.format, "prestashop");
        assert!(backend
            .requests()
            .iter()
            .any(|r| r == &format!("GET /sheets/{}/export?format=prestashop", sheet.id)));
    }
}
