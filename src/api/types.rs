//! Wire types for the product-sheet backend
//!
//! These mirror the backend JSON 1:1. Every struct is `#[serde(default)]` so a
//! missing field never fails a whole list fetch. Timestamps are the one
//! normalization: the backend may send them without an offset.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// Timestamps
// ─────────────────────────────────────────────────────────────────────────────

/// RFC 3339, or a naive ISO timestamp (`2024-03-05T10:00:00.123456`) taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Unreadable timestamps become `None` instead of failing the whole record
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp))
}

// ─────────────────────────────────────────────────────────────────────────────
// Authentication
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub user: User,
}

// ─────────────────────────────────────────────────────────────────────────────
// Products
// ─────────────────────────────────────────────────────────────────────────────

/// AI-generated title and HTML description attached to a manual product
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: String,
    /// Manual products carry `name`, EAN products carry `title`
    #[serde(alias = "name")]
    pub title: String,
    pub brand: String,
    pub category: String,
    pub gender: Option<String>,
    pub price: Option<f64>,
    pub old_price: Option<f64>,
    pub sku: Option<String>,
    pub ean_code: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub color: Option<String>,
    pub images: Vec<String>,
    pub characteristics: BTreeMap<String, String>,
    pub generated_content: Option<GeneratedContent>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Colors as a single list, whichever shape the backend used
    pub fn color_names(&self) -> Vec<String> {
        if !self.colors.is_empty() {
            return self.colors.clone();
        }
        self.color.iter().cloned().collect()
    }
}

/// Manual form submission body for `POST /products`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub gender: String,
    pub price: f64,
    pub old_price: Option<f64>,
    pub sku: String,
    pub description: String,
    pub short_description: String,
    pub material: String,
    pub season: String,
    pub features: Vec<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub images: Vec<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Product sheets
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    #[default]
    Draft,
    Exported,
    Published,
}

impl SheetStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SheetStatus::Draft => "brouillon",
            SheetStatus::Exported => "exportée",
            SheetStatus::Published => "publiée",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductSheet {
    pub id: String,
    pub product_id: String,
    pub title: String,
    pub reference: String,
    pub description: String,
    pub characteristics: BTreeMap<String, String>,
    pub seo_title: String,
    pub seo_description: String,
    pub price_ttc: Option<f64>,
    pub status: SheetStatus,
    pub weight_info: BTreeMap<String, f64>,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SheetRequest<'a> {
    pub product_id: &'a str,
    pub generate_with_ai: bool,
}

/// Payload of `GET /sheets/{id}/export`, kept verbatim for the written file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportPayload {
    pub format: String,
    pub data: serde_json::Value,
    pub instructions: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// EAN generation
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest<'a> {
    pub ean_code: &'a str,
    pub generate_sheet: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSummary {
    pub results_count: u32,
    pub brands_found: Vec<String>,
    pub category_detected: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateResponse {
    pub success: bool,
    pub product: Option<Product>,
    pub product_sheet: Option<ProductSheet>,
    pub search_summary: SearchSummary,
}

// ─────────────────────────────────────────────────────────────────────────────
// Dashboard
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiStatus {
    pub openai_configured: bool,
    pub google_configured: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    pub total_products: u64,
    pub total_sheets: u64,
    pub total_searches: u64,
    pub categories: BTreeMap<String, u64>,
    pub api_status: ApiStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UploadResponse {
    pub image_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_accepts_name_or_title() {
        let manual: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Survêtement","brand":"Nike"}"#).unwrap();
        assert_eq!(manual.title, "Survêtement");

        let ean: Product =
            serde_json::from_str(r#"{"id":"p2","title":"Air Max 90","color":"Noir"}"#).unwrap();
        assert_eq!(ean.title, "Air Max 90");
        assert_eq!(ean.color_names(), vec!["Noir".to_string()]);
    }

    #[test]
    fn sheet_status_defaults_to_draft() {
        let sheet: ProductSheet = serde_json::from_str(r#"{"id":"s1","title":"T"}"#).unwrap();
        assert_eq!(sheet.status, SheetStatus::Draft);

        let exported: ProductSheet =
            serde_json::from_str(r#"{"id":"s2","status":"exported"}"#).unwrap();
        assert_eq!(exported.status, SheetStatus::Exported);
    }

    #[test]
    fn naive_backend_timestamps_decode_as_utc() {
        let products: Vec<Product> = serde_json::from_str(
            r#"[{"id":"p1","title":"Air Max","brand":"Nike","created_at":"2024-03-05T10:00:00.123456"}]"#,
        )
        .unwrap();
        let created = products[0].created_at.unwrap();
        assert_eq!(created.to_rfc3339(), "2024-03-05T10:00:00.123456+00:00");

        let sheets: Vec<ProductSheet> = serde_json::from_str(
            r#"[{"id":"s1","title":"T","created_at":"2024-03-05T10:00:00"}]"#,
        )
        .unwrap();
        assert_eq!(
            sheets[0].created_at.map(|c| c.to_rfc3339()),
            Some("2024-03-05T10:00:00+00:00".to_string())
        );
    }

    #[test]
    fn offset_and_garbage_timestamps() {
        assert_eq!(
            parse_timestamp("2024-03-05T12:00:00+02:00").map(|c| c.to_rfc3339()),
            Some("2024-03-05T10:00:00+00:00".to_string())
        );

        let product: Product =
            serde_json::from_str(r#"{"id":"p1","created_at":"hier"}"#).unwrap();
        assert!(product.created_at.is_none());
        let product: Product = serde_json::from_str(r#"{"id":"p1","created_at":null}"#).unwrap();
        assert!(product.created_at.is_none());
    }

    #[test]
    fn stats_tolerates_missing_api_status() {
        let stats: Stats = serde_json::from_str(r#"{"total_products":3}"#).unwrap();
        assert_eq!(stats.total_products, 3);
        assert!(!stats.api_status.openai_configured);
    }
}
