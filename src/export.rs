//! Client-side exports
//!
//! Preview exports (HTML page, JSON document, clipboard text) are built from the
//! product returned by the last manual creation. Sheet exports write the
//! backend's export payload verbatim. Everything lands in the export directory.

use crate::api::types::{ExportPayload, Product, ProductSheet};
use crate::catalog;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use regex::Regex;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"<[^>]*>").expect("static tag pattern"))
}

/// Remove HTML tags, keeping text content
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn format_price(price: f64) -> String {
    format!("{price:.2}€")
}

/// Title shown in previews: generated title first
pub fn display_title(product: &Product) -> &str {
    product
        .generated_content
        .as_ref()
        .map(|g| g.title.as_str())
        .filter(|t| !t.is_empty())
        .unwrap_or(&product.title)
}

/// HTML description shown in previews: generated description first
pub fn display_description(product: &Product) -> &str {
    product
        .generated_content
        .as_ref()
        .map(|g| g.description.as_str())
        .filter(|d| !d.is_empty())
        .or(product.description.as_deref())
        .unwrap_or("")
}

/// Standalone French HTML page for a product
pub fn render_html(product: &Product, now: DateTime<Local>) -> String {
    let title = escape_html(display_title(product));
    let price = product.price.unwrap_or(0.0);

    let mut price_block = format!("<span class=\"price\">{}</span>", format_price(price));
    if let Some(old) = product.old_price.filter(|old| *old > price) {
        price_block.push_str(&format!(
            " <span class=\"old-price\"><s>{}</s></span>",
            format_price(old)
        ));
        if let Some(pct) = catalog::discount_percent(price, Some(old)) {
            price_block.push_str(&format!(" <span class=\"discount\">-{pct}%</span>"));
        }
    }

    format!(
        "<!DOCTYPE html>\n\
<html lang=\"fr\">\n\
<head>\n\
<meta charset=\"UTF-8\">\n\
<title>{title}</title>\n\
<style>body{{font-family:sans-serif;max-width:800px;margin:2rem auto}}.price{{font-size:1.5rem;font-weight:bold}}.old-price{{color:#888}}.discount{{color:#c00}}</style>\n\
</head>\n\
<body>\n\
<h1>{title}</h1>\n\
<p class=\"brand\">{brand}</p>\n\
<div class=\"prices\">{price_block}</div>\n\
<div class=\"description\">{description}</div>\n\
<footer>Généré par DM Sports AI Pro - {date}</footer>\n\
</body>\n\
</html>\n",
        brand = escape_html(&product.brand),
        description = display_description(product),
        date = now.format("%d/%m/%Y"),
    )
}

/// Product fields plus `generatedAt`
pub fn render_json(product: &Product, now: DateTime<Local>) -> Value {
    let mut doc = serde_json::to_value(product).unwrap_or_else(|_| json!({}));
    if let Value::Object(map) = &mut doc {
        map.insert("generatedAt".to_string(), json!(now.to_rfc3339()));
    }
    doc
}

/// `title\nprice€\n\ndescription` with tags stripped
pub fn clipboard_text(product: &Product) -> String {
    format!(
        "{}\n{}\n\n{}",
        display_title(product),
        format_price(product.price.unwrap_or(0.0)),
        strip_tags(display_description(product)).trim()
    )
}

/// `title\nreference\n\ndescription` for a backend sheet
pub fn sheet_clipboard_text(sheet: &ProductSheet) -> String {
    format!(
        "{}\n{}\n\n{}",
        sheet.title,
        sheet.reference,
        strip_tags(&sheet.description).trim()
    )
}

/// `fiche-produit-<epoch millis>.<ext>`
pub fn preview_file_name(ext: &str, now: DateTime<Local>) -> String {
    format!("fiche-produit-{}.{ext}", now.timestamp_millis())
}

/// `fiche-<last 8 chars of id>-<format>.json`
pub fn sheet_file_name(sheet_id: &str, format: &str) -> String {
    let tail: String = {
        let chars: Vec<char> = sheet_id.chars().collect();
        chars[chars.len().saturating_sub(8)..].iter().collect()
    };
    format!("fiche-{tail}-{format}.json")
}

/// Write `contents` as `dir/name`, creating the directory if needed
pub fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create export directory {}", dir.display()))?;
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Exported {}", path.display());
    Ok(path)
}

pub fn write_sheet_payload(
    dir: &Path,
    sheet_id: &str,
    format: &str,
    payload: &ExportPayload,
) -> Result<PathBuf> {
    let json = serde_json::to_string_pretty(payload).context("Failed to serialize export")?;
    write_file(dir, &sheet_file_name(sheet_id, format), &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::GeneratedContent;
    use chrono::TimeZone;

    fn product() -> Product {
        Product {
            id: "p1".to_string(),
            title: "Sweat".to_string(),
            brand: "Nike".to_string(),
            price: Some(80.0),
            old_price: Some(100.0),
            generated_content: Some(GeneratedContent {
                title: "Nike Sweat Club".to_string(),
                description: "<p>Doux &amp; <b>chaud</b></p>".to_string(),
            }),
            ..Product::default()
        }
    }

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 10, 0, 0).unwrap()
    }

    #[test]
    fn strip_tags_keeps_text() {
        assert_eq!(strip_tags("<p>a <b>b</b></p><br/>c"), "a bc");
    }

    #[test]
    fn html_contains_prices_and_footer() {
        let html = render_html(&product(), fixed_now());
        assert!(html.contains("<h1>Nike Sweat Club</h1>"));
        assert!(html.contains("80.00€"));
        assert!(html.contains("<s>100.00€</s>"));
        assert!(html.contains("-20%"));
        assert!(html.contains("Généré par DM Sports AI Pro - 05/03/2024"));
    }

    #[test]
    fn html_hides_old_price_when_not_higher() {
        let mut p = product();
        p.old_price = Some(50.0);
        assert!(!render_html(&p, fixed_now()).contains("<s>"));
    }

    #[test]
    fn clipboard_text_layout() {
        assert_eq!(
            clipboard_text(&product()),
            "Nike Sweat Club\n80.00€\n\nDoux &amp; chaud"
        );
    }

    #[test]
    fn json_export_adds_generated_at() {
        let doc = render_json(&product(), fixed_now());
        assert_eq!(doc["brand"], "Nike");
        assert!(doc["generatedAt"].as_str().unwrap().starts_with("2024-03-05"));
    }

    #[test]
    fn file_names() {
        assert_eq!(
            sheet_file_name("0123456789abcdef12", "prestashop"),
            "fiche-abcdef12-prestashop.json"
        );
        assert_eq!(sheet_file_name("abc", "json"), "fiche-abc-json.json");
        assert!(preview_file_name("html", fixed_now()).starts_with("fiche-produit-"));
        assert!(preview_file_name("html", fixed_now()).ends_with(".html"));
    }

    #[test]
    fn writes_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let payload = ExportPayload {
            format: "prestashop".to_string(),
            data: json!({ "name": "x" }),
            instructions: None,
        };
        let path = write_sheet_payload(&target, "s-0000abcd1234", "prestashop", &payload).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "fiche-abcd1234-prestashop.json"
        );
        let written: ExportPayload =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written, payload);
    }

    #[test]
    fn sheet_clipboard_text_strips_markup() {
        let sheet = ProductSheet {
            title: "Air Max".to_string(),
            reference: "REF-12345678".to_string(),
            description: "<p>Amorti <b>max</b></p>".to_string(),
            ..ProductSheet::default()
        };
        assert_eq!(
            sheet_clipboard_text(&sheet),
            "Air Max\nREF-12345678\n\nAmorti max"
        );
    }
}
