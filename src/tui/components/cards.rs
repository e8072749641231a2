//! Product and sheet cards
//!
//! Both lists render through one grid: row-major cards, `card_columns` wide,
//! scrolled so the selected card stays visible. The simple variant is one line
//! per entry; the detailed one adds brand, prices, sizes and colors.

use super::formatters::{first_line, truncate};
use crate::api::types::{Product, ProductSheet};
use crate::catalog;
use crate::config::CardVariant;
use crate::export;
use crate::theme::Theme;
use crate::tui::layout::{card_height, Breakpoint};
use crate::tui::modal::ExportFormat;
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// What a key does to the highlighted card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Details,
    GenerateSheet,
    Delete,
    Export(ExportFormat),
    Copy,
}

impl CardAction {
    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::Enter => Some(CardAction::Details),
            KeyCode::Char('g') => Some(CardAction::GenerateSheet),
            KeyCode::Char('d') | KeyCode::Delete => Some(CardAction::Delete),
            KeyCode::Char('e') => Some(CardAction::Export(ExportFormat::Prestashop)),
            KeyCode::Char('E') => Some(CardAction::Export(ExportFormat::Json)),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(CardAction::Copy),
            _ => None,
        }
    }
}

/// Lay out `items` as cards; `card` builds the lines of one entry
pub fn render_grid<T>(
    f: &mut Frame,
    area: Rect,
    items: &[T],
    selected: usize,
    variant: CardVariant,
    theme: &Theme,
    card: impl Fn(&T, usize) -> Vec<Line<'static>>,
) {
    let columns = Breakpoint::from_width(area.width).card_columns(variant);
    let height = card_height(variant);
    let visible_rows = (area.height / height).max(1) as usize;

    let selected_row = selected / columns;
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    let column_areas = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    for (i, item) in items.iter().enumerate().skip(first_row * columns) {
        let row = i / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let column = column_areas[i % columns];
        let rect = Rect::new(
            column.x,
            column.y + row as u16 * height,
            column.width,
            height,
        );

        let width = rect.width.saturating_sub(3) as usize;
        let mut style = Style::default();
        if i == selected {
            style = style.bg(theme.selected_bg);
        }
        let marker = if i == selected { "▶ " } else { "  " };
        let mut lines = card(item, width);
        if let Some(first) = lines.first_mut() {
            first.spans.insert(0, Span::styled(marker, Style::default().fg(theme.highlight)));
        }
        for line in lines.iter_mut().skip(1) {
            line.spans.insert(0, Span::raw("  "));
        }

        f.render_widget(Paragraph::new(lines).style(style), rect);
    }
}

fn price_spans(price: Option<f64>, old_price: Option<f64>, theme: &Theme) -> Vec<Span<'static>> {
    let Some(price) = price else {
        return vec![Span::styled("prix non renseigné", Style::default().fg(theme.muted))];
    };
    let mut spans = vec![Span::styled(
        export::format_price(price),
        Style::default().fg(theme.price).add_modifier(Modifier::BOLD),
    )];
    if let Some(percent) = catalog::discount_percent(price, old_price) {
        if let Some(old) = old_price {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                export::format_price(old),
                Style::default()
                    .fg(theme.muted)
                    .add_modifier(Modifier::CROSSED_OUT),
            ));
        }
        spans.push(Span::styled(
            format!(" -{percent}%"),
            Style::default().fg(theme.discount),
        ));
    }
    spans
}

pub fn product_lines(
    product: &Product,
    width: usize,
    variant: CardVariant,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let title = export::display_title(product);
    let title_style = Style::default().add_modifier(Modifier::BOLD);

    if variant == CardVariant::Simple {
        let mut spans = vec![
            Span::styled(truncate(title, width.saturating_sub(24)), title_style),
            Span::raw(" │ "),
            Span::styled(product.brand.clone(), Style::default().fg(theme.brand)),
            Span::raw(" │ "),
        ];
        spans.extend(price_spans(product.price, None, theme));
        return vec![Line::from(spans)];
    }

    let mut meta = vec![product.brand.clone(), product.category.clone()];
    if let Some(gender) = &product.gender {
        meta.push(catalog::gender_label(gender).to_string());
    }
    if let Some(ean) = &product.ean_code {
        meta.push(format!("EAN {ean}"));
    }

    let mut extras = Vec::new();
    if !product.sizes.is_empty() {
        extras.push(format!("Tailles {}", product.sizes.join(", ")));
    }
    let colors = product.color_names();
    if !colors.is_empty() {
        extras.push(format!("Couleurs {}", colors.join(", ")));
    }

    vec![
        Line::from(Span::styled(truncate(title, width), title_style)),
        Line::from(Span::styled(
            truncate(&meta.join(" · "), width),
            Style::default().fg(theme.brand),
        )),
        Line::from(price_spans(product.price, product.old_price, theme)),
        Line::from(Span::styled(
            truncate(&extras.join(" · "), width),
            Style::default().fg(theme.muted),
        )),
    ]
}

pub fn sheet_lines(
    sheet: &ProductSheet,
    width: usize,
    variant: CardVariant,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let title_style = Style::default().add_modifier(Modifier::BOLD);
    let status = sheet.status.label();

    if variant == CardVariant::Simple {
        return vec![Line::from(vec![
            Span::styled(sheet.reference.clone(), Style::default().fg(theme.brand)),
            Span::raw(" │ "),
            Span::styled(truncate(&sheet.title, width.saturating_sub(34)), title_style),
            Span::raw(" │ "),
            Span::styled(status, Style::default().fg(theme.muted)),
        ])];
    }

    let created = sheet
        .created_at
        .map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    let mut price_line = price_spans(sheet.price_ttc, None, theme);
    price_line.push(Span::styled(
        format!("  {created}"),
        Style::default().fg(theme.muted),
    ));

    vec![
        Line::from(Span::styled(truncate(&sheet.title, width), title_style)),
        Line::from(Span::styled(
            format!("{} · {}", sheet.reference, status),
            Style::default().fg(theme.brand),
        )),
        Line::from(price_line),
        Line::from(Span::styled(
            truncate(first_line(&export::strip_tags(&sheet.seo_description)), width),
            Style::default().fg(theme.muted),
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(CardAction::from_key(KeyCode::Enter), Some(CardAction::Details));
        assert_eq!(
            CardAction::from_key(KeyCode::Char('E')),
            Some(CardAction::Export(ExportFormat::Json))
        );
        assert_eq!(CardAction::from_key(KeyCode::Char('z')), None);
    }

    #[test]
    fn detailed_product_card_shows_discount() {
        let product = Product {
            title: "Sweat".to_string(),
            brand: "Nike".to_string(),
            category: "sweats".to_string(),
            gender: Some("homme".to_string()),
            price: Some(59.99),
            old_price: Some(69.99),
            sizes: vec!["M".to_string(), "L".to_string()],
            ..Product::default()
        };
        let lines = product_lines(&product, 60, CardVariant::Detailed, &Theme::default());
        assert_eq!(lines.len(), 4);
        let prices: String = lines[2].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(prices, "59.99€ 69.99€ -14%");
        let extras: String = lines[3].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(extras.starts_with("Tailles M, L"));

        let simple = product_lines(&product, 60, CardVariant::Simple, &Theme::default());
        assert_eq!(simple.len(), 1);
    }
}
