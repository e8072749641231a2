// Modal overlay rendering
//
// Modals are rendered on top of the main content:
// - Help: keyboard shortcuts and current theme/card layout
// - Product / sheet details: scrollable full record
// - Confirm: yes/no for the pending deletion
// - Logs: recent tracing output

use crate::api::types::{Product, ProductSheet};
use crate::catalog;
use crate::export;
use crate::logging::LogLevel;
use crate::theme::Theme;
use crate::tui::app::App;
use crate::tui::modal::Modal;
use crate::tui::{variant_label, LOG_LINES};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render a modal dialog as a centered overlay
pub fn render(f: &mut Frame, modal: &Modal, app: &mut App) {
    match modal {
        Modal::Help => render_help(f, app),
        Modal::ConfirmDelete => render_confirm(f, app),
        Modal::ProductDetail(id) => {
            let lines = match app.controller.product(id) {
                Some(product) => product_detail(product, &app.theme),
                None => vec![Line::raw("Produit introuvable")],
            };
            render_scrollable(f, modal, app, lines, " g fiche · d supprimer · c copier · Échap fermer ");
        }
        Modal::SheetDetail(id) => {
            let lines = match app.controller.sheet(id) {
                Some(sheet) => sheet_detail(sheet, &app.theme),
                None => vec![Line::raw("Fiche introuvable")],
            };
            render_scrollable(f, modal, app, lines, " e PrestaShop · E JSON · c copier · Échap fermer ");
        }
        Modal::Logs => {
            let lines = log_lines(app);
            render_scrollable(f, modal, app, lines, " c copier · Échap fermer ");
        }
    }
}

/// Calculate centered rect for modal dialog
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn render_help(f: &mut Frame, app: &App) {
    let key_style = Style::default().fg(app.theme.info);
    let header_style = Style::default()
        .fg(app.theme.highlight)
        .add_modifier(Modifier::BOLD);

    let kb = |key: &str, desc: &str| -> Line {
        Line::from(vec![
            Span::raw("    "),
            Span::styled(format!("{:<12}", key), key_style),
            Span::raw(desc.to_string()),
        ])
    };

    let content = Text::from(vec![
        Line::raw(""),
        Line::from(Span::styled("  Onglets", header_style)),
        kb("1 2 3, Tab", "Générer / Produits / Fiches"),
        kb("r", "Recharger les listes"),
        Line::raw(""),
        Line::from(Span::styled("  Générer", header_style)),
        kb("m", "EAN ou saisie manuelle"),
        kb("Entrée", "Saisir / valider"),
        kb("s", "Fiche générée avec l'EAN"),
        kb("←/→, Espace", "Choix, tailles, couleurs"),
        kb("n", "Vider le formulaire"),
        kb("H J C", "Aperçu : HTML, JSON, copier"),
        Line::raw(""),
        Line::from(Span::styled("  Listes", header_style)),
        kb("↑/↓, j/k", "Sélection"),
        kb("Entrée", "Détails"),
        kb("/", "Filtrer les produits"),
        kb("g, d", "Générer la fiche, supprimer"),
        kb("e, E", "Exporter PrestaShop, JSON"),
        kb("c", "Copier"),
        Line::raw(""),
        Line::from(Span::styled("  Général", header_style)),
        kb("t, v", "Thème, affichage des cartes"),
        kb("L", "Journal"),
        kb("X", "Se déconnecter"),
        kb("q, Ctrl+C", "Quitter"),
        Line::raw(""),
        Line::from(vec![
            Span::raw("  Thème : "),
            Span::styled(app.theme.name.clone(), key_style),
            Span::raw("  |  Cartes : "),
            Span::styled(variant_label(app.variant), key_style),
        ]),
    ]);

    let area = centered_rect(50, 34, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.highlight))
            .title(Modal::Help.title())
            .title_bottom(Line::from(" ? ou Échap pour fermer ").centered()),
    );
    f.render_widget(paragraph, area);
}

fn render_confirm(f: &mut Frame, app: &App) {
    let prompt = app
        .controller
        .confirmation
        .as_ref()
        .map(|c| c.prompt())
        .unwrap_or_default();

    let content = vec![
        Line::raw(""),
        Line::from(prompt),
        Line::raw(""),
        Line::from(vec![
            Span::styled("o/y", Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD)),
            Span::raw(" supprimer   "),
            Span::styled("n/Échap", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" annuler"),
        ]),
    ];

    let area = centered_rect(56, 8, f.area());
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error))
                .title(Modal::ConfirmDelete.title()),
        );
    f.render_widget(paragraph, area);
}

fn render_scrollable(
    f: &mut Frame,
    modal: &Modal,
    app: &mut App,
    lines: Vec<Line<'static>>,
    hints: &'static str,
) {
    let frame_area = f.area();
    let width = (frame_area.width * 80 / 100).max(50);
    let height = (frame_area.height * 85 / 100).max(12);
    let area = centered_rect(width, height, frame_area);

    // Clamp so scrolling past the end does nothing
    let viewport = area.height.saturating_sub(2);
    let max_scroll = (lines.len() as u16).saturating_sub(viewport);
    app.modal_scroll = app.modal_scroll.min(max_scroll);

    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.modal_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border_focused))
                .title(modal.title())
                .title_bottom(Line::from(hints).centered()),
        );
    f.render_widget(paragraph, area);
}

fn field(label: &str, value: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<16}"), Style::default().fg(theme.muted)),
        Span::raw(value.into()),
    ])
}

fn heading(text: &str, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default()
            .fg(theme.highlight)
            .add_modifier(Modifier::BOLD),
    ))
}

fn product_detail(product: &Product, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading(export::display_title(product), theme),
        Line::raw(""),
        field("Marque", product.brand.clone(), theme),
        field("Catégorie", product.category.clone(), theme),
    ];
    if let Some(gender) = &product.gender {
        lines.push(field("Genre", catalog::gender_label(gender), theme));
    }
    if let Some(price) = product.price {
        let mut value = export::format_price(price);
        if let Some(percent) = catalog::discount_percent(price, product.old_price) {
            if let Some(old) = product.old_price {
                value.push_str(&format!("  (au lieu de {}, -{percent}%)", export::format_price(old)));
            }
        }
        lines.push(field("Prix", value, theme));
    }
    for (label, value) in [
        ("SKU", &product.sku),
        ("EAN", &product.ean_code),
        ("Modèle", &product.model),
    ] {
        if let Some(value) = value {
            lines.push(field(label, value.clone(), theme));
        }
    }
    if !product.sizes.is_empty() {
        lines.push(field("Tailles", product.sizes.join(", "), theme));
    }
    let colors = product.color_names();
    if !colors.is_empty() {
        lines.push(field("Couleurs", colors.join(", "), theme));
    }
    for image in &product.images {
        lines.push(field("Image", image.clone(), theme));
    }
    if let Some(created) = product.created_at {
        lines.push(field("Créé le", created.format("%d/%m/%Y %H:%M").to_string(), theme));
    }

    if !product.characteristics.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Caractéristiques", theme));
        for (key, value) in &product.characteristics {
            lines.push(field(key, value.clone(), theme));
        }
    }

    let description = export::strip_tags(export::display_description(product));
    if !description.trim().is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Description", theme));
        lines.extend(description.trim().lines().map(|l| Line::raw(l.to_string())));
    }
    lines
}

fn sheet_detail(sheet: &ProductSheet, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading(&sheet.title, theme),
        Line::raw(""),
        field("Référence", sheet.reference.clone(), theme),
        field("Statut", sheet.status.label(), theme),
    ];
    if let Some(price) = sheet.price_ttc {
        lines.push(field("Prix TTC", export::format_price(price), theme));
    }
    if let Some(created) = sheet.created_at {
        lines.push(field("Créée le", created.format("%d/%m/%Y %H:%M").to_string(), theme));
    }

    lines.push(Line::raw(""));
    lines.push(heading("SEO", theme));
    lines.push(field("Titre", sheet.seo_title.clone(), theme));
    lines.push(field("Description", sheet.seo_description.clone(), theme));

    if !sheet.characteristics.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Caractéristiques", theme));
        for (key, value) in &sheet.characteristics {
            lines.push(field(key, value.clone(), theme));
        }
    }
    if !sheet.weight_info.is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Poids et dimensions", theme));
        for (key, value) in &sheet.weight_info {
            lines.push(field(key, format!("{value}"), theme));
        }
    }

    let description = export::strip_tags(&sheet.description);
    if !description.trim().is_empty() {
        lines.push(Line::raw(""));
        lines.push(heading("Description", theme));
        lines.extend(description.trim().lines().map(|l| Line::raw(l.to_string())));
    }
    lines
}

fn log_lines(app: &App) -> Vec<Line<'static>> {
    let entries = app.log_buffer.recent(LOG_LINES);
    if entries.is_empty() {
        return vec![Line::raw("Aucun message")];
    }
    entries
        .iter()
        .map(|entry| {
            let color = match entry.level {
                LogLevel::Error => app.theme.error,
                LogLevel::Warn => app.theme.warning,
                LogLevel::Info => app.theme.info,
                LogLevel::Debug | LogLevel::Trace => app.theme.muted,
            };
            Line::from(Span::styled(entry.line(), Style::default().fg(color)))
        })
        .collect()
}
