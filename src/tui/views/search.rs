// Search view (Générer tab)
//
// Left: EAN lookup or the manual product form. Right: dashboard counters and
// the preview of the last manually created product. Side by side from the
// Wide breakpoint, stacked below it.

use crate::catalog;
use crate::export;
use crate::tui::app::{App, FormField, SearchMode};
use crate::tui::components::formatters::{format_count, truncate};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Wrap},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let [main, side] = if Breakpoint::from_width(area.width).at_least(Breakpoint::Wide) {
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area)
    } else {
        Layout::vertical([Constraint::Min(10), Constraint::Length(12)]).areas(area)
    };

    let [mode_area, body] = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).areas(main);
    let modes = Tabs::new(vec!["Code EAN", "Saisie manuelle"])
        .select(match app.search.mode {
            SearchMode::Ean => 0,
            SearchMode::Manual => 1,
        })
        .style(Style::default().fg(app.theme.muted))
        .highlight_style(Style::default().fg(app.theme.highlight).add_modifier(Modifier::BOLD))
        .divider(" │ ");
    f.render_widget(modes, mode_area);

    match app.search.mode {
        SearchMode::Ean => render_ean(f, body, app),
        SearchMode::Manual => render_form(f, body, app),
    }

    let [stats_area, preview_area] =
        Layout::vertical([Constraint::Length(8), Constraint::Min(4)]).areas(side);
    render_dashboard(f, stats_area, app);
    render_preview(f, preview_area, app);
}

fn panel<'a>(title: &'a str, focused: bool, app: &App) -> Block<'a> {
    let color = if focused {
        app.theme.border_focused
    } else {
        app.theme.border
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title)
}

fn render_ean(f: &mut Frame, area: Rect, app: &App) {
    let [input_area, rest] = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).areas(area);

    let cursor = if app.editing { "▏" } else { "" };
    let input = Paragraph::new(format!("{}{}", app.search.ean, cursor))
        .block(panel(" Code EAN ", app.editing, app));
    f.render_widget(input, input_area);

    let ean = app.search.ean.trim();
    let validity = if ean.is_empty() {
        Span::styled("8 ou 13 chiffres", Style::default().fg(app.theme.muted))
    } else if catalog::is_valid_ean(ean) {
        Span::styled("✓ format valide", Style::default().fg(app.theme.success))
    } else {
        Span::styled("✗ format invalide", Style::default().fg(app.theme.warning))
    };
    let check = if app.search.also_sheet { "[x]" } else { "[ ]" };

    let mut lines = vec![
        Line::from(validity),
        Line::from(format!("{check} Générer aussi la fiche produit (s)")),
        Line::raw(""),
    ];

    if app.controller.busy.generating {
        lines.push(Line::from(Span::styled(
            format!("{} Recherche et génération en cours…", app.spinner()),
            Style::default().fg(app.theme.info),
        )));
    } else if let Some(summary) = &app.controller.last_search {
        lines.push(Line::from(Span::styled(
            "Dernière recherche",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("  {} résultats analysés", summary.results_count)));
        if !summary.brands_found.is_empty() {
            lines.push(Line::from(format!(
                "  Marques : {}",
                summary.brands_found.join(", ")
            )));
        }
        if !summary.category_detected.is_empty() {
            lines.push(Line::from(format!(
                "  Catégorie détectée : {}",
                summary.category_detected
            )));
        }
    }

    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::NONE)),
        rest,
    );
}

fn row_value(app: &App, field: FormField) -> Vec<Span<'static>> {
    let form = &app.controller.form;
    let muted = Style::default().fg(app.theme.muted);
    let text = |s: &str| {
        if s.is_empty() {
            Span::styled("-", muted)
        } else {
            Span::raw(s.replace('\n', " ⏎ "))
        }
    };
    let picker = |s: &str| {
        if s.is_empty() {
            Span::styled("‹ choisir ›", muted)
        } else {
            Span::raw(format!("‹ {s} ›"))
        }
    };

    match field {
        FormField::Name => vec![text(&form.name)],
        FormField::Brand => vec![picker(&form.brand)],
        FormField::Category => vec![picker(&form.category)],
        FormField::Gender => vec![picker(catalog::gender_label(&form.gender))],
        FormField::Price => {
            let mut spans = vec![text(&form.price)];
            if let Some(percent) = form.discount() {
                spans.push(Span::styled(
                    format!("  -{percent}%"),
                    Style::default().fg(app.theme.discount),
                ));
            }
            spans
        }
        FormField::OldPrice => vec![text(&form.old_price)],
        FormField::Sku => vec![text(&form.sku)],
        FormField::Material => vec![picker(&form.material)],
        FormField::Season => vec![picker(&form.season)],
        FormField::ShortDescription => vec![text(&form.short_description)],
        FormField::Description => vec![text(&form.description)],
        FormField::Features => vec![text(&form.features)],
        FormField::Sizes => {
            let sizes = form.available_sizes();
            if sizes.is_empty() {
                return vec![Span::styled("choisir une catégorie", muted)];
            }
            chips(app, field, sizes.iter().map(|s| (s.clone(), None, form.sizes.contains(s))))
        }
        FormField::Colors => chips(
            app,
            field,
            catalog::COLORS.iter().map(|c| {
                let (r, g, b) = c.rgb();
                (
                    c.name.to_string(),
                    Some(Color::Rgb(r, g, b)),
                    form.colors.iter().any(|s| s == c.name),
                )
            }),
        ),
        FormField::Image => {
            let mut spans = vec![text(&app.search.image_path)];
            if let Some(url) = form.images.first() {
                spans.push(Span::styled(
                    format!("  ✓ {url}"),
                    Style::default().fg(app.theme.success),
                ));
            }
            if app.controller.busy.uploading {
                spans.push(Span::raw(format!("  {}", app.spinner())));
            }
            spans
        }
        FormField::Submit => {
            let label = if app.controller.busy.creating {
                format!("{} Création…", app.spinner())
            } else {
                "[ Créer le produit ]".to_string()
            };
            vec![Span::styled(
                label,
                Style::default()
                    .fg(app.theme.success)
                    .add_modifier(Modifier::BOLD),
            )]
        }
    }
}

/// Toggle chips; the cursor chip is underlined on the focused row
fn chips(
    app: &App,
    field: FormField,
    items: impl Iterator<Item = (String, Option<Color>, bool)>,
) -> Vec<Span<'static>> {
    let focused = app.search.field() == field;
    let mut spans = Vec::new();
    for (i, (label, swatch, checked)) in items.enumerate() {
        if let Some(color) = swatch {
            spans.push(Span::styled("● ", Style::default().fg(color)));
        }
        let mut style = if checked {
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        if focused && i == app.search.chip {
            style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
        }
        let mark = if checked { "✓" } else { "" };
        spans.push(Span::styled(format!("{label}{mark}"), style));
        spans.push(Span::raw("  "));
    }
    spans
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let block = panel(" Nouveau produit ", true, app);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let label_width = 14;
    let lines: Vec<Line> = FormField::ALL
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let focused = i == app.search.field;
            let marker = match (focused, app.editing) {
                (true, true) => "✎ ",
                (true, false) => "▶ ",
                _ => "  ",
            };
            let label_style = if focused {
                Style::default()
                    .fg(app.theme.highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(app.theme.highlight)),
                Span::styled(format!("{:<label_width$}", field.label()), label_style),
            ];
            spans.extend(row_value(app, *field));
            if focused && app.editing {
                spans.push(Span::raw("▏"));
            }
            Line::from(spans)
        })
        .collect();

    // Keep the focused row on screen
    let height = inner.height as usize;
    let scroll = app.search.field.saturating_sub(height.saturating_sub(1));
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((scroll as u16, 0)),
        inner,
    );
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.controller.stats.data();
    let status = |ok: bool| {
        if ok {
            Span::styled("✓", Style::default().fg(app.theme.success))
        } else {
            Span::styled("✗", Style::default().fg(app.theme.error))
        }
    };

    let mut categories: Vec<_> = stats.categories.iter().collect();
    categories.sort_by(|a, b| b.1.cmp(a.1));
    let top: Vec<String> = categories
        .iter()
        .take(3)
        .map(|(name, count)| format!("{name} ({count})"))
        .collect();

    let mut lines = vec![
        Line::from(format!("Produits    {}", format_count(stats.total_products))),
        Line::from(format!("Fiches      {}", format_count(stats.total_sheets))),
        Line::from(format!("Recherches  {}", format_count(stats.total_searches))),
        Line::from(Span::styled(
            truncate(&top.join(", "), area.width.saturating_sub(4) as usize),
            Style::default().fg(app.theme.muted),
        )),
        Line::from(vec![
            Span::raw("OpenAI "),
            status(stats.api_status.openai_configured),
            Span::raw("  Google "),
            status(stats.api_status.google_configured),
        ]),
    ];
    if let Some(error) = app.controller.stats.error() {
        lines.push(Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(app.theme.error),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).block(panel(" Tableau de bord ", false, app)),
        area,
    );
}

fn render_preview(f: &mut Frame, area: Rect, app: &App) {
    let block = panel(" Aperçu ", false, app);
    let Some(product) = &app.controller.preview else {
        let empty = Paragraph::new(Span::styled(
            "Créez un produit pour afficher son aperçu",
            Style::default().fg(app.theme.muted),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let mut price = vec![Span::styled(
        export::format_price(product.price.unwrap_or(0.0)),
        Style::default().fg(app.theme.price).add_modifier(Modifier::BOLD),
    )];
    if let Some(percent) = catalog::discount_percent(product.price.unwrap_or(0.0), product.old_price) {
        price.push(Span::styled(
            format!(" -{percent}%"),
            Style::default().fg(app.theme.discount),
        ));
    }

    let mut lines = vec![
        Line::from(Span::styled(
            export::display_title(product).to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(price),
        Line::raw(""),
        Line::from(export::strip_tags(export::display_description(product)).trim().to_string()),
        Line::raw(""),
        Line::from(Span::styled(
            "H HTML · J JSON · C copier",
            Style::default().fg(app.theme.muted),
        )),
    ];
    if let Some(path) = &app.controller.last_export {
        lines.push(Line::from(Span::styled(
            format!("→ {}", path.display()),
            Style::default().fg(app.theme.success),
        )));
    }

    f.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block),
        area,
    );
}
