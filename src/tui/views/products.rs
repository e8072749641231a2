// Products view
//
// Filter line on top, card grid below. Empty and loading states get their own
// message instead of a blank list.

use crate::tui::app::App;
use crate::tui::components::cards;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let [filter_area, list_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(area);

    let products = app.controller.visible_products(&app.product_filter);
    let total = app.controller.products.data().len();

    let filter = if app.editing {
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(app.theme.highlight)),
            Span::raw(format!("{}▏", app.product_filter)),
        ])
    } else if app.product_filter.is_empty() {
        Line::from(Span::styled(
            format!(" {total} produits · / pour filtrer"),
            Style::default().fg(app.theme.muted),
        ))
    } else {
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(app.theme.highlight)),
            Span::raw(app.product_filter.clone()),
            Span::styled(
                format!("  {} sur {total} · Échap effacer", products.len()),
                Style::default().fg(app.theme.muted),
            ),
        ])
    };
    f.render_widget(Paragraph::new(filter), filter_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(" Produits ");
    let inner = block.inner(list_area);
    f.render_widget(block, list_area);

    if products.is_empty() {
        let message = if let Some(error) = app.controller.products.error() {
            Span::styled(error.to_string(), Style::default().fg(app.theme.error))
        } else if app.controller.products.is_loading() {
            Span::styled(
                format!("{} Chargement des produits…", app.spinner()),
                Style::default().fg(app.theme.info),
            )
        } else if total > 0 {
            Span::styled("Aucun produit ne correspond", Style::default().fg(app.theme.muted))
        } else {
            Span::styled(
                "Aucun produit. Générez-en un depuis l'onglet Générer.",
                Style::default().fg(app.theme.muted),
            )
        };
        f.render_widget(Paragraph::new(message).centered(), inner);
        return;
    }

    let variant = app.variant;
    let theme = &app.theme;
    cards::render_grid(
        f,
        inner,
        &products,
        app.product_selected,
        variant,
        theme,
        |product, width| cards::product_lines(product, width, variant, theme),
    );
}
