// Sheets view

use crate::tui::app::App;
use crate::tui::components::cards;
use ratatui::{
    layout::Rect,
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let sheets = app.controller.sheets.data();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
        .title(format!(" Fiches produits ({}) ", sheets.len()));
    let inner = block.inner(area);
    f.render_widget(block, area);

    if sheets.is_empty() {
        let message = if let Some(error) = app.controller.sheets.error() {
            Span::styled(error.to_string(), Style::default().fg(app.theme.error))
        } else if app.controller.sheets.is_loading() {
            Span::styled(
                format!("{} Chargement des fiches…", app.spinner()),
                Style::default().fg(app.theme.info),
            )
        } else {
            Span::styled(
                "Aucune fiche. Générez-en une depuis un produit (g).",
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
        sheets,
        app.sheet_selected,
        variant,
        theme,
        |sheet, width| cards::sheet_lines(sheet, width, variant, theme),
    );
}
