// Status bar component
//
// Dashboard counters on the left, key hints for the current tab after them.

use super::formatters::format_count;
use crate::controller::Tab;
use crate::tui::app::{App, SearchMode};
use crate::tui::layout::Breakpoint;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the status bar
///
/// Adapts to terminal width:
/// - Wide: counters with labels, full key hints
/// - Narrow: icon counters, short hints
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let bp = Breakpoint::from_width(area.width);
    let stats = app.controller.stats.data();

    let counters = if bp.at_least(Breakpoint::Wide) {
        format!(
            " 📦 {} produits │ 📄 {} fiches │ 🔎 {} recherches",
            format_count(stats.total_products),
            format_count(stats.total_sheets),
            format_count(stats.total_searches),
        )
    } else {
        format!(
            " 📦 {} │ 📄 {} │ 🔎 {}",
            format_count(stats.total_products),
            format_count(stats.total_sheets),
            format_count(stats.total_searches),
        )
    };

    let hints = if app.editing {
        "Entrée valider · Échap terminer"
    } else {
        match (app.controller.tab, app.search.mode) {
            (Tab::Search, SearchMode::Ean) => "Entrée saisir EAN · s fiche auto · m formulaire",
            (Tab::Search, SearchMode::Manual) => "↑↓ champ · ←→ choix · Espace cocher · m EAN",
            (Tab::Products, _) => "/ filtrer · Entrée détails · g fiche · d supprimer",
            (Tab::Sheets, _) => "Entrée détails · e PrestaShop · E JSON · c copier",
        }
    };

    let text = if bp.at_least(Breakpoint::Normal) {
        format!("{counters} │ {hints} │ ? aide")
    } else {
        format!("{counters} │ ? aide")
    };

    let status = Paragraph::new(text)
        .style(Style::default().fg(app.theme.status_bar))
        .block(Block::default().borders(Borders::TOP));

    f.render_widget(status, area);
}
