// Login view
//
// Centered form; Register mode adds the email row.

use crate::form::AuthMode;
use crate::tui::app::{App, LoginField};
use crate::tui::input::masked;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.controller.login_form;
    let (title, switch_hint) = match form.mode {
        AuthMode::Login => (" Connexion ", "F2 créer un compte"),
        AuthMode::Register => (" Inscription ", "F2 j'ai déjà un compte"),
    };

    let mut rows = vec![(LoginField::Username, "Nom d'utilisateur", form.username.clone())];
    if form.mode == AuthMode::Register {
        rows.push((LoginField::Email, "Email", form.email.clone()));
    }
    rows.push((LoginField::Password, "Mot de passe", masked(&form.password)));

    let height = rows.len() as u16 * 3 + 4;
    let width = 52.min(area.width);
    let outer = Rect::new(
        area.x + area.width.saturating_sub(width) / 2,
        area.y + area.height.saturating_sub(height) / 2,
        width,
        height.min(area.height),
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_focused))
        .title(title)
        .title_bottom(Line::from(format!(" {switch_hint} ")).centered());
    let inner = block.inner(outer);
    f.render_widget(block, outer);

    let mut constraints: Vec<Constraint> = rows.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Min(1));
    let chunks = Layout::vertical(constraints).split(inner);

    for (i, (field, label, value)) in rows.iter().enumerate() {
        let focused = *field == app.login_field;
        let border = if focused {
            app.theme.border_focused
        } else {
            app.theme.border
        };
        let cursor = if focused { "▏" } else { "" };
        let input = Paragraph::new(format!("{value}{cursor}")).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .title(format!(" {label} ")),
        );
        f.render_widget(input, chunks[i]);
    }

    let footer = if app.controller.busy.auth {
        Line::from(Span::styled(
            format!("{} Connexion en cours…", app.spinner()),
            Style::default().fg(app.theme.info),
        ))
    } else {
        Line::from(vec![
            Span::styled("Entrée", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(" valider · Tab champ · Échap quitter", Style::default().fg(app.theme.muted)),
        ])
    };
    f.render_widget(Paragraph::new(footer).centered(), chunks[rows.len()]);
}
