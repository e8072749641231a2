// Title bar component
//
// App name, tab strip, signed-in user and a spinner while requests run.

use crate::controller::Tab;
use crate::tui::app::App;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Tabs},
    Frame,
};

pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let user = match app.controller.session.user() {
        Some(user) => format!(" 👤 {} ", user.username),
        None => " non connecté ".to_string(),
    };
    let activity = if app.is_busy() {
        format!(" {} ", app.spinner())
    } else {
        String::new()
    };

    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.title))
        .title(Line::from(format!(" 🏷️ DM Sports AI Pro{activity}")).style(
            Style::default()
                .fg(app.theme.title)
                .add_modifier(Modifier::BOLD),
        ))
        .title_top(Line::from(format!("{user}│ ? ")).right_aligned());

    let tabs = Tabs::new(titles)
        .select(app.controller.tab.index())
        .style(Style::default().fg(app.theme.muted))
        .highlight_style(
            Style::default()
                .fg(app.theme.highlight)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ")
        .block(block);

    f.render_widget(tabs, area);
}
