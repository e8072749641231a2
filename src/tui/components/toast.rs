//! Toast notification component
//!
//! Draws the controller's current alert in the bottom-right corner, on top of
//! all other content. Expiry is the controller's business; this only paints.

use crate::controller::Alert;
use crate::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, alert: &Alert, theme: &Theme) {
    let text = format!("{} {}", alert.kind.icon(), alert.message);

    // 2 cells padding each side plus borders
    let width = (text.width() as u16 + 4).min(area.width.saturating_sub(4));
    let height = 3;

    let x = area.right().saturating_sub(width + 2);
    let y = area.bottom().saturating_sub(height + 2);
    let toast_area = Rect::new(x, y, width, height);

    let color = theme.alert_color(alert.kind);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let paragraph = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(color))
        .block(block);

    f.render_widget(Clear, toast_area);
    f.render_widget(paragraph, toast_area);
}
