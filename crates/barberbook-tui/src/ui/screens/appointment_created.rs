use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::ui::styles;

use super::hints;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(6),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(area);

    let date = app
        .appointment_date_display()
        .unwrap_or_else(|| "Date unavailable".to_string());

    let lines = vec![
        Line::from(Span::styled("✔", styles::success_style())),
        Line::from(""),
        Line::from(Span::styled("Appointment booked", styles::title_style())),
        Line::from(""),
        Line::from(Span::styled(date, styles::list_item_style())),
    ];

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
    frame.render_widget(hints(&[("Enter", "OK")]), chunks[2]);
}
