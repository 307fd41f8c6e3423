//! Screen renderers, one per screen of the two navigation stacks.

pub mod appointment_created;
pub mod dashboard;
pub mod profile;
pub mod sign_in;
pub mod sign_up;

use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::styles;

/// Width of the centered column form screens are drawn in
pub const FORM_WIDTH: u16 = 50;

/// Horizontally centered column of at most `width` cells
pub fn centered_column(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    let x = area.x + (area.width - width) / 2;
    Rect::new(x, area.y, width, area.height)
}

/// Centered bold heading
pub fn heading(text: &str) -> Paragraph<'static> {
    Paragraph::new(Line::from(Span::styled(text.to_string(), styles::title_style())))
        .alignment(Alignment::Center)
}

/// Key hints like "[Enter] next  [Esc] back"
pub fn hints(pairs: &[(&str, &str)]) -> Paragraph<'static> {
    let mut spans = Vec::new();
    for (i, (key, desc)) in pairs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(format!("[{}]", key), styles::help_key_style()));
        spans.push(Span::styled(format!(" {}", desc), styles::muted_style()));
    }
    Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
}
