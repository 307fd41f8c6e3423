//! Rendering of `Form` inputs as bordered text fields.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use barberbook_core::forms::{Form, Input};

use super::styles;

/// Rows taken by one input: bordered box plus the inline error line
pub const INPUT_HEIGHT: u16 = 4;

/// Glyph standing in for the field icon
fn icon_for(name: &str) -> &'static str {
    match name {
        "name" => "☺",
        "email" => "✉",
        "date" => "◷",
        "path" => "▣",
        _ => "🔒",
    }
}

/// Height needed to draw every input of a form
pub fn form_height(form: &Form) -> u16 {
    form.inputs().len() as u16 * INPUT_HEIGHT
}

pub fn render_form(frame: &mut Frame, form: &Form, area: Rect) {
    let constraints: Vec<Constraint> = form
        .inputs()
        .iter()
        .map(|_| Constraint::Length(INPUT_HEIGHT))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (input, row) in form.inputs().iter().zip(rows.iter()) {
        render_input(frame, input, *row);
    }
}

fn render_input(frame: &mut Frame, input: &Input, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(1)])
        .split(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::input_border_style(input.is_focused(), input.is_errored()));

    let icon = Span::styled(
        format!(" {} ", icon_for(input.name())),
        styles::input_icon_style(input.is_highlighted()),
    );

    let body = if input.value().is_empty() && !input.is_focused() {
        Span::styled(input.placeholder().to_string(), styles::muted_style())
    } else {
        Span::styled(input.display_value(), styles::list_item_style())
    };

    let mut spans = vec![icon, body];
    if input.is_focused() {
        spans.push(Span::styled("▌", styles::highlight_style()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[0]);

    if let Some(error) = input.error() {
        let line = Line::from(Span::styled(format!("  {}", error), styles::error_style()));
        frame.render_widget(Paragraph::new(line), chunks[1]);
    }
}
