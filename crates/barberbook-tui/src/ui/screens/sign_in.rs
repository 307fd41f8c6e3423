use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;
use crate::ui::form::{form_height, render_form};

use super::{centered_column, heading, hints, FORM_WIDTH};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let column = centered_column(area, FORM_WIDTH);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(form_height(&app.sign_in_form)),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(column);

    frame.render_widget(heading("Sign in"), chunks[1]);
    render_form(frame, &app.sign_in_form, chunks[2]);
    frame.render_widget(
        hints(&[("Enter", "next / sign in"), ("Ctrl+N", "create account"), ("Esc", "quit")]),
        chunks[3],
    );
}
