use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use barberbook_core::utils::initials;

use crate::app::App;
use crate::ui::form::{form_height, render_form};
use crate::ui::styles;

use super::{centered_column, heading, hints, FORM_WIDTH};

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let column = centered_column(area, FORM_WIDTH);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(2),
            Constraint::Length(form_height(&app.profile_form)),
            Constraint::Length(2),
            Constraint::Min(0),
        ])
        .split(column);

    render_avatar(frame, app, chunks[0]);
    frame.render_widget(heading("My profile"), chunks[1]);
    render_form(frame, &app.profile_form, chunks[2]);
    frame.render_widget(
        hints(&[
            ("Enter", "next / save"),
            ("Ctrl+A", "avatar"),
            ("Ctrl+O", "sign out"),
            ("Esc", "back"),
        ]),
        chunks[3],
    );
}

fn render_avatar(frame: &mut Frame, app: &App, area: Rect) {
    let Some(user) = app.auth.user() else {
        return;
    };

    let avatar = match user.avatar_url {
        Some(ref url) if user.has_avatar() => Span::styled(url.clone(), styles::muted_style()),
        _ => Span::styled("no photo", styles::muted_style()),
    };

    let lines = vec![
        Line::from(Span::styled(
            format!("( {} )", initials(&user.name)),
            styles::title_style(),
        )),
        Line::from(avatar),
    ];
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}
