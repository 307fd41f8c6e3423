use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use barberbook_core::{Route, Screen};

use crate::app::{App, AppState};

use super::form::{form_height, render_form};
use super::screens::{appointment_created, dashboard, profile, sign_in, sign_up};
use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_main_content(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    match app.state {
        AppState::ShowingHelp => render_help_overlay(frame, app),
        AppState::Booking => render_booking_overlay(frame, app),
        AppState::EditingAvatar => render_avatar_overlay(frame, app),
        AppState::ConfirmingQuit => render_quit_overlay(frame),
        _ => {}
    }

    // Alerts can pop up over any other overlay
    if let Some(ref alert) = app.alert {
        render_alert_overlay(frame, &alert.title, &alert.message);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  ✂ Barberbook";
    let screen = app
        .current_screen()
        .map(|s| format!(" / {}", s.title()))
        .unwrap_or_default();
    let help_hint = "[?] Help";
    let used = title.chars().count() + screen.chars().count() + help_hint.len() + 4;

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::styled(screen, styles::muted_style()),
        Span::raw(" ".repeat((area.width as usize).saturating_sub(used))),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_main_content(frame: &mut Frame, app: &App, area: Rect) {
    if app.route() == Route::Loading {
        render_loading(frame, area);
        return;
    }

    match app.current_screen() {
        Some(Screen::SignIn) => sign_in::render(frame, app, area),
        Some(Screen::SignUp) => sign_up::render(frame, app, area),
        Some(Screen::Dashboard) => dashboard::render(frame, app, area),
        Some(Screen::Profile) => profile::render(frame, app, area),
        Some(Screen::AppointmentCreated) => appointment_created::render(frame, app, area),
        None => render_loading(frame, area),
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(45), Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let line = Line::from(Span::styled("Loading...", styles::highlight_style()));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), chunks[1]);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.current_screen() {
        Some(Screen::Dashboard) => "[/]search | [b]ook | [p]rofile | [o] sign out | [q]uit",
        Some(Screen::AppointmentCreated) => "[Enter] OK",
        Some(_) => "[Tab] next field | [Ctrl+S] submit | [F1] help",
        None => "[q]uit",
    };

    let left_text = match app.status_message {
        Some(ref msg) => format!(" {} ", msg),
        None => match app.auth.user() {
            Some(user) => format!(" Signed in as {} ", user.email),
            None => " Not signed in ".to_string(),
        },
    };
    let right_text = format!(" {} ", shortcuts);

    let padding_len = (area.width as usize)
        .saturating_sub(left_text.chars().count())
        .saturating_sub(right_text.len());
    let status_line = Line::from(vec![
        Span::styled(left_text, styles::muted_style()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right_text, styles::muted_style()),
    ]);

    frame.render_widget(
        Paragraph::new(status_line).style(styles::status_bar_style()),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame, app: &App) {
    let keys: &[(&str, &str)] = match app.current_screen() {
        Some(Screen::Dashboard) => &[
            ("↑/↓ j/k", "Select provider"),
            ("PgUp/PgDn", "Scroll a page"),
            ("/", "Search providers"),
            ("Enter / b", "Book with selected provider"),
            ("p", "Open profile"),
            ("r", "Refresh providers"),
            ("o", "Sign out"),
            ("q", "Quit"),
        ],
        Some(Screen::Profile) => &[
            ("Tab / ↓", "Next field"),
            ("Shift+Tab / ↑", "Previous field"),
            ("Enter", "Next field, save on last"),
            ("Ctrl+S", "Save"),
            ("Ctrl+A", "Change avatar"),
            ("Ctrl+O", "Sign out"),
            ("Esc", "Back"),
        ],
        _ => &[
            ("Tab / ↓", "Next field"),
            ("Shift+Tab / ↑", "Previous field"),
            ("Enter", "Next field, submit on last"),
            ("Ctrl+S", "Submit"),
            ("Ctrl+N", "Create account"),
            ("Esc", "Back / quit"),
        ],
    };

    let area = centered_rect_fixed(52, keys.len() as u16 + 6, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled("  Keyboard shortcuts", styles::title_style())),
        Line::from(""),
    ];
    for (key, desc) in keys {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<16}", key), styles::help_key_style()),
            Span::styled(*desc, styles::help_desc_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Press [Esc] to close",
        styles::muted_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_booking_overlay(frame: &mut Frame, app: &App) {
    let provider = app
        .booking_provider
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    render_form_overlay(
        frame,
        &format!(" Book with {} ", provider),
        "When? e.g. 2026-10-20 14:00",
        &app.booking_form,
    );
}

fn render_avatar_overlay(frame: &mut Frame, app: &App) {
    render_form_overlay(
        frame,
        " Change avatar ",
        "JPEG file to upload",
        &app.avatar_form,
    );
}

fn render_form_overlay(
    frame: &mut Frame,
    title: &str,
    prompt: &str,
    form: &barberbook_core::forms::Form,
) {
    let height = form_height(form) + 6;
    let area = centered_rect_fixed(56, height, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(title.to_string())
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(form_height(form)),
            Constraint::Min(1),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!(" {}", prompt), styles::muted_style()))),
        chunks[0],
    );
    render_form(frame, form, chunks[1]);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" [Enter]", styles::help_key_style()),
            Span::styled(" confirm  ", styles::muted_style()),
            Span::styled("[Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::muted_style()),
        ])),
        chunks[2],
    );
}

fn render_alert_overlay(frame: &mut Frame, title: &str, message: &str) {
    let area = centered_rect_fixed(46, 8, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), styles::list_item_style())),
        Line::from(""),
        Line::from(vec![
            Span::styled("Press ", styles::muted_style()),
            Span::styled("[Enter]", styles::help_key_style()),
            Span::styled(" to continue", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .title(format!(" {} ", title))
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true))
        .style(Style::default());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

/// Create a centered rectangle with fixed dimensions
fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(46, 7, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Are you sure you want to quit?",
            styles::highlight_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("   Press ", styles::muted_style()),
            Span::styled("[Y]", styles::help_key_style()),
            Span::styled(" to quit, ", styles::muted_style()),
            Span::styled("[N]", styles::help_key_style()),
            Span::styled(" to cancel", styles::muted_style()),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
