use ratatui::style::{Color, Modifier, Style};

// Color palette
pub const ACCENT: Color = Color::Rgb(255, 144, 0);
pub const TEXT: Color = Color::Rgb(244, 237, 232);
pub const MUTED: Color = Color::Rgb(102, 99, 96);
pub const SUCCESS: Color = Color::Rgb(4, 211, 97);
pub const ERROR: Color = Color::Rgb(197, 48, 48);
pub const HIGHLIGHT: Color = Color::Rgb(62, 59, 71);
pub const BACKGROUND: Color = Color::Rgb(49, 46, 56);

// Styles
pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(HIGHLIGHT)
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(TEXT)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

/// Border of a form input: error beats focus
pub fn input_border_style(focused: bool, errored: bool) -> Style {
    if errored {
        Style::default().fg(ERROR)
    } else if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

/// Icon color of a form input: accent once focused or filled
pub fn input_icon_style(highlighted: bool) -> Style {
    if highlighted {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn search_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn status_bar_style() -> Style {
    Style::default().bg(BACKGROUND).fg(TEXT)
}

pub fn help_key_style() -> Style {
    Style::default()
        .fg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(TEXT)
}
