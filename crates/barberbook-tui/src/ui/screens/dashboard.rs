use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use barberbook_core::utils::{initials, truncate_string};

use crate::app::{App, AppState};
use crate::ui::styles;

/// Column width for provider names in the list
const NAME_WIDTH: usize = 32;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_provider_list(frame, app, chunks[1]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let greeting = app
        .auth
        .user()
        .map(|u| (u.first_name().to_string(), initials(&u.name)))
        .unwrap_or_default();

    let line = Line::from(vec![
        Span::styled(" Welcome, ", styles::muted_style()),
        Span::styled(greeting.0, styles::title_style()),
        Span::raw("  "),
        Span::styled(format!("( {} )", greeting.1), styles::highlight_style()),
        Span::styled("  [p] profile", styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());
    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_provider_list(frame: &mut Frame, app: &App, area: Rect) {
    let providers = app.filtered_providers();

    let title = if app.providers_loading {
        " Providers (loading...) ".to_string()
    } else {
        format!(" Providers ({}) ", providers.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    let searching = matches!(app.state, AppState::Searching);
    let inner_chunks = if searching || !app.search_query.is_empty() {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(block.inner(area))
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(0), Constraint::Min(1)])
            .split(block.inner(area))
    };
    frame.render_widget(block, area);

    if searching || !app.search_query.is_empty() {
        let cursor = if searching { "▌" } else { "" };
        let line = Line::from(vec![
            Span::styled(" Search: ", styles::muted_style()),
            Span::styled(format!("{}{}", app.search_query, cursor), styles::search_style()),
        ]);
        frame.render_widget(Paragraph::new(line), inner_chunks[0]);
    }

    if providers.is_empty() {
        let message = if app.providers_loading {
            " Fetching providers..."
        } else if app.search_query.is_empty() {
            " No providers available. Press [r] to refresh."
        } else {
            " No providers match the search."
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(message, styles::muted_style()))),
            inner_chunks[1],
        );
        return;
    }

    let items: Vec<ListItem> = providers
        .iter()
        .enumerate()
        .map(|(i, provider)| {
            let line = Line::from(vec![
                Span::styled(format!(" {:>2} ", initials(&provider.name)), styles::highlight_style()),
                Span::raw(format!("{:<width$}", truncate_string(&provider.name, NAME_WIDTH), width = NAME_WIDTH)),
            ]);

            let style = if i == app.provider_selection {
                styles::selected_style()
            } else {
                styles::list_item_style()
            };

            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items);
    let mut state = ListState::default();
    state.select(Some(app.provider_selection));
    frame.render_stateful_widget(list, inner_chunks[1], &mut state);
}
