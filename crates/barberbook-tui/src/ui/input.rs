//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use barberbook_core::{Route, Screen};

use crate::app::{App, AppState, PAGE_SCROLL_SIZE};

/// Handle keyboard input. Returns true if the app should quit.
pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Alerts swallow the next key
    if matches!(app.state, AppState::ShowingAlert) {
        if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
            app.dismiss_alert();
        }
        return Ok(false);
    }

    // Handle help overlay
    if matches!(app.state, AppState::ShowingHelp) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
            app.state = AppState::Normal;
        }
        return Ok(false);
    }

    // Handle quit confirmation
    if matches!(app.state, AppState::ConfirmingQuit) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                return Ok(true);
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
            }
            _ => {}
        }
        return Ok(false);
    }

    // Booking and avatar overlays own the keyboard until closed
    if matches!(app.state, AppState::Booking | AppState::EditingAvatar) {
        if key.code == KeyCode::Esc {
            app.state = AppState::Normal;
            return Ok(false);
        }
        return handle_form_input(app, key).await;
    }

    // Handle search mode
    if matches!(app.state, AppState::Searching) {
        return handle_search_input(app, key);
    }

    if app.route() == Route::Loading {
        if matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        return Ok(false);
    }

    match app.current_screen() {
        Some(Screen::SignIn) => handle_sign_in_input(app, key).await,
        Some(Screen::SignUp) => handle_sign_up_input(app, key).await,
        Some(Screen::Profile) => handle_profile_input(app, key).await,
        Some(Screen::Dashboard) => handle_dashboard_input(app, key).await,
        Some(Screen::AppointmentCreated) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.acknowledge_appointment();
            }
            Ok(false)
        }
        None => Ok(false),
    }
}

/// Keys shared by every form: focus movement, editing and submit
async fn handle_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    let submit = {
        let Some(form) = app.active_form_mut() else {
            return Ok(false);
        };
        match key.code {
            KeyCode::Char('s') if ctrl => true,
            KeyCode::Tab | KeyCode::Down => {
                form.cycle_focus();
                false
            }
            KeyCode::BackTab | KeyCode::Up => {
                form.focus_prev();
                false
            }
            // Return moves to the next field and submits from the last one
            KeyCode::Enter => !form.focus_next(),
            KeyCode::Backspace => {
                if let Some(input) = form.focused_mut() {
                    input.pop_char();
                }
                false
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(input) = form.focused_mut() {
                    input.push_char(c);
                }
                false
            }
            _ => false,
        }
    };

    if submit {
        app.status_message = None;
        app.submit_active_form().await;
    }
    Ok(false)
}

async fn handle_sign_in_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('n') if ctrl => app.open_sign_up(),
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        _ => return handle_form_input(app, key).await,
    }
    Ok(false)
}

async fn handle_sign_up_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.navigator.go_back();
        }
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        _ => return handle_form_input(app, key).await,
    }
    Ok(false)
}

async fn handle_profile_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => {
            app.navigator.go_back();
        }
        KeyCode::Char('a') if ctrl => app.start_avatar_edit(),
        KeyCode::Char('o') if ctrl => app.sign_out().await,
        KeyCode::F(1) => app.state = AppState::ShowingHelp,
        _ => return handle_form_input(app, key).await,
    }
    Ok(false)
}

async fn handle_dashboard_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
            app.search_query.clear();
            app.provider_selection = 0;
        }
        KeyCode::Esc => {
            if !app.search_query.is_empty() {
                app.search_query.clear();
                app.provider_selection = 0;
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.select_next_provider(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_provider(1),
        KeyCode::PageDown => app.select_next_provider(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev_provider(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.provider_selection = 0,
        KeyCode::Enter | KeyCode::Char('b') => app.start_booking(),
        KeyCode::Char('p') => app.open_profile(),
        KeyCode::Char('r') => {
            app.status_message = None;
            app.refresh_providers();
        }
        KeyCode::Char('o') => app.sign_out().await,
        _ => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.state = AppState::Normal;
            app.search_query.clear();
        }
        KeyCode::Enter => {
            // Keep search query active
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            app.search_query.pop();
            app.provider_selection = 0;
        }
        KeyCode::Char(c) => {
            app.search_query.push(c);
            app.provider_selection = 0;
        }
        _ => {}
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use barberbook_core::auth::{Credentials, MemoryStorage, Session, SessionBackend};
    use barberbook_core::models::{Provider, User};
    use barberbook_core::{ApiClient, Auth, Config};
    use futures::future::{self, BoxFuture, FutureExt};

    struct StubBackend;

    impl SessionBackend for StubBackend {
        fn create_session<'a>(
            &'a self,
            credentials: &'a Credentials,
        ) -> BoxFuture<'a, Result<Session>> {
            let result = if credentials.password == "123456" {
                Ok(Session {
                    token: "jwt".to_string(),
                    user: User {
                        id: "u1".to_string(),
                        name: "Jo Silva".to_string(),
                        email: credentials.email.clone(),
                        avatar_url: None,
                    },
                })
            } else {
                Err(anyhow::anyhow!("Unauthorized"))
            };
            future::ready(result).boxed()
        }
    }

    async fn ready_app() -> App {
        let api = ApiClient::new("http://127.0.0.1:9").expect("client should build");
        let auth = Auth::new(Arc::new(StubBackend), Arc::new(MemoryStorage::new()));
        let mut app = App::with_services(Config::default(), auth, api);
        app.auth.load().await;
        app.sync_route();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_input(app, key(KeyCode::Char(c))).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_typing_and_enter_signs_in() {
        let mut app = ready_app().await;

        type_text(&mut app, "jo@example.com").await;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert_eq!(app.sign_in_form.focused_name(), Some("password"));
        assert!(app.sign_in_form.field("email").unwrap().is_filled());

        type_text(&mut app, "123456").await;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.current_screen(), Some(Screen::Dashboard));
    }

    #[tokio::test]
    async fn test_backspace_edits_focused_field() {
        let mut app = ready_app().await;
        type_text(&mut app, "jox").await;
        handle_input(&mut app, key(KeyCode::Backspace)).await.unwrap();
        assert_eq!(app.sign_in_form.value("email"), "jo");
    }

    #[tokio::test]
    async fn test_ctrl_n_opens_sign_up_and_esc_returns() {
        let mut app = ready_app().await;
        handle_input(&mut app, ctrl('n')).await.unwrap();
        assert_eq!(app.current_screen(), Some(Screen::SignUp));

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.current_screen(), Some(Screen::SignIn));
    }

    #[tokio::test]
    async fn test_alert_is_dismissed_with_enter() {
        let mut app = ready_app().await;
        app.show_alert("Authentication problem", "Try again");

        // Typing does not reach the form while the alert is open
        handle_input(&mut app, key(KeyCode::Char('x'))).await.unwrap();
        assert_eq!(app.sign_in_form.value("email"), "");

        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();
        assert!(app.alert.is_none());
        assert_eq!(app.state, AppState::Normal);
    }

    #[tokio::test]
    async fn test_quit_confirmation() {
        let mut app = ready_app().await;
        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::ConfirmingQuit);

        handle_input(&mut app, key(KeyCode::Char('n'))).await.unwrap();
        assert_eq!(app.state, AppState::Normal);

        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        let quit = handle_input(&mut app, key(KeyCode::Char('y'))).await.unwrap();
        assert!(quit);
        assert_eq!(app.state, AppState::Quitting);
    }

    #[tokio::test]
    async fn test_dashboard_search_and_selection() {
        let mut app = ready_app().await;
        app.sign_in_form.set_value("email", "jo@example.com");
        app.sign_in_form.set_value("password", "123456");
        app.submit_sign_in().await;
        app.providers = vec![
            Provider {
                id: "p1".to_string(),
                name: "Ana Costa".to_string(),
                avatar_url: None,
            },
            Provider {
                id: "p2".to_string(),
                name: "Bruno Lima".to_string(),
                avatar_url: None,
            },
        ];

        handle_input(&mut app, key(KeyCode::Char('j'))).await.unwrap();
        assert_eq!(app.provider_selection, 1);

        handle_input(&mut app, key(KeyCode::Char('/'))).await.unwrap();
        assert_eq!(app.state, AppState::Searching);
        type_text(&mut app, "bru").await;
        handle_input(&mut app, key(KeyCode::Enter)).await.unwrap();

        assert_eq!(app.state, AppState::Normal);
        assert_eq!(app.selected_provider().map(|p| p.id.as_str()), Some("p2"));

        handle_input(&mut app, key(KeyCode::Char('b'))).await.unwrap();
        assert_eq!(app.state, AppState::Booking);
        handle_input(&mut app, key(KeyCode::Esc)).await.unwrap();
        assert_eq!(app.state, AppState::Normal);
    }
}
