//! Application state management for Barberbook.
//!
//! This module contains the `App` struct that owns UI state, the session
//! handle, the screen stack and the background task channel.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use barberbook_core::auth::{CredentialStore, FileStorage};
use barberbook_core::forms::{AppointmentData, Form, Input, ProfileData, SignInData, SignUpData};
use barberbook_core::models::{Appointment, NewAppointment, Provider};
use barberbook_core::utils::{cmp_ignore_case, format_appointment_date};
use barberbook_core::{ApiClient, Auth, Config, Navigator, Route, Screen};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

/// Environment variable pre-filling the sign-in e-mail
const EMAIL_ENV: &str = "BARBERBOOK_EMAIL";

/// Environment variable pre-filling the sign-in password
const PASSWORD_ENV: &str = "BARBERBOOK_PASSWORD";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    Booking,
    EditingAvatar,
    ShowingHelp,
    ShowingAlert,
    ConfirmingQuit,
    Quitting,
}

/// Modal message shown after an operation finishes or fails
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent back from spawned tasks over the MPSC channel.
enum TaskResult {
    /// Launch rehydration finished; true when a session was restored
    Rehydrated(bool),
    /// Provider list fetched for the dashboard
    Providers { generation: u64, providers: Vec<Provider> },
    /// The provider fetch failed
    Error { generation: u64, message: String },
}

// ============================================================================
// Form builders
// ============================================================================

fn sign_in_form() -> Form {
    Form::new()
        .with(Input::new("email", "E-mail"))
        .with(Input::new("password", "Password").secure())
}

fn sign_up_form() -> Form {
    Form::new()
        .with(Input::new("name", "Name"))
        .with(Input::new("email", "E-mail"))
        .with(Input::new("password", "Password").secure())
}

fn profile_form() -> Form {
    Form::new()
        .with(Input::new("name", "Name"))
        .with(Input::new("email", "E-mail"))
        .with(Input::new("old_password", "Current password").secure())
        .with(Input::new("password", "New password").secure())
        .with(Input::new("password_confirmation", "Confirm password").secure())
}

fn booking_form() -> Form {
    Form::new().with(Input::new("date", "YYYY-MM-DD HH:MM"))
}

fn avatar_form() -> Form {
    Form::new().with(Input::new("path", "Path to a JPEG image"))
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub auth: Auth,
    pub api: ApiClient,

    // Navigation
    pub navigator: Navigator,
    pub state: AppState,
    pub alert: Option<Alert>,
    pub status_message: Option<String>,

    // Forms, one per screen or overlay
    pub sign_in_form: Form,
    pub sign_up_form: Form,
    pub profile_form: Form,
    pub booking_form: Form,
    pub avatar_form: Form,

    // Dashboard
    pub providers: Vec<Provider>,
    pub providers_loading: bool,
    pub provider_selection: usize,
    pub search_query: String,
    // Bumped per fetch and per route change; older fetch results are stale
    providers_generation: u64,

    // Provider picked when the booking overlay opened
    pub booking_provider: Option<Provider>,

    // Last booking, shown on the confirmation screen
    pub last_appointment: Option<Appointment>,

    // Config and keychain writes are skipped when false
    save_settings: bool,

    // Background task channel
    task_rx: mpsc::Receiver<TaskResult>,
    task_tx: mpsc::Sender<TaskResult>,
}

impl App {
    /// Create the application with file-backed session storage
    pub fn new(config: Config) -> Result<Self> {
        let api = ApiClient::new(&config.api_url())?;
        debug!(api_url = api.base_url(), "API client configured");

        let storage_path = config
            .storage_path()
            .unwrap_or_else(|_| PathBuf::from("./storage.json"));
        debug!(?storage_path, "Session storage configured");

        let auth = Auth::new(Arc::new(api.clone()), Arc::new(FileStorage::new(storage_path)));

        let mut app = Self::with_services(config, auth, api);
        app.save_settings = true;
        app.prefill_sign_in();
        Ok(app)
    }

    /// Create the application around existing services
    pub fn with_services(config: Config, auth: Auth, api: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            auth,
            api,

            navigator: Navigator::new(),
            state: AppState::Normal,
            alert: None,
            status_message: None,

            sign_in_form: sign_in_form(),
            sign_up_form: sign_up_form(),
            profile_form: profile_form(),
            booking_form: booking_form(),
            avatar_form: avatar_form(),

            providers: Vec::new(),
            providers_loading: false,
            provider_selection: 0,
            search_query: String::new(),
            providers_generation: 0,

            booking_provider: None,

            last_appointment: None,

            save_settings: false,

            task_rx: rx,
            task_tx: tx,
        }
    }

    /// Fill the sign-in form from the environment, config and keychain
    fn prefill_sign_in(&mut self) {
        let email = std::env::var(EMAIL_ENV)
            .ok()
            .or_else(|| self.config.last_email.clone())
            .unwrap_or_default();

        let password = std::env::var(PASSWORD_ENV).ok().or_else(|| {
            if self.config.remember_password && !email.is_empty() {
                CredentialStore::get_password(&email).ok()
            } else {
                None
            }
        });

        self.sign_in_form.set_value("email", &email);
        if let Some(password) = password {
            self.sign_in_form.set_value("password", &password);
        }
    }

    // =========================================================================
    // Routing
    // =========================================================================

    pub fn route(&self) -> Route {
        self.navigator.route()
    }

    pub fn current_screen(&self) -> Option<Screen> {
        self.navigator.current()
    }

    /// Follow the session state; resets per-route UI state when the route flips
    pub fn sync_route(&mut self) {
        let route = Route::from_state(&self.auth.state());
        if !self.navigator.sync(route) {
            return;
        }
        debug!(?route, "Route changed");
        self.providers_generation += 1;
        self.providers_loading = false;
        self.booking_provider = None;

        match route {
            Route::Loading => {}
            Route::Unauthenticated => {
                self.providers.clear();
                self.last_appointment = None;
                self.sign_up_form.reset();
                self.sign_in_form.clear_value("password");
                self.sign_in_form.clear_errors();
                if self.sign_in_form.value("email").is_empty() {
                    self.sign_in_form.focus("email");
                } else {
                    self.sign_in_form.focus("password");
                }
            }
            Route::Authenticated => {
                self.sign_in_form.clear_value("password");
                self.sign_in_form.blur();
                self.provider_selection = 0;
                self.search_query.clear();
                self.refresh_providers();
            }
        }
    }

    /// API client carrying the session token, if signed in
    fn authed_api(&self) -> Option<ApiClient> {
        self.auth.token().map(|token| self.api.with_token(token))
    }

    // =========================================================================
    // Background Tasks
    // =========================================================================

    /// Rehydrate the session off the UI loop; the loading view shows until
    /// the result arrives.
    pub fn start_rehydration(&self) {
        let auth = self.auth.clone();
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let restored = auth.load().await;
            Self::send_result(&tx, TaskResult::Rehydrated(restored)).await;
        });
    }

    /// Fetch the provider list in the background
    pub fn refresh_providers(&mut self) {
        let Some(api) = self.authed_api() else {
            return;
        };
        self.providers_loading = true;
        self.providers_generation += 1;
        let generation = self.providers_generation;
        let tx = self.task_tx.clone();
        tokio::spawn(async move {
            let result = match api.list_providers().await {
                Ok(providers) => TaskResult::Providers {
                    generation,
                    providers,
                },
                Err(e) => {
                    error!(error = %e, "Failed to fetch providers");
                    TaskResult::Error {
                        generation,
                        message: "Could not load providers".to_string(),
                    }
                }
            };
            Self::send_result(&tx, result).await;
        });
    }

    async fn send_result(tx: &mpsc::Sender<TaskResult>, result: TaskResult) {
        if tx.send(result).await.is_err() {
            warn!("Task result dropped, receiver closed");
        }
    }

    /// Drain finished background tasks and follow any route change
    pub async fn check_background_tasks(&mut self) {
        while let Ok(result) = self.task_rx.try_recv() {
            self.process_task_result(result);
        }
        self.sync_route();
    }

    fn process_task_result(&mut self, result: TaskResult) {
        match result {
            TaskResult::Rehydrated(restored) => {
                info!(restored, "Session ready");
            }
            TaskResult::Providers { generation, .. } | TaskResult::Error { generation, .. }
                if generation != self.providers_generation =>
            {
                debug!(
                    generation,
                    current = self.providers_generation,
                    "Dropping stale provider result"
                );
            }
            TaskResult::Providers { providers, .. } => {
                debug!(count = providers.len(), "Providers loaded");
                let selected_id = self.selected_provider().map(|p| p.id.clone());
                self.providers = providers;
                self.providers_loading = false;

                // Keep the same provider selected after the list re-sorts
                let visible = self.filtered_providers();
                let selection = selected_id
                    .and_then(|id| visible.iter().position(|p| p.id == id))
                    .unwrap_or(self.provider_selection)
                    .min(visible.len().saturating_sub(1));
                self.provider_selection = selection;
            }
            TaskResult::Error { message, .. } => {
                self.providers_loading = false;
                self.status_message = Some(message);
            }
        }
    }

    // =========================================================================
    // Alerts
    // =========================================================================

    pub fn show_alert(&mut self, title: &str, message: &str) {
        self.alert = Some(Alert {
            title: title.to_string(),
            message: message.to_string(),
        });
        self.state = AppState::ShowingAlert;
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
        self.state = AppState::Normal;
    }

    // =========================================================================
    // Sign in / Sign up / Sign out
    // =========================================================================

    pub async fn submit_sign_in(&mut self) {
        self.sign_in_form.clear_errors();
        let data = SignInData::from_form(&self.sign_in_form);
        if let Err(errors) = data.validate() {
            self.sign_in_form.set_errors(&errors);
            return;
        }

        match self.auth.sign_in(&data.credentials()).await {
            Ok(()) => {
                self.remember_sign_in(&data);
                self.sync_route();
            }
            Err(e) => {
                error!(error = %e, "Sign-in failed");
                self.show_alert(
                    "Authentication problem",
                    "Could not sign in, check your e-mail and password.",
                );
            }
        }
    }

    fn remember_sign_in(&mut self, data: &SignInData) {
        if !self.save_settings {
            return;
        }
        if self.config.remember_password {
            if let Err(e) = CredentialStore::store(&data.email, &data.password) {
                warn!(error = %e, "Failed to store credentials");
            }
        }
        self.config.last_email = Some(data.email.clone());
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }
    }

    pub fn open_sign_up(&mut self) {
        self.sign_up_form.reset();
        self.sign_up_form.focus("name");
        self.navigator.navigate(Screen::SignUp);
    }

    pub async fn submit_sign_up(&mut self) {
        self.sign_up_form.clear_errors();
        let data = SignUpData::from_form(&self.sign_up_form);
        if let Err(errors) = data.validate() {
            self.sign_up_form.set_errors(&errors);
            return;
        }

        match self.api.create_user(&data.new_user()).await {
            Ok(user) => {
                info!(user_id = %user.id, "Account created");
                self.sign_up_form.reset();
                self.sign_in_form.set_value("email", &data.email);
                self.sign_in_form.focus("password");
                self.navigator.go_back();
                self.show_alert("Account created", "You can now sign in.");
            }
            Err(e) => {
                error!(error = %e, "Sign-up failed");
                self.show_alert("Sign-up failed", "Could not create the account.");
            }
        }
    }

    pub async fn sign_out(&mut self) {
        if let Err(e) = self.auth.sign_out().await {
            warn!(error = %e, "Sign-out could not clear storage");
        }
        self.state = AppState::Normal;
        self.sync_route();
    }

    // =========================================================================
    // Profile
    // =========================================================================

    pub fn open_profile(&mut self) {
        let Some(user) = self.auth.user() else {
            return;
        };
        self.profile_form.reset();
        self.profile_form
            .set_initial_data(&[("name", user.name.as_str()), ("email", user.email.as_str())]);
        self.profile_form.focus("name");
        self.navigator.navigate(Screen::Profile);
    }

    pub async fn submit_profile(&mut self) {
        self.profile_form.clear_errors();
        let data = ProfileData::from_form(&self.profile_form);
        if let Err(errors) = data.validate() {
            self.profile_form.set_errors(&errors);
            return;
        }
        let Some(api) = self.authed_api() else {
            return;
        };

        let result = match api.update_profile(&data.update()).await {
            Ok(user) => self.auth.update_user(user).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.navigator.go_back();
                self.show_alert("Profile updated", "Your profile was saved.");
            }
            Err(e) => {
                error!(error = %e, "Profile update failed");
                self.show_alert("Error", "Could not update the profile.");
            }
        }
    }

    pub fn start_avatar_edit(&mut self) {
        self.avatar_form.reset();
        self.avatar_form.focus("path");
        self.state = AppState::EditingAvatar;
    }

    pub async fn submit_avatar(&mut self) {
        let path = self.avatar_form.value("path").trim().to_string();
        let (Some(api), Some(user)) = (self.authed_api(), self.auth.user()) else {
            return;
        };

        let image = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, path = %path, "Failed to read avatar image");
                self.show_alert("Error updating image", &format!("Could not read {}", path));
                return;
            }
        };

        let result = match api.update_avatar(&user, image).await {
            Ok(updated) => self.auth.update_user(updated).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                self.state = AppState::Normal;
                self.status_message = Some("Avatar updated".to_string());
            }
            Err(e) => {
                error!(error = %e, "Avatar update failed");
                self.show_alert("Error updating image", "The image could not be uploaded.");
            }
        }
    }

    // =========================================================================
    // Dashboard & Booking
    // =========================================================================

    /// Providers matching the search, sorted by name
    pub fn filtered_providers(&self) -> Vec<&Provider> {
        let mut providers: Vec<&Provider> = self
            .providers
            .iter()
            .filter(|p| p.matches_search(&self.search_query))
            .collect();
        providers.sort_by(|a, b| cmp_ignore_case(&a.name, &b.name));
        providers
    }

    pub fn selected_provider(&self) -> Option<&Provider> {
        self.filtered_providers().get(self.provider_selection).copied()
    }

    pub fn select_next_provider(&mut self, step: usize) {
        let count = self.filtered_providers().len();
        if count > 0 {
            self.provider_selection = (self.provider_selection + step).min(count - 1);
        }
    }

    pub fn select_prev_provider(&mut self, step: usize) {
        self.provider_selection = self.provider_selection.saturating_sub(step);
    }

    pub fn start_booking(&mut self) {
        let Some(provider) = self.selected_provider().cloned() else {
            return;
        };
        self.booking_provider = Some(provider);
        self.booking_form.reset();
        self.booking_form.focus("date");
        self.state = AppState::Booking;
    }

    pub async fn submit_booking(&mut self) {
        self.booking_form.clear_errors();
        let data = match AppointmentData::from_form(&self.booking_form, Utc::now()) {
            Ok(data) => data,
            Err(errors) => {
                self.booking_form.set_errors(&errors);
                return;
            }
        };
        let Some(provider_id) = self.booking_provider.as_ref().map(|p| p.id.clone()) else {
            return;
        };
        let Some(api) = self.authed_api() else {
            return;
        };

        let request = NewAppointment {
            provider_id,
            date: data.date,
        };
        match api.create_appointment(&request).await {
            Ok(appointment) => {
                info!(appointment_id = %appointment.id, "Appointment booked");
                self.last_appointment = Some(appointment);
                self.booking_provider = None;
                self.state = AppState::Normal;
                self.navigator.navigate(Screen::AppointmentCreated);
            }
            Err(e) => {
                error!(error = %e, "Booking failed");
                self.show_alert("Booking failed", "Could not book the appointment.");
            }
        }
    }

    /// Long-form local date of the last booking
    pub fn appointment_date_display(&self) -> Option<String> {
        self.last_appointment
            .as_ref()
            .map(|a| format_appointment_date(&a.date.with_timezone(&Local)))
    }

    /// Leave the confirmation screen, starting over from the dashboard
    pub fn acknowledge_appointment(&mut self) {
        self.navigator.reset_to(Screen::Dashboard);
        self.refresh_providers();
    }

    // =========================================================================
    // Forms
    // =========================================================================

    /// Form receiving keystrokes in the current state and screen
    pub fn active_form_mut(&mut self) -> Option<&mut Form> {
        match self.state {
            AppState::Booking => return Some(&mut self.booking_form),
            AppState::EditingAvatar => return Some(&mut self.avatar_form),
            _ => {}
        }
        match self.navigator.current()? {
            Screen::SignIn => Some(&mut self.sign_in_form),
            Screen::SignUp => Some(&mut self.sign_up_form),
            Screen::Profile => Some(&mut self.profile_form),
            Screen::Dashboard | Screen::AppointmentCreated => None,
        }
    }

    /// Submit whichever form is active
    pub async fn submit_active_form(&mut self) {
        match self.state {
            AppState::Booking => return self.submit_booking().await,
            AppState::EditingAvatar => return self.submit_avatar().await,
            _ => {}
        }
        match self.navigator.current() {
            Some(Screen::SignIn) => self.submit_sign_in().await,
            Some(Screen::SignUp) => self.submit_sign_up().await,
            Some(Screen::Profile) => self.submit_profile().await,
            _ => {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
