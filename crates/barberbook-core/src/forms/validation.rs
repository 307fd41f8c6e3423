//! Validation rules for each form.
//!
//! Every rule runs; failures are collected rather than stopping at the first
//! one, and each field keeps only its first message.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::auth::Credentials;
use crate::models::{NewUser, ProfileUpdate};

use super::form::Form;

/// Minimum password length at registration
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Format appointment dates are typed in
pub const APPOINTMENT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const NAME_REQUIRED: &str = "Name is required.";
const EMAIL_REQUIRED: &str = "E-mail is required.";
const EMAIL_INVALID: &str = "Enter a valid e-mail.";
const PASSWORD_REQUIRED: &str = "Password is required.";
const PASSWORD_TOO_SHORT: &str = "At least 6 characters.";
const FIELD_REQUIRED: &str = "Field is required.";
const PASSWORDS_DIFFER: &str = "Passwords do not match.";

/// Field name → message for every rule that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct ValidationErrors {
    errors: Vec<(String, String)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure unless the field already has one
    pub fn add(&mut self, field: &str, message: &str) {
        if self.get(field).is_none() {
            self.errors.push((field.to_string(), message.to_string()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, message)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

/// Loose structural e-mail check: one `@`, a non-empty local part and a
/// dotted domain, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn check_email(errors: &mut ValidationErrors, email: &str) {
    if email.is_empty() {
        errors.add("email", EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.add("email", EMAIL_INVALID);
    }
}

fn check_required(errors: &mut ValidationErrors, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.add(field, message);
    }
}

// ============================================================================
// Sign in
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInData {
    pub email: String,
    pub password: String,
}

impl SignInData {
    pub fn from_form(form: &Form) -> Self {
        Self {
            email: form.value("email").trim().to_string(),
            password: form.value("password").to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_email(&mut errors, &self.email);
        if self.password.is_empty() {
            errors.add("password", PASSWORD_REQUIRED);
        }
        errors.into_result()
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

// ============================================================================
// Sign up
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpData {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignUpData {
    pub fn from_form(form: &Form) -> Self {
        Self {
            name: form.value("name").trim().to_string(),
            email: form.value("email").trim().to_string(),
            password: form.value("password").to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name, NAME_REQUIRED);
        check_email(&mut errors, &self.email);
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.add("password", PASSWORD_TOO_SHORT);
        }
        errors.into_result()
    }

    pub fn new_user(&self) -> NewUser {
        NewUser {
            name: self.name.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

// ============================================================================
// Profile
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileData {
    pub name: String,
    pub email: String,
    pub old_password: String,
    pub password: String,
    pub password_confirmation: String,
}

impl ProfileData {
    pub fn from_form(form: &Form) -> Self {
        Self {
            name: form.value("name").trim().to_string(),
            email: form.value("email").trim().to_string(),
            old_password: form.value("old_password").to_string(),
            password: form.value("password").to_string(),
            password_confirmation: form.value("password_confirmation").to_string(),
        }
    }

    /// New and confirmation passwords are required only when the current
    /// password is given; the confirmation must match or be empty.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name, NAME_REQUIRED);
        check_email(&mut errors, &self.email);

        if !self.old_password.is_empty() {
            if self.password.is_empty() {
                errors.add("password", FIELD_REQUIRED);
            }
            if self.password_confirmation.is_empty() {
                errors.add("password_confirmation", FIELD_REQUIRED);
            }
        }

        if !self.password_confirmation.is_empty() && self.password_confirmation != self.password {
            errors.add("password_confirmation", PASSWORDS_DIFFER);
        }

        errors.into_result()
    }

    pub fn update(&self) -> ProfileUpdate {
        ProfileUpdate::new(
            &self.name,
            &self.email,
            &self.old_password,
            &self.password,
            &self.password_confirmation,
        )
    }
}

// ============================================================================
// Appointment
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentData {
    pub date: DateTime<Utc>,
}

impl AppointmentData {
    /// Parse the `date` field as local time; it must lie after `now`.
    pub fn from_form(form: &Form, now: DateTime<Utc>) -> Result<Self, ValidationErrors> {
        let date = parse_appointment_date(form.value("date"), &Local, now)?;
        Ok(Self { date })
    }
}

/// Parse a typed `YYYY-MM-DD HH:MM` in the given zone into a future UTC instant
pub fn parse_appointment_date<Tz: TimeZone>(
    input: &str,
    zone: &Tz,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let input = input.trim();

    if input.is_empty() {
        errors.add("date", "Date is required.");
        return Err(errors);
    }

    let parsed = NaiveDateTime::parse_from_str(input, APPOINTMENT_DATE_FORMAT)
        .ok()
        .and_then(|naive| zone.from_local_datetime(&naive).earliest())
        .map(|local| local.with_timezone(&Utc));

    match parsed {
        Some(date) if date > now => Ok(date),
        Some(_) => {
            errors.add("date", "Choose a date in the future.");
            Err(errors)
        }
        None => {
            errors.add("date", "Use the format YYYY-MM-DD HH:MM.");
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::Input;

    fn sign_in(email: &str, password: &str) -> SignInData {
        SignInData {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn profile(old: &str, new: &str, confirm: &str) -> ProfileData {
        ProfileData {
            name: "Jo Silva".to_string(),
            email: "jo@example.com".to_string(),
            old_password: old.to_string(),
            password: new.to_string(),
            password_confirmation: confirm.to_string(),
        }
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("jo@example.com"));
        assert!(is_valid_email("jo.silva+tag@mail.example.com.br"));

        assert!(!is_valid_email("jo"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("jo@example"));
        assert!(!is_valid_email("jo@.example.com"));
        assert!(!is_valid_email("jo@example..com"));
        assert!(!is_valid_email("jo @example.com"));
        assert!(!is_valid_email("jo@a@example.com"));
    }

    #[test]
    fn test_sign_in_collects_all_failures() {
        let errors = sign_in("", "").validate().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("email"), Some(EMAIL_REQUIRED));
        assert_eq!(errors.get("password"), Some(PASSWORD_REQUIRED));

        let errors = sign_in("not-an-email", "secret").validate().unwrap_err();
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));
        assert_eq!(errors.get("password"), None);

        assert!(sign_in("jo@example.com", "secret").validate().is_ok());
    }

    #[test]
    fn test_sign_in_from_form_trims_email() {
        let form = Form::new()
            .with(Input::new("email", "E-mail").with_default("  jo@example.com "))
            .with(Input::new("password", "Password").with_default(" pw "));
        let data = SignInData::from_form(&form);
        assert_eq!(data.email, "jo@example.com");
        assert_eq!(data.password, " pw ");
        assert_eq!(data.credentials().email, "jo@example.com");
    }

    #[test]
    fn test_sign_up_rules() {
        let data = SignUpData {
            name: " ".to_string(),
            email: "jo@example".to_string(),
            password: "12345".to_string(),
        };
        let errors = data.validate().unwrap_err();
        assert_eq!(errors.get("name"), Some(NAME_REQUIRED));
        assert_eq!(errors.get("email"), Some(EMAIL_INVALID));
        assert_eq!(errors.get("password"), Some(PASSWORD_TOO_SHORT));

        let data = SignUpData {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
            password: "123456".to_string(),
        };
        assert!(data.validate().is_ok());
        assert_eq!(data.new_user().password, "123456");
    }

    #[test]
    fn test_profile_without_password_change() {
        assert!(profile("", "", "").validate().is_ok());
        assert!(!profile("", "", "").update().changes_password());
    }

    #[test]
    fn test_profile_password_change_requires_new_fields() {
        let errors = profile("old123", "", "").validate().unwrap_err();
        assert_eq!(errors.get("password"), Some(FIELD_REQUIRED));
        assert_eq!(errors.get("password_confirmation"), Some(FIELD_REQUIRED));

        let ok = profile("old123", "new456", "new456");
        assert!(ok.validate().is_ok());
        assert!(ok.update().changes_password());
    }

    #[test]
    fn test_profile_confirmation_must_match() {
        let errors = profile("old123", "new456", "new789").validate().unwrap_err();
        assert_eq!(errors.get("password_confirmation"), Some(PASSWORDS_DIFFER));

        // Confirmation is checked even without the current password
        let errors = profile("", "new456", "other").validate().unwrap_err();
        assert_eq!(errors.get("password_confirmation"), Some(PASSWORDS_DIFFER));
        assert_eq!(errors.get("password"), None);
    }

    #[test]
    fn test_parse_appointment_date() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();

        let date = parse_appointment_date("2026-10-20 14:00", &Utc, now).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 10, 20, 14, 0, 0).unwrap());

        let past = parse_appointment_date("2026-10-18 09:00", &Utc, now).unwrap_err();
        assert_eq!(past.get("date"), Some("Choose a date in the future."));

        let garbled = parse_appointment_date("tomorrow", &Utc, now).unwrap_err();
        assert_eq!(garbled.get("date"), Some("Use the format YYYY-MM-DD HH:MM."));

        let empty = parse_appointment_date("  ", &Utc, now).unwrap_err();
        assert_eq!(empty.get("date"), Some("Date is required."));
    }

    #[test]
    fn test_parse_appointment_date_honours_zone() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let sao_paulo = chrono::FixedOffset::west_opt(3 * 3600).unwrap();
        let date = parse_appointment_date("2026-10-20 14:00", &sao_paulo, now).unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2026, 10, 20, 17, 0, 0).unwrap());
    }

    #[test]
    fn test_validation_errors_keep_first_message() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "first");
        errors.add("email", "second");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("email"), Some("first"));
        assert_eq!(errors.to_string(), "1 field(s) failed validation");
    }
}
