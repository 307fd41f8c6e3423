//! Remembered sign-in password.
//!
//! Only consulted when `Config::remember_password` is set: the TUI saves the
//! password after a successful sign-in and reads it back to pre-fill the
//! sign-in form for the last e-mail. The session token never goes here; it
//! lives in the key-value storage with the user.

use anyhow::{Context, Result};
use keyring::Entry;

/// Keychain service the passwords are filed under
const SERVICE_NAME: &str = "barberbook";

/// OS keychain entries keyed by sign-in e-mail.
pub struct CredentialStore;

impl CredentialStore {
    fn entry(email: &str) -> Result<Entry> {
        Entry::new(SERVICE_NAME, email).context("Failed to open keychain entry")
    }

    /// Remember the password last used to sign in with `email`
    pub fn store(email: &str, password: &str) -> Result<()> {
        Self::entry(email)?
            .set_password(password)
            .context("Failed to save password to keychain")
    }

    /// Password remembered for `email`, used to pre-fill the sign-in form
    pub fn get_password(email: &str) -> Result<String> {
        Self::entry(email)?
            .get_password()
            .context("No remembered password in keychain")
    }
}
