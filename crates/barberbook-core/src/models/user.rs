use serde::{Deserialize, Serialize};

/// The authenticated customer.
///
/// Replaced wholesale whenever the profile or avatar changes; nothing edits
/// individual fields of a stored `User`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    /// First word of the name, used in greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }

    /// File name the avatar upload is sent under.
    pub fn avatar_file_name(&self) -> String {
        format!("{}.jpg", self.id)
    }

    pub fn has_avatar(&self) -> bool {
        self.avatar_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// Registration body for `POST /users`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Body for `PUT /profile`.
///
/// The password fields are only sent when the current password was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

impl ProfileUpdate {
    pub fn new(
        name: &str,
        email: &str,
        old_password: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Self {
        let changing_password = !old_password.is_empty();
        let keep = |value: &str| changing_password.then(|| value.to_string());
        Self {
            name: name.to_string(),
            email: email.to_string(),
            old_password: keep(old_password),
            password: keep(password),
            password_confirmation: keep(password_confirmation),
        }
    }

    pub fn changes_password(&self) -> bool {
        self.old_password.is_some()
    }
}
