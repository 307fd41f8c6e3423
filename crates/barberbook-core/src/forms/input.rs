/// Maximum characters a single field accepts.
/// 128 accommodates password managers and passphrases.
pub const MAX_INPUT_LENGTH: usize = 128;

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// A text field bound to a form by name.
///
/// Tracks its own focus and fill state: `filled` is only recomputed when the
/// field loses focus, so the highlight follows the user rather than
/// programmatic `set_value` calls.
#[derive(Debug, Clone)]
pub struct Input {
    name: String,
    placeholder: String,
    value: String,
    secure: bool,
    focused: bool,
    filled: bool,
    error: Option<String>,
}

impl Input {
    pub fn new(name: &str, placeholder: &str) -> Self {
        Self {
            name: name.to_string(),
            placeholder: placeholder.to_string(),
            value: String::new(),
            secure: false,
            focused: false,
            filled: false,
            error: None,
        }
    }

    /// Mask the value when displayed
    pub fn secure(mut self) -> Self {
        self.secure = true;
        self
    }

    pub fn with_default(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    // ===== Imperative value access =====

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Append a typed character. Rejects control characters and overflow.
    pub fn push_char(&mut self, c: char) -> bool {
        if self.value.chars().count() >= MAX_INPUT_LENGTH || !is_valid_input_char(c) {
            return false;
        }
        self.value.push(c);
        true
    }

    pub fn pop_char(&mut self) -> Option<char> {
        self.value.pop()
    }

    // ===== Focus =====

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
        self.filled = !self.value.is_empty();
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_filled(&self) -> bool {
        self.filled
    }

    /// Whether the field icon should use the accent color
    pub fn is_highlighted(&self) -> bool {
        self.focused || self.filled
    }

    // ===== Errors =====

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_errored(&self) -> bool {
        self.error.is_some()
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    /// Value as it should be drawn: masked for secure fields
    pub fn display_value(&self) -> String {
        if self.secure {
            "*".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}
