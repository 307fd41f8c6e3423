use std::collections::HashMap;

use super::input::Input;
use super::validation::ValidationErrors;

/// Ordered set of inputs registered by field name.
///
/// Owns focus: at most one input is focused, and `focus_next` walks the
/// registration order the way the return key moves down a form.
#[derive(Debug, Clone, Default)]
pub struct Form {
    inputs: Vec<Input>,
    focused: Option<usize>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `register`
    pub fn with(mut self, input: Input) -> Self {
        self.register(input);
        self
    }

    /// Register an input. A second input with the same name replaces the first.
    pub fn register(&mut self, input: Input) {
        match self.position(input.name()) {
            Some(index) => self.inputs[index] = input,
            None => self.inputs.push(input),
        }
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.inputs.iter().position(|i| i.name() == name)
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn field(&self, name: &str) -> Option<&Input> {
        self.inputs.iter().find(|i| i.name() == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut Input> {
        self.inputs.iter_mut().find(|i| i.name() == name)
    }

    // ===== Values =====

    /// Current value of a field, empty when the field is not registered
    pub fn value(&self, name: &str) -> &str {
        self.field(name).map(Input::value).unwrap_or("")
    }

    pub fn set_value(&mut self, name: &str, value: &str) -> bool {
        match self.field_mut(name) {
            Some(input) => {
                input.set_value(value);
                true
            }
            None => false,
        }
    }

    pub fn clear_value(&mut self, name: &str) -> bool {
        match self.field_mut(name) {
            Some(input) => {
                input.clear();
                true
            }
            None => false,
        }
    }

    /// Snapshot of every field value keyed by name
    pub fn data(&self) -> HashMap<String, String> {
        self.inputs
            .iter()
            .map(|i| (i.name().to_string(), i.value().to_string()))
            .collect()
    }

    /// Fill fields from `(name, value)` pairs, ignoring unknown names
    pub fn set_initial_data(&mut self, data: &[(&str, &str)]) {
        for (name, value) in data {
            self.set_value(name, value);
        }
    }

    /// Clear every value and error
    pub fn reset(&mut self) {
        for input in &mut self.inputs {
            input.clear();
            input.set_error(None);
            input.blur();
        }
        self.focused = None;
    }

    // ===== Focus =====

    pub fn focused(&self) -> Option<&Input> {
        self.focused.map(|i| &self.inputs[i])
    }

    pub fn focused_mut(&mut self) -> Option<&mut Input> {
        self.focused.map(|i| &mut self.inputs[i])
    }

    pub fn focused_name(&self) -> Option<&str> {
        self.focused().map(Input::name)
    }

    pub fn focus(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.focus_index(index);
                true
            }
            None => false,
        }
    }

    fn focus_index(&mut self, index: usize) {
        if let Some(current) = self.focused {
            self.inputs[current].blur();
        }
        self.inputs[index].focus();
        self.focused = Some(index);
    }

    pub fn blur(&mut self) {
        if let Some(current) = self.focused.take() {
            self.inputs[current].blur();
        }
    }

    /// Move focus to the next field. Returns false when already on the last
    /// field, which callers treat as "submit".
    pub fn focus_next(&mut self) -> bool {
        let next = match self.focused {
            Some(current) if current + 1 < self.inputs.len() => current + 1,
            Some(_) => return false,
            None if !self.inputs.is_empty() => 0,
            None => return false,
        };
        self.focus_index(next);
        true
    }

    /// Move focus to the previous field, wrapping to the last one
    pub fn focus_prev(&mut self) {
        if self.inputs.is_empty() {
            return;
        }
        let prev = match self.focused {
            Some(0) | None => self.inputs.len() - 1,
            Some(current) => current - 1,
        };
        self.focus_index(prev);
    }

    /// Cycle forward, wrapping from the last field to the first
    pub fn cycle_focus(&mut self) {
        if !self.focus_next() && !self.inputs.is_empty() {
            self.focus_index(0);
        }
    }

    // ===== Errors =====

    /// Replace all field errors with the given set
    pub fn set_errors(&mut self, errors: &ValidationErrors) {
        for input in &mut self.inputs {
            let error = errors.get(input.name()).map(str::to_string);
            input.set_error(error);
        }
    }

    pub fn clear_errors(&mut self) {
        for input in &mut self.inputs {
            input.set_error(None);
        }
    }

    pub fn has_errors(&self) -> bool {
        self.inputs.iter().any(Input::is_errored)
    }
}
