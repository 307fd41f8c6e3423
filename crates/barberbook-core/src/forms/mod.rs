//! Form binding and validation.
//!
//! - `Input`: one text field with imperative get/set/clear, focus and the
//!   focused/filled/errored visual state
//! - `Form`: the registry inputs bind to by field name
//! - `validation`: per-form rules collecting every failure into
//!   `ValidationErrors`

pub mod form;
pub mod input;
pub mod validation;

pub use form::Form;
pub use input::Input;
pub use validation::{
    parse_appointment_date, AppointmentData, ProfileData, SignInData, SignUpData, ValidationErrors,
};
