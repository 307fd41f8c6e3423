//! Utility functions for string and date formatting.

pub mod format;

pub use format::{cmp_ignore_case, contains_ignore_case, format_appointment_date, initials, truncate_string};
