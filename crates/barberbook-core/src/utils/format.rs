use std::cmp::Ordering;
use std::fmt::Display;

use chrono::{DateTime, TimeZone};

/// Long-form appointment date, e.g. "Tuesday, 20 of October of 2026 at 14:00h"
pub fn format_appointment_date<Tz>(date: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    date.format("%A, %d of %B of %Y at %H:%Mh").to_string()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Up to two uppercase initials, shown where an avatar image would go
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_appointment_date() {
        let date = Utc.with_ymd_and_hms(2026, 10, 20, 14, 0, 0).unwrap();
        assert_eq!(
            format_appointment_date(&date),
            "Tuesday, 20 of October of 2026 at 14:00h"
        );
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("João Gonçalves", 7), "João...");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("ana costa"), "AC");
        assert_eq!(initials("Bruno de Lima"), "BD");
        assert_eq!(initials("Jo"), "J");
        assert_eq!(initials(""), "");
    }

    #[test]
    fn test_ignore_case_helpers() {
        assert!(contains_ignore_case("Ana Costa", "COSTA"));
        assert!(!contains_ignore_case("Ana Costa", "lima"));
        assert_eq!(cmp_ignore_case("ana", "Bruno"), Ordering::Less);
        assert_eq!(cmp_ignore_case("ANA", "ana"), Ordering::Equal);
    }
}
