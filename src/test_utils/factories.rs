//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use chrono::NaiveDateTime;

use crate::domain::entities::waitlist_entry::WaitlistEntry;

/// Create a test waitlist entry with sensible defaults.
pub fn create_test_entry(overrides: impl FnOnce(&mut WaitlistEntry)) -> WaitlistEntry {
    let mut entry = WaitlistEntry {
        id: 1,
        email: "user@example.com".to_string(),
        created_at: test_datetime(),
    };
    overrides(&mut entry);
    entry
}

fn test_datetime() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2024-01-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_test_entry_applies_overrides() {
        let entry = create_test_entry(|e| {
            e.id = 42;
            e.email = "other@example.com".to_string();
        });

        assert_eq!(entry.id, 42);
        assert_eq!(entry.email, "other@example.com");
        assert_eq!(entry.created_at, test_datetime());
    }
}
