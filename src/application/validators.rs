use validator::ValidateEmail;

/// Validates that the input looks like a valid email address
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    !email.is_empty() && email.validate_email()
}

/// Canonical form used for both the uniqueness check and the stored value.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
