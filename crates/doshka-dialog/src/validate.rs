// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation for listing fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::reject::Rejection;

/// Maximum description length, counted in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Accepted contact forms: local phone (`0` + 9 digits), international
/// phone (`+380` + 9 digits), or handle (`@` + 5..=32 word characters).
static CONTACT_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:0[0-9]{9}|\+380[0-9]{9}|@[A-Za-z0-9_]{5,32})$")
        .expect("contact regex is well-formed")
});

/// Validates and normalizes a listing description.
pub fn description(text: &str) -> Result<String, Rejection> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if chars == 0 {
        return Err(Rejection::Validation(
            "The description cannot be empty. Please describe your listing.".into(),
        ));
    }
    if chars > MAX_DESCRIPTION_CHARS {
        return Err(Rejection::Validation(format!(
            "The description is too long: {chars} characters of at most {MAX_DESCRIPTION_CHARS}."
        )));
    }
    Ok(trimmed.to_string())
}

/// Validates a contact entry. An empty entry is the explicit skip.
pub fn contact(text: &str) -> Result<Option<String>, Rejection> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if CONTACT_FORMAT.is_match(trimmed) {
        Ok(Some(trimmed.to_string()))
    } else {
        Err(Rejection::Validation(
            "That contact does not look right. Send a phone number like 0XXXXXXXXX or \
             +380XXXXXXXXX, an @handle, or skip this step."
                .into(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn description_bounds() {
        assert!(description("").is_err());
        assert!(description("   ").is_err());
        assert_eq!(description("Need a driver").unwrap(), "Need a driver");
        assert_eq!(description("x").unwrap(), "x");

        let exactly_max = "a".repeat(MAX_DESCRIPTION_CHARS);
        assert!(description(&exactly_max).is_ok());
        let too_long = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert!(description(&too_long).is_err());
    }

    #[test]
    fn description_counts_characters_not_bytes() {
        // 500 multibyte characters are within the limit.
        let cyrillic = "ї".repeat(MAX_DESCRIPTION_CHARS);
        assert!(cyrillic.len() > MAX_DESCRIPTION_CHARS);
        assert!(description(&cyrillic).is_ok());
    }

    #[test]
    fn description_is_trimmed() {
        assert_eq!(description("  hello \n").unwrap(), "hello");
    }

    #[test]
    fn contact_accepts_local_phone() {
        assert_eq!(contact("0671234567").unwrap().as_deref(), Some("0671234567"));
        assert!(contact("067123456").is_err()); // 9 digits total
        assert!(contact("06712345678").is_err()); // 11 digits total
    }

    #[test]
    fn contact_accepts_international_phone() {
        assert_eq!(
            contact("+380671234567").unwrap().as_deref(),
            Some("+380671234567")
        );
        assert!(contact("+38067123456").is_err());
        assert!(contact("+490671234567").is_err());
    }

    #[test]
    fn contact_accepts_handles() {
        assert_eq!(contact("@some_user").unwrap().as_deref(), Some("@some_user"));
        assert!(contact("@abcd").is_err()); // below 5 chars
        assert!(contact("@abcde").is_ok());
        assert!(contact(&format!("@{}", "a".repeat(32))).is_ok());
        assert!(contact(&format!("@{}", "a".repeat(33))).is_err());
        assert!(contact("@with space").is_err());
        assert!(contact("@dash-ed").is_err());
    }

    #[test]
    fn empty_contact_is_explicit_skip() {
        assert_eq!(contact("").unwrap(), None);
        assert_eq!(contact("   ").unwrap(), None);
    }

    #[test]
    fn garbage_contact_is_rejected() {
        for bad in ["call me", "123", "someone@example.com", "0 67 123 45 67"] {
            assert!(contact(bad).is_err(), "accepted {bad:?}");
        }
    }
}
