// src/parse/phone.rs
//! Labeled fax-number extraction and display formatting.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::profile::PhoneRule;

// Label followed by a number token. Labels appear as `Fax:`/`To:` in any
// casing. Spaces end the token (text is whitespace-collapsed, so a space is
// a field boundary) except for the single space allowed after an area code.
static RE_LABELED_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:fax|to)\s*:\s*(\(\d{3}\)\s?\d[\d.\-]{6,}|\+?\d[\d.\-]{6,})")
        .expect("phone regex")
});

/// Canonical display form for exactly 10 digits; identity otherwise.
pub fn format_phone(digits: &str) -> String {
    if digits.len() == 10 && digits.bytes().all(|b| b.is_ascii_digit()) {
        format!("({}) {} - {}", &digits[0..3], &digits[3..6], &digits[6..10])
    } else {
        digits.to_string()
    }
}

/// Find the first `Fax:`/`To:` labeled number in `text` and normalize it.
///
/// Strict: anything but exactly 10 digits counts as absent. Lenient: the raw
/// digit string is kept, formatted only when it is exactly 10 digits long.
pub fn extract_phone(text: &str, rule: PhoneRule) -> Option<String> {
    let caps = RE_LABELED_NUMBER.captures(text)?;
    let digits: String = caps[1].chars().filter(|c| c.is_ascii_digit()).collect();
    match rule {
        PhoneRule::Strict => {
            if digits.len() == 10 {
                Some(format_phone(&digits))
            } else {
                None
            }
        }
        PhoneRule::Lenient => {
            if digits.is_empty() {
                None
            } else {
                Some(format_phone(&digits))
            }
        }
    }
}
