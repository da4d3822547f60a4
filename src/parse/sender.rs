// src/parse/sender.rs
//! Physician name extraction.
//!
//! Primary pattern: a PHYSICIAN INFORMATION block where the name carries a
//! credential suffix (MD, DO, APN, NP, APRN, dotted forms included). On a
//! miss, a looser pattern anchored on a bare PHYSICIAN NAME label is tried.
//! First match wins; there is no further fallback.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_CREDENTIALED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)PHYSICIAN\s+INFORMATION\b.{0,120}?\b([A-Za-z][A-Za-z.'\-]*(?:\s+[A-Za-z.'\-]+){0,3},?\s*(?:M\.?D\.?|D\.?O\.?|A\.?P\.?R\.?N\.?|A\.?P\.?N\.?|N\.?P\.?))(?:[\s,;)]|$)",
    )
    .expect("credentialed physician regex")
});

static RE_BARE_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bPHYSICIAN\s+NAME\b\s*:?\s*([A-Za-z][A-Za-z.'\-]*(?:\s+[A-Za-z.'\-]+){1,3}?)\b")
        .expect("bare physician name regex")
});

/// Extract the physician name from normalized fax text.
pub fn extract_physician(text: &str) -> Option<String> {
    if let Some(caps) = RE_CREDENTIALED.captures(text) {
        return Some(caps[1].trim().to_string());
    }
    RE_BARE_NAME
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
}
