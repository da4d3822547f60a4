// src/parse/mod.rs
//! Field parser: turns normalized fax text plus a direction profile into a
//! validated record, or `None` when required fields are missing.

pub mod phone;
pub mod sender;
pub mod timestamp;

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use tracing::warn;

use crate::profile::{DirectionProfile, PartyField};
use crate::record::{FaxRecord, FILE_EXTENSION};

/// Collapse whitespace runs to single spaces and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
    RE_WS.replace_all(s, " ").trim().to_string()
}

/// Parse one document's normalized text into a record.
///
/// Extraction is best-effort and order-sensitive: the first matching pattern
/// per field wins. Validity is decided at the end — `createdAt`, the
/// profile's dynamic party field and `sender` must all be present, otherwise
/// the candidate is discarded (and the missing fields logged).
pub fn parse_record<R: Rng + ?Sized>(
    text: &str,
    profile: &DirectionProfile,
    attachment: String,
    rng: &mut R,
) -> Option<FaxRecord> {
    let created_at = timestamp::extract_timestamp(text, &profile.timestamp, rng);
    let extracted_number = phone::extract_phone(text, profile.phone);
    let sender = match &profile.fixed_sender {
        Some(org) => Some(org.clone()),
        None => sender::extract_physician(text),
    };

    let (to, from) = match profile.dynamic_party {
        PartyField::From => (profile.fixed_to.clone(), extracted_number.clone()),
        PartyField::To => (extracted_number.clone(), profile.fixed_from.clone()),
    };

    let mut missing: Vec<&str> = Vec::new();
    if created_at.is_none() {
        missing.push("createdAt");
    }
    if extracted_number.is_none() {
        missing.push(match profile.dynamic_party {
            PartyField::From => "from",
            PartyField::To => "to",
        });
    }
    if sender.is_none() {
        missing.push("sender");
    }
    if !missing.is_empty() {
        warn!(target: "parse", missing = ?missing, "record discarded: required fields absent");
        return None;
    }
    let (Some(sender), Some(created_at)) = (sender, created_at) else {
        return None;
    };

    Some(FaxRecord {
        direction: profile.direction,
        to,
        from,
        subject: profile.subject.clone(),
        sender,
        created_at,
        attachment,
        file_extension: FILE_EXTENSION.to_string(),
    })
}
