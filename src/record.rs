// src/record.rs
//! The structured extraction result and its wire shape.

use serde::{Deserialize, Serialize};

/// Document flow direction. Serialized under the wire key `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

/// A validated extraction result, eligible for upload.
///
/// Wire contract:
/// `{type, to, from, subject, sender, createdAt, attachment, file_extension}`.
/// Phone fields carry the canonical `(XXX) XXX - XXXX` display form when the
/// source number had exactly 10 digits, raw digits otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaxRecord {
    #[serde(rename = "type")]
    pub direction: Direction,
    pub to: Option<String>,
    pub from: Option<String>,
    pub subject: String,
    pub sender: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Source file bytes, base64 (standard alphabet, padded).
    pub attachment: String,
    pub file_extension: String,
}

/// Extension reported on every record; the intake only handles fax PDFs.
pub const FILE_EXTENSION: &str = "pdf";
