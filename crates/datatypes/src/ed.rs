//! The encapsulated data (ED) type.

use serde::{Deserialize, Serialize};

use crate::Hl7Base;
use crate::codes::{Compression, IntegrityCheckAlgorithm, NullFlavor, Representation};
use crate::tel::Telecom;

/// Encapsulated multimedia data.
///
/// `content` holds the raw bytes; how those bytes map to element content on
/// the wire is decided by [`representation`](Self::representation). A
/// `thumbnail` is itself a complete, independent `EncapsulatedData` value, and
/// a `reference` points at the full content through a [`Telecom`] address.
///
/// `description` and `translation` exist in the object model but have no R1
/// wire representation; encoding a value with either set produces a warning
/// diagnostic and writes nothing for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncapsulatedData {
    pub null_flavor: Option<NullFlavor>,
    pub representation: Representation,
    pub media_type: Option<String>,
    pub language: Option<String>,
    pub compression: Option<Compression>,
    /// Digest of `content`, produced with `integrity_check_algorithm`.
    pub integrity_check: Option<Vec<u8>>,
    pub integrity_check_algorithm: Option<IntegrityCheckAlgorithm>,
    /// Not representable on the R1 wire.
    pub description: Option<String>,
    pub reference: Option<Telecom>,
    pub thumbnail: Option<Box<EncapsulatedData>>,
    /// Not representable on the R1 wire.
    pub translation: Vec<EncapsulatedData>,
    pub content: Vec<u8>,
}

impl EncapsulatedData {
    /// A plain-text value.
    pub fn new_text(text: &str) -> Self {
        EncapsulatedData {
            representation: Representation::Text,
            content: text.as_bytes().to_vec(),
            ..Default::default()
        }
    }

    /// A binary value carried as base64 on the wire.
    pub fn new_binary(media_type: &str, content: Vec<u8>) -> Self {
        EncapsulatedData {
            representation: Representation::Binary,
            media_type: Some(media_type.to_string()),
            content,
            ..Default::default()
        }
    }

    /// A value that carries only a reason for its absence.
    pub fn null(null_flavor: NullFlavor) -> Self {
        EncapsulatedData {
            null_flavor: Some(null_flavor),
            ..Default::default()
        }
    }

    /// Lossy text view of the content, used for diagnostics previews.
    pub fn content_str(&self) -> String {
        String::from_utf8_lossy(&self.content).into_owned()
    }
}

impl Hl7Base for EncapsulatedData {
    fn type_name(&self) -> &'static str {
        "ED"
    }

    fn null_flavor(&self) -> Option<&NullFlavor> {
        self.null_flavor.as_ref()
    }

    fn set_null_flavor(&mut self, null_flavor: NullFlavor) {
        self.null_flavor = Some(null_flavor);
    }

    fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();
        let has_payload = !self.content.is_empty() || self.reference.is_some();
        match (self.null_flavor.is_some(), has_payload) {
            (true, true) => findings
                .push("ED must not carry both a null flavor and content or a reference".to_string()),
            (false, false) => {
                findings.push("ED must carry content, a reference, or a null flavor".to_string())
            }
            _ => {}
        }
        findings
    }
}
