//! The telecommunications address (TEL) type.

use serde::{Deserialize, Serialize};

use crate::Hl7Base;
use crate::codes::{NullFlavor, TelecomUse};

/// A telecommunications address: a URL plus use codes.
///
/// Within the encapsulated data formatter this type appears as the
/// `reference` child element pointing at externally stored content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telecom {
    pub null_flavor: Option<NullFlavor>,
    /// The address itself, e.g. `tel:+13335551212` or an http URL.
    pub value: Option<String>,
    pub use_codes: Vec<TelecomUse>,
    /// Period during which the address is in use. Not representable on the
    /// R1 wire; encoding a value with this set yields a warning diagnostic.
    pub usable_period: Option<String>,
}

impl Telecom {
    pub fn new(value: &str) -> Self {
        Telecom {
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    pub fn null(null_flavor: NullFlavor) -> Self {
        Telecom {
            null_flavor: Some(null_flavor),
            ..Default::default()
        }
    }
}

impl Hl7Base for Telecom {
    fn type_name(&self) -> &'static str {
        "TEL"
    }

    fn null_flavor(&self) -> Option<&NullFlavor> {
        self.null_flavor.as_ref()
    }

    fn set_null_flavor(&mut self, null_flavor: NullFlavor) {
        self.null_flavor = Some(null_flavor);
    }

    fn validate(&self) -> Vec<String> {
        let mut findings = Vec::new();
        match (self.null_flavor.is_some(), self.value.is_some()) {
            (true, true) => {
                findings.push("TEL must not carry both a null flavor and a value".to_string())
            }
            (false, false) => {
                findings.push("TEL must carry a value or a null flavor".to_string())
            }
            _ => {}
        }
        findings
    }
}
