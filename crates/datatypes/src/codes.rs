//! Coded vocabularies with their fixed wire-token mappings.
//!
//! Every enum here maps to a case-sensitive token set fixed by the data type
//! standard. `as_str` produces the token written to the wire and `from_wire`
//! recognizes it on the way back; unrecognized tokens yield `None` so each
//! formatter can apply its own policy (warn, ignore, or error).

use serde::{Deserialize, Serialize};

/// Reason code explaining why data is absent (the HL7v3 NullFlavor vocabulary).
///
/// When a value carries a null flavor, nothing else about it is represented on
/// the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullFlavor {
    /// NI - no information
    NoInformation,
    /// INV - invalid
    Invalid,
    /// DER - derived
    Derived,
    /// OTH - other
    Other,
    /// NINF - negative infinity
    NegativeInfinity,
    /// PINF - positive infinity
    PositiveInfinity,
    /// UNC - unencoded
    Unencoded,
    /// MSK - masked
    Masked,
    /// NA - not applicable
    NotApplicable,
    /// UNK - unknown
    Unknown,
    /// ASKU - asked but unknown
    AskedUnknown,
    /// NAV - temporarily unavailable
    Unavailable,
    /// NASK - not asked
    NotAsked,
    /// TRC - trace
    Trace,
    /// QS - sufficient quantity
    SufficientQuantity,
}

impl NullFlavor {
    pub fn as_str(&self) -> &'static str {
        match self {
            NullFlavor::NoInformation => "NI",
            NullFlavor::Invalid => "INV",
            NullFlavor::Derived => "DER",
            NullFlavor::Other => "OTH",
            NullFlavor::NegativeInfinity => "NINF",
            NullFlavor::PositiveInfinity => "PINF",
            NullFlavor::Unencoded => "UNC",
            NullFlavor::Masked => "MSK",
            NullFlavor::NotApplicable => "NA",
            NullFlavor::Unknown => "UNK",
            NullFlavor::AskedUnknown => "ASKU",
            NullFlavor::Unavailable => "NAV",
            NullFlavor::NotAsked => "NASK",
            NullFlavor::Trace => "TRC",
            NullFlavor::SufficientQuantity => "QS",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "NI" => NullFlavor::NoInformation,
            "INV" => NullFlavor::Invalid,
            "DER" => NullFlavor::Derived,
            "OTH" => NullFlavor::Other,
            "NINF" => NullFlavor::NegativeInfinity,
            "PINF" => NullFlavor::PositiveInfinity,
            "UNC" => NullFlavor::Unencoded,
            "MSK" => NullFlavor::Masked,
            "NA" => NullFlavor::NotApplicable,
            "UNK" => NullFlavor::Unknown,
            "ASKU" => NullFlavor::AskedUnknown,
            "NAV" => NullFlavor::Unavailable,
            "NASK" => NullFlavor::NotAsked,
            "TRC" => NullFlavor::Trace,
            "QS" => NullFlavor::SufficientQuantity,
            _ => return None,
        })
    }
}

/// Content encoding mode of encapsulated data.
///
/// The representation decides how the element content maps to the raw bytes of
/// [`crate::EncapsulatedData::content`]: base64 for binary, escaped character
/// data for text, and unescaped pass-through for embedded markup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Representation {
    /// B64 - base64-encoded binary
    Binary,
    /// TXT - plain character data
    #[default]
    Text,
    /// XML - raw embedded markup, written without escaping
    RawMarkup,
}

impl Representation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Representation::Binary => "B64",
            Representation::Text => "TXT",
            Representation::RawMarkup => "XML",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "B64" => Representation::Binary,
            "TXT" => Representation::Text,
            "XML" => Representation::RawMarkup,
            _ => return None,
        })
    }
}

/// Compression algorithm applied to encapsulated data content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Compression {
    /// DF - deflate
    Deflate,
    /// GZ - gzip
    GZip,
    /// ZL - zlib
    ZLib,
    /// Z - unix compress
    Compress,
}

impl Compression {
    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::Deflate => "DF",
            Compression::GZip => "GZ",
            Compression::ZLib => "ZL",
            Compression::Compress => "Z",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "DF" => Compression::Deflate,
            "GZ" => Compression::GZip,
            "ZL" => Compression::ZLib,
            "Z" => Compression::Compress,
            _ => return None,
        })
    }
}

/// Digest algorithm for the encapsulated data integrity check.
///
/// The R1 wire tokens are `SHA-1` and `SHA-256`, not the canonical algorithm
/// names. That deviation is mandated by the standard revision and is
/// reproduced exactly; see [`IntegrityCheckAlgorithm::wire_token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityCheckAlgorithm {
    Sha1,
    Sha256,
}

impl IntegrityCheckAlgorithm {
    /// R1 wire token, hyphenated per the standard's (incorrect) spelling.
    pub fn wire_token(&self) -> &'static str {
        match self {
            IntegrityCheckAlgorithm::Sha1 => "SHA-1",
            IntegrityCheckAlgorithm::Sha256 => "SHA-256",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "SHA-1" => IntegrityCheckAlgorithm::Sha1,
            "SHA-256" => IntegrityCheckAlgorithm::Sha256,
            _ => return None,
        })
    }
}

/// Use code qualifying a telecommunications address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelecomUse {
    /// H - home address
    Home,
    /// HP - primary home
    PrimaryHome,
    /// HV - vacation home
    VacationHome,
    /// WP - workplace
    WorkPlace,
    /// DIR - direct line
    Direct,
    /// PUB - public/switchboard
    Public,
    /// BAD - known to be bad
    BadAddress,
    /// TMP - temporary
    Temporary,
    /// AS - answering service
    AnsweringService,
    /// EC - emergency contact
    EmergencyContact,
    /// MC - mobile contact
    MobileContact,
    /// PG - pager
    Pager,
}

impl TelecomUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            TelecomUse::Home => "H",
            TelecomUse::PrimaryHome => "HP",
            TelecomUse::VacationHome => "HV",
            TelecomUse::WorkPlace => "WP",
            TelecomUse::Direct => "DIR",
            TelecomUse::Public => "PUB",
            TelecomUse::BadAddress => "BAD",
            TelecomUse::Temporary => "TMP",
            TelecomUse::AnsweringService => "AS",
            TelecomUse::EmergencyContact => "EC",
            TelecomUse::MobileContact => "MC",
            TelecomUse::Pager => "PG",
        }
    }

    pub fn from_wire(token: &str) -> Option<Self> {
        Some(match token {
            "H" => TelecomUse::Home,
            "HP" => TelecomUse::PrimaryHome,
            "HV" => TelecomUse::VacationHome,
            "WP" => TelecomUse::WorkPlace,
            "DIR" => TelecomUse::Direct,
            "PUB" => TelecomUse::Public,
            "BAD" => TelecomUse::BadAddress,
            "TMP" => TelecomUse::Temporary,
            "AS" => TelecomUse::AnsweringService,
            "EC" => TelecomUse::EmergencyContact,
            "MC" => TelecomUse::MobileContact,
            "PG" => TelecomUse::Pager,
            _ => return None,
        })
    }
}
