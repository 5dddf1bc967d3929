//! HL7v3 Datatypes R1 XML ITS formatter.
//!
//! This crate maps the value objects of `mercury-datatypes` to and from their
//! standardized XML wire representation. Each data type has a formatter
//! responsible for a faithful, bidirectional mapping, including the encoding
//! quirks mandated by the R1 revision (hyphenated digest-algorithm tokens,
//! unsupported-property warnings, representation-driven content transcoding).
//!
//! ## Architecture
//!
//! - [`cursor`]: a depth-aware streaming cursor pair over quick-xml, the
//!   only place XML events are touched.
//! - [`diagnostics`]: the severity-tagged result sink. Content-level
//!   problems never abort a call; they accumulate here and the caller
//!   inspects them afterwards.
//! - [`host`]: the [`XmlIts1Formatter`] registry resolving wire type names
//!   to formatters, plus the explicit contexts threaded through recursive
//!   calls.
//! - [`formatters`]: the per-type formatters, namely the ANY base (null
//!   flavor and validation), ED (the recursive encapsulated-data state
//!   machine) and TEL (the telecom collaborator ED delegates to for
//!   `reference`).
//! - [`integrity`]: SHA-1/SHA-256 digest computation for the encapsulated
//!   data integrity check.
//!
//! ## Example
//!
//! ```
//! use mercury_datatypes::EncapsulatedData;
//! use mercury_xml_r1::{AnyRef, XmlIts1Formatter};
//!
//! let host = XmlIts1Formatter::new();
//! let ed = EncapsulatedData::new_text("Hello");
//! let (xml, diagnostics) = host
//!     .graph_to_string("text", AnyRef::Ed(&ed))
//!     .expect("encoding failed");
//! assert!(xml.contains(r#"representation="TXT""#));
//! assert!(diagnostics.is_empty());
//! ```
//!
//! Only structural failures (unparsable XML, broken IO) return an `Err`;
//! everything else, from unsupported properties and integrity mismatches to
//! recovered child failures and validation findings, is reported through
//! [`Diagnostics`] alongside the possibly partially populated value.

pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod formatters;
pub mod host;
pub mod integrity;

/// Governing XML namespace of the data type standard, declared on the
/// document element.
pub const HL7_NAMESPACE: &str = "urn:hl7-org:v3";

pub use cursor::{NodeKind, XmlStateReader, XmlStateWriter};
pub use diagnostics::{DetailKind, Diagnostics, ResultDetail, Severity};
pub use error::{FormatError, Result};
pub use formatters::{AnyFormatter, EdFormatter, TelFormatter};
pub use host::{AnyRef, AnyValue, DatatypeFormatter, GraphContext, ParseContext, XmlIts1Formatter};
