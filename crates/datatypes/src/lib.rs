//! In-memory value objects for the HL7v3 data types handled by the Mercury
//! formatters.
//!
//! This crate holds plain data: the encapsulated data type ([`EncapsulatedData`]),
//! the telecommunications address type ([`Telecom`]), and the coded vocabularies
//! both of them reference ([`NullFlavor`], [`Representation`], [`Compression`],
//! [`IntegrityCheckAlgorithm`], [`TelecomUse`]). Wire concerns (XML events,
//! escaping, base64, digests) live entirely in the formatter crate; the types
//! here only know their wire *tokens*, because those token mappings are part of
//! the vocabulary itself rather than of any one serialization.
//!
//! Values are constructed by the caller for encoding, or assembled field by
//! field by a formatter during decoding. No type in this crate retains shared
//! mutable state; a nested thumbnail is a fully independent value.

pub mod codes;
pub mod ed;
pub mod tel;

pub use codes::{Compression, IntegrityCheckAlgorithm, NullFlavor, Representation, TelecomUse};
pub use ed::EncapsulatedData;
pub use tel::Telecom;

/// Behavior common to every HL7v3 data type (the ANY base type).
///
/// The base formatter works exclusively through this trait: it reads and
/// writes the null flavor, and it runs the type's structural validation after
/// a decode. A set null flavor suppresses every other field on the wire.
pub trait Hl7Base {
    /// Wire type name, e.g. `"ED"`.
    fn type_name(&self) -> &'static str;

    fn null_flavor(&self) -> Option<&NullFlavor>;

    fn set_null_flavor(&mut self, null_flavor: NullFlavor);

    /// Structural rule violations for the assembled value.
    ///
    /// Findings are descriptive messages, not errors: callers decide whether
    /// to treat them as fatal.
    fn validate(&self) -> Vec<String>;
}
