//! The dispatch host: a static registry mapping wire type names to their
//! formatters, plus the context values threaded through every recursive call.
//!
//! Formatters are stateless; everything a call needs (the cursor, the
//! diagnostics sink and a handle back to the host for nested typed children)
//! travels in an explicit [`GraphContext`] or [`ParseContext`]. The registry
//! is built once and read-only afterwards, so independent top-level calls may
//! run on separate threads with their own cursors and sinks.

use mercury_datatypes::{EncapsulatedData, Telecom};

use crate::cursor::{NodeKind, XmlStateReader, XmlStateWriter};
use crate::diagnostics::Diagnostics;
use crate::error::{FormatError, Result};
use crate::formatters::ed::EdFormatter;
use crate::formatters::tel::TelFormatter;

/// An owned value of any formatted data type, as produced by a parse.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
    Ed(EncapsulatedData),
    Tel(Telecom),
}

impl AnyValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyValue::Ed(_) => "ED",
            AnyValue::Tel(_) => "TEL",
        }
    }

    pub fn into_ed(self) -> Option<EncapsulatedData> {
        match self {
            AnyValue::Ed(ed) => Some(ed),
            _ => None,
        }
    }

    pub fn into_tel(self) -> Option<Telecom> {
        match self {
            AnyValue::Tel(tel) => Some(tel),
            _ => None,
        }
    }
}

/// A borrowed value of any formatted data type, as consumed by a graph.
#[derive(Debug, Clone, Copy)]
pub enum AnyRef<'v> {
    Ed(&'v EncapsulatedData),
    Tel(&'v Telecom),
}

impl AnyRef<'_> {
    pub fn type_name(&self) -> &'static str {
        match self {
            AnyRef::Ed(_) => "ED",
            AnyRef::Tel(_) => "TEL",
        }
    }
}

/// Shared state for one encode call.
pub struct GraphContext<'a> {
    pub host: &'a XmlIts1Formatter,
    pub writer: &'a mut XmlStateWriter,
    pub diagnostics: &'a mut Diagnostics,
}

/// Shared state for one decode call.
pub struct ParseContext<'a, 'x> {
    pub host: &'a XmlIts1Formatter,
    pub reader: &'a mut XmlStateReader<'x>,
    pub diagnostics: &'a mut Diagnostics,
}

/// One data type's bidirectional wire mapping.
///
/// Implementations are stateless and safely shareable; per-call state lives
/// in the context. `graph` writes into the element the caller has opened;
/// `parse` expects the cursor positioned on the element and leaves it on that
/// element's end tag (or on the element itself when self-closing).
pub trait DatatypeFormatter: Send + Sync {
    /// Wire type name this formatter handles, e.g. `"ED"`.
    fn handles_type(&self) -> &'static str;

    /// Statically declared, ordered list of the wire fields this formatter
    /// supports.
    fn supported_fields(&self) -> &'static [&'static str];

    fn graph(&self, value: AnyRef<'_>, ctx: &mut GraphContext<'_>) -> Result<()>;

    fn parse(&self, ctx: &mut ParseContext<'_, '_>) -> Result<AnyValue>;
}

/// The R1 XML formatter host.
///
/// Resolves formatters by wire type name and owns the top-level entry points.
/// The default host registers the ED and TEL formatters.
pub struct XmlIts1Formatter {
    formatters: Vec<Box<dyn DatatypeFormatter>>,
}

impl Default for XmlIts1Formatter {
    fn default() -> Self {
        XmlIts1Formatter {
            formatters: vec![Box::new(EdFormatter), Box::new(TelFormatter)],
        }
    }
}

impl XmlIts1Formatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn formatter_for(&self, type_name: &str) -> Option<&dyn DatatypeFormatter> {
        self.formatters
            .iter()
            .find(|f| f.handles_type() == type_name)
            .map(|f| f.as_ref())
    }

    /// Graph `value` into the element currently open on the context's writer.
    pub fn graph_value(&self, value: AnyRef<'_>, ctx: &mut GraphContext<'_>) -> Result<()> {
        let formatter = self.formatter_for(value.type_name()).ok_or_else(|| {
            FormatError::Value(format!(
                "no formatter registered for type '{}'",
                value.type_name()
            ))
        })?;
        formatter.graph(value, ctx)
    }

    /// Parse a value of `type_name` from the element the context's reader is
    /// positioned on.
    pub fn parse_value(
        &self,
        type_name: &str,
        ctx: &mut ParseContext<'_, '_>,
    ) -> Result<AnyValue> {
        let formatter = self.formatter_for(type_name).ok_or_else(|| {
            FormatError::Value(format!("no formatter registered for type '{type_name}'"))
        })?;
        formatter.parse(ctx)
    }

    /// Encode `value` as a single element named `element_name`.
    ///
    /// Returns the XML string together with the diagnostics accumulated
    /// during the call.
    pub fn graph_to_string(
        &self,
        element_name: &str,
        value: AnyRef<'_>,
    ) -> Result<(String, Diagnostics)> {
        let mut writer = XmlStateWriter::new();
        let mut diagnostics = Diagnostics::default();
        writer.start_element(element_name)?;
        {
            let mut ctx = GraphContext {
                host: self,
                writer: &mut writer,
                diagnostics: &mut diagnostics,
            };
            self.graph_value(value, &mut ctx)?;
        }
        writer.end_element()?;
        Ok((writer.into_string()?, diagnostics))
    }

    /// Decode a value of `type_name` from the document element of `xml`.
    pub fn parse_str(&self, type_name: &str, xml: &str) -> Result<(AnyValue, Diagnostics)> {
        let mut reader = XmlStateReader::new(xml);
        loop {
            if !reader.read()? {
                return Err(FormatError::Syntax(
                    "document contains no root element".to_string(),
                ));
            }
            if matches!(reader.kind(), NodeKind::Start | NodeKind::Empty) {
                break;
            }
        }
        let mut diagnostics = Diagnostics::default();
        let value = {
            let mut ctx = ParseContext {
                host: self,
                reader: &mut reader,
                diagnostics: &mut diagnostics,
            };
            self.parse_value(type_name, &mut ctx)?
        };
        Ok((value, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry() {
        let host = XmlIts1Formatter::new();
        assert!(host.formatter_for("ED").is_some());
        assert!(host.formatter_for("TEL").is_some());
        assert!(host.formatter_for("PQ").is_none());
    }

    #[test]
    fn test_supported_fields_are_static_and_ordered() {
        let host = XmlIts1Formatter::new();
        let fields = host.formatter_for("ED").unwrap().supported_fields();
        assert_eq!(fields.first(), Some(&"representation"));
        assert!(fields.contains(&"nullFlavor"));
    }

    #[test]
    fn test_unregistered_type_is_an_error() {
        let host = XmlIts1Formatter::new();
        let err = host.parse_str("PQ", "<value/>").unwrap_err();
        assert!(!err.is_structural());
    }
}
