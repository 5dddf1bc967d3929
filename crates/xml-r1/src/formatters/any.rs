//! Base (ANY) formatter: the null-flavor attribute and post-decode
//! validation shared by every data type.

use mercury_datatypes::{Hl7Base, NullFlavor};

use crate::diagnostics::{DetailKind, Diagnostics, ResultDetail, Severity};
use crate::error::Result;
use crate::host::{GraphContext, ParseContext};

pub struct AnyFormatter;

impl AnyFormatter {
    /// Write the base attributes of `value`.
    ///
    /// Returns `true` when a null flavor was written, in which case the
    /// concrete formatter must emit nothing further for this value.
    pub fn graph_base<T: Hl7Base>(&self, value: &T, ctx: &mut GraphContext<'_>) -> Result<bool> {
        if let Some(null_flavor) = value.null_flavor() {
            ctx.writer.attribute("nullFlavor", null_flavor.as_str())?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Populate the base fields of `value` from the current element.
    ///
    /// A malformed null-flavor token is recorded as an error-severity
    /// diagnostic and the field is left unset; it does not abort the decode.
    pub fn parse_base<T: Hl7Base>(&self, value: &mut T, ctx: &mut ParseContext<'_, '_>) {
        if let Some(token) = ctx.reader.attribute("nullFlavor") {
            match NullFlavor::from_wire(token) {
                Some(null_flavor) => value.set_null_flavor(null_flavor),
                None => ctx.diagnostics.add(ResultDetail::new(
                    Severity::Error,
                    DetailKind::General,
                    format!("'{token}' is not a valid null flavor"),
                    ctx.reader.current_path(),
                )),
            }
        }
    }

    /// Run the value's structural validation, appending the findings to the
    /// sink as non-fatal error details.
    pub fn validate<T: Hl7Base>(&self, value: &T, path: &str, diagnostics: &mut Diagnostics) {
        for finding in value.validate() {
            diagnostics.add(ResultDetail::new(
                Severity::Error,
                DetailKind::Validation,
                finding,
                path,
            ));
        }
    }
}
