//! Telecommunications address (TEL) formatter.
//!
//! TEL is attribute-only on the R1 wire: the address in `value` and the use
//! codes space-joined in `use`. The usable-period field has no R1
//! representation and yields the same unsupported-property warning policy as
//! ED's description.

use mercury_datatypes::{Telecom, TelecomUse};

use crate::cursor::NodeKind;
use crate::diagnostics::{DetailKind, ResultDetail, Severity};
use crate::error::{FormatError, Result};
use crate::formatters::any::AnyFormatter;
use crate::host::{AnyRef, AnyValue, DatatypeFormatter, GraphContext, ParseContext};

const TEL_FIELDS: &[&str] = &["value", "use", "nullFlavor"];

pub struct TelFormatter;

impl TelFormatter {
    pub(crate) fn graph_tel(&self, tel: &Telecom, ctx: &mut GraphContext<'_>) -> Result<()> {
        if AnyFormatter.graph_base(tel, ctx)? {
            return Ok(());
        }

        if let Some(value) = &tel.value {
            ctx.writer.attribute("value", value)?;
        }
        if !tel.use_codes.is_empty() {
            let uses = tel
                .use_codes
                .iter()
                .map(|u| u.as_str())
                .collect::<Vec<_>>()
                .join(" ");
            ctx.writer.attribute("use", &uses)?;
        }
        if tel.usable_period.is_some() {
            ctx.diagnostics.add(ResultDetail::unsupported_property(
                "usablePeriod",
                "TEL",
                &ctx.writer.current_path(),
            ));
        }
        Ok(())
    }

    pub(crate) fn parse_tel(&self, ctx: &mut ParseContext<'_, '_>) -> Result<Telecom> {
        let path = ctx.reader.current_path();
        let mut tel = Telecom::default();

        AnyFormatter.parse_base(&mut tel, ctx);
        if tel.null_flavor.is_some() {
            ctx.reader.skip_to_end()?;
            return Ok(tel);
        }

        if let Some(value) = ctx.reader.attribute("value") {
            tel.value = Some(value.to_string());
        }
        if let Some(uses) = ctx.reader.attribute("use") {
            for token in uses.split_whitespace() {
                match TelecomUse::from_wire(token) {
                    Some(use_code) => tel.use_codes.push(use_code),
                    None => ctx.diagnostics.add(ResultDetail::new(
                        Severity::Warning,
                        DetailKind::General,
                        format!("'{token}' is not a valid telecom use code"),
                        ctx.reader.current_path(),
                    )),
                }
            }
        }

        self.skip_unsupported_children(ctx)?;

        AnyFormatter.validate(&tel, &path, ctx.diagnostics);
        Ok(tel)
    }

    /// TEL carries no child elements in R1. Anything nested (such as a
    /// usable-period expression) is recorded and skipped, leaving the cursor
    /// on the element's end tag.
    fn skip_unsupported_children(&self, ctx: &mut ParseContext<'_, '_>) -> Result<()> {
        if ctx.reader.is_empty_element() {
            return Ok(());
        }
        let exit_depth = ctx.reader.depth();
        let exit_name = ctx.reader.name().to_string();
        ctx.reader.read()?;
        loop {
            match ctx.reader.kind() {
                NodeKind::Eof | NodeKind::None => {
                    return Err(FormatError::Syntax(format!(
                        "unexpected end of document inside <{exit_name}>"
                    )));
                }
                NodeKind::End
                    if ctx.reader.depth() == exit_depth && ctx.reader.name() == exit_name =>
                {
                    return Ok(());
                }
                NodeKind::End => {
                    return Err(FormatError::Syntax(format!(
                        "unexpected closing tag </{}>",
                        ctx.reader.name()
                    )));
                }
                NodeKind::Start | NodeKind::Empty => {
                    ctx.diagnostics.add(ResultDetail::new(
                        Severity::Error,
                        DetailKind::RecoveredChild,
                        format!(
                            "TEL child element '{}' is not supported and was skipped",
                            ctx.reader.name()
                        ),
                        ctx.reader.current_path(),
                    ));
                    ctx.reader.skip_to_end()?;
                    ctx.reader.read()?;
                }
                NodeKind::Text => {
                    // Stray character data carries no meaning for TEL.
                    ctx.reader.read()?;
                }
            }
        }
    }
}

impl DatatypeFormatter for TelFormatter {
    fn handles_type(&self) -> &'static str {
        "TEL"
    }

    fn supported_fields(&self) -> &'static [&'static str] {
        TEL_FIELDS
    }

    fn graph(&self, value: AnyRef<'_>, ctx: &mut GraphContext<'_>) -> Result<()> {
        match value {
            AnyRef::Tel(tel) => self.graph_tel(tel, ctx),
            other => Err(FormatError::Value(format!(
                "TEL formatter cannot graph a {} value",
                other.type_name()
            ))),
        }
    }

    fn parse(&self, ctx: &mut ParseContext<'_, '_>) -> Result<AnyValue> {
        Ok(AnyValue::Tel(self.parse_tel(ctx)?))
    }
}
