//! Encapsulated data (ED) formatter.
//!
//! Encoding writes the attributes in their fixed interoperability order, then
//! the `reference` and `thumbnail` children, then the content transcoded per
//! the declared representation. Decoding runs a depth-bounded scan over the
//! element's children in which untagged embedded markup always wins over the
//! declared representation, and a failed child never aborts its siblings.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use mercury_datatypes::{
    Compression, EncapsulatedData, IntegrityCheckAlgorithm, Representation,
};

use crate::cursor::NodeKind;
use crate::diagnostics::{DetailKind, ResultDetail, Severity};
use crate::error::{FormatError, Result};
use crate::formatters::any::AnyFormatter;
use crate::host::{AnyRef, AnyValue, DatatypeFormatter, GraphContext, ParseContext};
use crate::integrity;

/// Deepest thumbnail nesting the formatter will follow, on both encode and
/// decode. The standard leaves the depth unbounded; this cap keeps the call
/// stack and adversarial input in check. Deeper subtrees are skipped and
/// recorded as recovered-child errors.
pub const MAX_THUMBNAIL_DEPTH: usize = 16;

const ED_FIELDS: &[&str] = &[
    "representation",
    "mediaType",
    "compression",
    "language",
    "integrityCheck",
    "integrityCheckAlgorithm",
    "reference",
    "thumbnail",
    "data",
    "nullFlavor",
];

pub struct EdFormatter;

impl EdFormatter {
    pub(crate) fn graph_ed(
        &self,
        ed: &EncapsulatedData,
        ctx: &mut GraphContext<'_>,
        depth: usize,
    ) -> Result<()> {
        if AnyFormatter.graph_base(ed, ctx)? {
            return Ok(());
        }

        // Attribute order is an interoperability contract.
        ctx.writer
            .attribute("representation", ed.representation.as_str())?;
        if let Some(media_type) = &ed.media_type {
            ctx.writer.attribute("mediaType", media_type)?;
        }
        if let Some(language) = &ed.language {
            ctx.writer.attribute("language", language)?;
        }
        if let Some(compression) = ed.compression {
            ctx.writer.attribute("compression", compression.as_str())?;
        }
        if let Some(integrity_check) = &ed.integrity_check {
            ctx.writer
                .attribute("integrityCheck", &BASE64.encode(integrity_check))?;
        }
        if let Some(algorithm) = ed.integrity_check_algorithm {
            ctx.writer
                .attribute("integrityCheckAlgorithm", algorithm.wire_token())?;
        }

        if ed.description.is_some() {
            ctx.diagnostics.add(ResultDetail::unsupported_property(
                "description",
                "ED",
                &ctx.writer.current_path(),
            ));
        }

        if let Some(reference) = &ed.reference {
            ctx.writer.start_element("reference")?;
            let host = ctx.host;
            host.graph_value(AnyRef::Tel(reference), ctx)?;
            ctx.writer.end_element()?;
        }

        if let Some(thumbnail) = &ed.thumbnail {
            if depth + 1 > MAX_THUMBNAIL_DEPTH {
                ctx.diagnostics.add(ResultDetail::new(
                    Severity::Error,
                    DetailKind::RecoveredChild,
                    format!(
                        "thumbnail nesting deeper than {MAX_THUMBNAIL_DEPTH} levels was not written"
                    ),
                    ctx.writer.current_path(),
                ));
            } else {
                ctx.writer.start_element("thumbnail")?;
                self.graph_ed(thumbnail, ctx, depth + 1)?;
                ctx.writer.end_element()?;
            }
        }

        if !ed.translation.is_empty() {
            ctx.diagnostics.add(ResultDetail::unsupported_property(
                "translation",
                "ED",
                &ctx.writer.current_path(),
            ));
        }

        if !ed.content.is_empty() {
            match ed.representation {
                Representation::Binary => ctx.writer.write_text(&BASE64.encode(&ed.content))?,
                Representation::Text => ctx
                    .writer
                    .write_text(&String::from_utf8_lossy(&ed.content))?,
                Representation::RawMarkup => ctx
                    .writer
                    .write_raw(&String::from_utf8_lossy(&ed.content))?,
            }
        }
        Ok(())
    }

    pub(crate) fn parse_ed(
        &self,
        ctx: &mut ParseContext<'_, '_>,
        depth: usize,
    ) -> Result<EncapsulatedData> {
        let path = ctx.reader.current_path();
        let mut ed = EncapsulatedData::default();

        AnyFormatter.parse_base(&mut ed, ctx);
        if ed.null_flavor.is_some() {
            // Nothing else is expected; children, if any, are not interpreted.
            ctx.reader.skip_to_end()?;
            return Ok(ed);
        }

        self.parse_attributes(&mut ed, ctx)?;

        let mut inner = String::new();
        if !ctx.reader.is_empty_element() {
            let exit_depth = ctx.reader.depth();
            let exit_name = ctx.reader.name().to_string();
            self.scan_children(&mut ed, &mut inner, exit_depth, &exit_name, ctx, depth)?;
        }

        if !inner.is_empty() {
            ed.content = match ed.representation {
                Representation::Binary => {
                    let compact: String = inner.split_whitespace().collect();
                    BASE64
                        .decode(compact)
                        .map_err(|e| FormatError::base64("element content", e))?
                }
                _ => inner.into_bytes(),
            };
        }

        if ed.integrity_check.is_some()
            && ed.integrity_check_algorithm.is_some()
            && !integrity::verify(&ed)
        {
            tracing::debug!(path = %path, "encapsulated data failed its integrity check");
            ctx.diagnostics.add(ResultDetail::new(
                Severity::Warning,
                DetailKind::IntegrityMismatch,
                format!(
                    "encapsulated data with content starting with '{}' failed its integrity check",
                    content_preview(&ed)
                ),
                path.clone(),
            ));
        }

        AnyFormatter.validate(&ed, &path, ctx.diagnostics);
        Ok(ed)
    }

    /// Wire order is not significant on decode; attributes are read by name.
    fn parse_attributes(
        &self,
        ed: &mut EncapsulatedData,
        ctx: &mut ParseContext<'_, '_>,
    ) -> Result<()> {
        if let Some(token) = ctx.reader.attribute("representation") {
            match Representation::from_wire(token) {
                Some(representation) => ed.representation = representation,
                None => ctx.diagnostics.add(ResultDetail::new(
                    Severity::Warning,
                    DetailKind::General,
                    format!("'{token}' is not a valid representation token"),
                    ctx.reader.current_path(),
                )),
            }
        }
        if let Some(media_type) = ctx.reader.attribute("mediaType") {
            ed.media_type = Some(media_type.to_string());
        }
        if let Some(language) = ctx.reader.attribute("language") {
            ed.language = Some(language.to_string());
        }
        if let Some(token) = ctx.reader.attribute("compression") {
            match Compression::from_wire(token) {
                Some(compression) => ed.compression = Some(compression),
                None => ctx.diagnostics.add(ResultDetail::new(
                    Severity::Warning,
                    DetailKind::General,
                    format!("'{token}' is not a valid compression token"),
                    ctx.reader.current_path(),
                )),
            }
        }
        // Unrecognized algorithm tokens are ignored, not errors.
        if let Some(token) = ctx.reader.attribute("integrityCheckAlgorithm") {
            ed.integrity_check_algorithm = IntegrityCheckAlgorithm::from_wire(token);
        }
        if let Some(token) = ctx.reader.attribute("integrityCheck") {
            ed.integrity_check = Some(
                BASE64
                    .decode(token)
                    .map_err(|e| FormatError::base64("integrityCheck attribute", e))?,
            );
        }
        Ok(())
    }

    /// Scan the element's children until the matching end tag, accumulating
    /// text into `inner` and dispatching the typed children.
    fn scan_children(
        &self,
        ed: &mut EncapsulatedData,
        inner: &mut String,
        exit_depth: usize,
        exit_name: &str,
        ctx: &mut ParseContext<'_, '_>,
        depth: usize,
    ) -> Result<()> {
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
                NodeKind::Text => {
                    inner.push_str(ctx.reader.text());
                    ctx.reader.read()?;
                }
                NodeKind::Start | NodeKind::Empty if ctx.reader.name() == "thumbnail" => {
                    if depth + 1 > MAX_THUMBNAIL_DEPTH {
                        ctx.diagnostics.add(ResultDetail::new(
                            Severity::Error,
                            DetailKind::RecoveredChild,
                            format!(
                                "thumbnail nesting deeper than {MAX_THUMBNAIL_DEPTH} levels; subtree skipped"
                            ),
                            ctx.reader.current_path(),
                        ));
                        ctx.reader.skip_to_end()?;
                    } else {
                        match self.parse_ed(ctx, depth + 1) {
                            Ok(thumbnail) => ed.thumbnail = Some(Box::new(thumbnail)),
                            Err(e) => self.recover_child("thumbnail", e, ctx)?,
                        }
                    }
                    ctx.reader.read()?;
                }
                NodeKind::Start | NodeKind::Empty if ctx.reader.name() == "reference" => {
                    let host = ctx.host;
                    match host.parse_value("TEL", ctx) {
                        Ok(AnyValue::Tel(reference)) => ed.reference = Some(reference),
                        Ok(other) => ctx.diagnostics.add(ResultDetail::new(
                            Severity::Error,
                            DetailKind::RecoveredChild,
                            format!(
                                "expected a TEL value for 'reference', got {}",
                                other.type_name()
                            ),
                            ctx.reader.current_path(),
                        )),
                        Err(e) => self.recover_child("reference", e, ctx)?,
                    }
                    ctx.reader.read()?;
                }
                NodeKind::Start | NodeKind::Empty => {
                    // Untagged embedded markup wins over the declared
                    // representation; capture it verbatim.
                    tracing::debug!(
                        element = %ctx.reader.name(),
                        "mixed content forces the XML representation"
                    );
                    ed.representation = Representation::RawMarkup;
                    let outer = ctx.reader.read_outer_xml()?;
                    inner.push_str(outer);
                    // The cursor already advanced past the element.
                }
            }
        }
    }

    /// Convert a value-level child failure into a diagnostic and reposition
    /// the cursor so the scan can continue with the next sibling. Structural
    /// failures still unwind.
    fn recover_child(
        &self,
        child: &str,
        error: FormatError,
        ctx: &mut ParseContext<'_, '_>,
    ) -> Result<()> {
        if error.is_structural() {
            return Err(error);
        }
        tracing::debug!(child, error = %error, "recovered from a child parse failure");
        ctx.diagnostics.add(ResultDetail::new(
            Severity::Error,
            DetailKind::RecoveredChild,
            error.to_string(),
            ctx.reader.current_path(),
        ));
        // A failure raised while reading the child's attributes leaves the
        // cursor on its start tag; drain the subtree before moving on.
        if ctx.reader.kind() == NodeKind::Start && ctx.reader.name() == child {
            ctx.reader.skip_to_end()?;
        }
        Ok(())
    }
}

fn content_preview(ed: &EncapsulatedData) -> String {
    let mut preview: String = ed.content_str().chars().take(10).collect();
    while preview.chars().count() < 10 {
        preview.push(' ');
    }
    preview
}

impl DatatypeFormatter for EdFormatter {
    fn handles_type(&self) -> &'static str {
        "ED"
    }

    fn supported_fields(&self) -> &'static [&'static str] {
        ED_FIELDS
    }

    fn graph(&self, value: AnyRef<'_>, ctx: &mut GraphContext<'_>) -> Result<()> {
        match value {
            AnyRef::Ed(ed) => self.graph_ed(ed, ctx, 0),
            other => Err(FormatError::Value(format!(
                "ED formatter cannot graph a {} value",
                other.type_name()
            ))),
        }
    }

    fn parse(&self, ctx: &mut ParseContext<'_, '_>) -> Result<AnyValue> {
        Ok(AnyValue::Ed(self.parse_ed(ctx, 0)?))
    }
}
