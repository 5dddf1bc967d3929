//! Depth-aware streaming XML cursor.
//!
//! Formatters never touch quick-xml directly; they work against the two
//! cursors here. [`XmlStateReader`] is a forward-only pull reader that tracks
//! the open-element stack so callers can ask for the current depth and a
//! printable path for diagnostics. [`XmlStateWriter`] buffers the open start
//! tag so attributes can still be appended after the element is opened, the
//! way formatters naturally emit them.
//!
//! Depth follows the convention of event-pull readers: an element's end tag
//! reports the same depth as its start tag, and its children report one more.
//! A cursor is owned by exactly one top-level formatting call; recursive
//! formatter calls advance the same cursor sequentially.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::HL7_NAMESPACE;
use crate::error::{FormatError, Result};

/// Kind of the node the reader is currently positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Before the first `read()`.
    None,
    /// A start tag `<name ...>`.
    Start,
    /// A self-closing tag `<name ... />`.
    Empty,
    /// An end tag `</name>`.
    End,
    /// Character data or CDATA.
    Text,
    /// End of document.
    Eof,
}

/// Forward-only pull reader over an XML string.
///
/// Declarations, comments, processing instructions and doctype nodes are
/// consumed internally; callers only ever observe elements, text and the end
/// of the document. Character data is reported verbatim apart from
/// whitespace-only nodes, which are skipped.
pub struct XmlStateReader<'x> {
    input: &'x str,
    reader: Reader<&'x [u8]>,
    kind: NodeKind,
    name: String,
    text: String,
    attrs: Vec<(String, String)>,
    depth: usize,
    /// Names of the currently open elements, including the current start tag.
    open: Vec<String>,
    /// The current node leaves the open stack when the cursor moves on.
    pending_pop: bool,
    /// An event pulled while coalescing a text run, handed back on the next
    /// `read()`.
    stashed: Option<(Event<'x>, (usize, usize))>,
    /// Byte range of the current node in `input`.
    span: (usize, usize),
}

impl<'x> XmlStateReader<'x> {
    pub fn new(input: &'x str) -> Self {
        XmlStateReader {
            input,
            reader: Reader::from_str(input),
            kind: NodeKind::None,
            name: String::new(),
            text: String::new(),
            attrs: Vec::new(),
            depth: 0,
            open: Vec::new(),
            pending_pop: false,
            stashed: None,
            span: (0, 0),
        }
    }

    /// Advance to the next meaningful node. Returns `false` at end of input.
    ///
    /// A run of adjacent text, CDATA and entity-reference events is coalesced
    /// into one `Text` node with the references resolved, so callers see the
    /// character data exactly as authored. Whitespace-only runs, which carry
    /// no content between element tags, are skipped.
    pub fn read(&mut self) -> Result<bool> {
        loop {
            if self.pending_pop {
                self.open.pop();
                self.pending_pop = false;
            }
            let (event, span) = self.next_event()?;
            match event {
                Event::Start(e) => {
                    self.span = span;
                    self.enter_element(&e, false)?;
                    return Ok(true);
                }
                Event::Empty(e) => {
                    self.span = span;
                    self.enter_element(&e, true)?;
                    return Ok(true);
                }
                Event::End(e) => {
                    self.span = span;
                    self.name =
                        String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
                    self.attrs.clear();
                    self.text.clear();
                    self.kind = NodeKind::End;
                    self.depth = self.open.len().saturating_sub(1);
                    self.pending_pop = true;
                    return Ok(true);
                }
                fragment @ (Event::Text(_) | Event::CData(_) | Event::GeneralRef(_)) => {
                    let mut text = String::new();
                    append_fragment(&mut text, fragment)?;
                    let mut end = span.1;
                    loop {
                        let (next, next_span) = self.next_event()?;
                        match next {
                            more @ (Event::Text(_)
                            | Event::CData(_)
                            | Event::GeneralRef(_)) => {
                                append_fragment(&mut text, more)?;
                                end = next_span.1;
                            }
                            other => {
                                self.stashed = Some((other, next_span));
                                break;
                            }
                        }
                    }
                    if text.chars().all(char::is_whitespace) {
                        continue;
                    }
                    self.span = (span.0, end);
                    self.name.clear();
                    self.attrs.clear();
                    self.text = text;
                    self.kind = NodeKind::Text;
                    self.depth = self.open.len();
                    return Ok(true);
                }
                Event::Eof => {
                    self.span = span;
                    self.name.clear();
                    self.text.clear();
                    self.attrs.clear();
                    self.kind = NodeKind::Eof;
                    return Ok(false);
                }
                // Declarations, comments, PIs, doctype.
                _ => continue,
            }
        }
    }

    fn next_event(&mut self) -> Result<(Event<'x>, (usize, usize))> {
        if let Some(stashed) = self.stashed.take() {
            return Ok(stashed);
        }
        let start = self.reader.buffer_position() as usize;
        match self.reader.read_event() {
            Ok(event) => {
                let end = self.reader.buffer_position() as usize;
                Ok((event, (start, end)))
            }
            Err(e) => Err(FormatError::Syntax(format!(
                "malformed XML near byte {}: {}",
                self.reader.buffer_position(),
                e
            ))),
        }
    }

    fn enter_element(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        self.name = String::from_utf8_lossy(e.name().local_name().as_ref()).into_owned();
        self.text.clear();
        self.attrs.clear();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| {
                FormatError::Syntax(format!("malformed attribute in <{}>: {err}", self.name))
            })?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| {
                    FormatError::Syntax(format!(
                        "bad value for attribute '{key}' in <{}>: {err}",
                        self.name
                    ))
                })?
                .into_owned();
            self.attrs.push((key, value));
        }
        self.open.push(self.name.clone());
        self.depth = self.open.len() - 1;
        self.kind = if empty { NodeKind::Empty } else { NodeKind::Start };
        self.pending_pop = empty;
        Ok(())
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Local name of the current element node.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn is_empty_element(&self) -> bool {
        self.kind == NodeKind::Empty
    }

    /// Unescaped character data of the current text node.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value on the current element, namespace declarations excluded.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Slash-joined open-element path, for diagnostics.
    pub fn current_path(&self) -> String {
        format!("/{}", self.open.join("/"))
    }

    /// Verbatim outer markup of the current element, byte-exact from the
    /// input. The cursor is advanced past the element to the following node.
    pub fn read_outer_xml(&mut self) -> Result<&'x str> {
        match self.kind {
            NodeKind::Empty => {
                let slice = self.input[self.span.0..self.span.1].trim_start();
                self.read()?;
                Ok(slice)
            }
            NodeKind::Start => {
                let start = self.span.0;
                let target = self.depth;
                loop {
                    if !self.read()? {
                        return Err(FormatError::Syntax(
                            "unexpected end of document inside element".to_string(),
                        ));
                    }
                    if self.kind == NodeKind::End && self.depth == target {
                        break;
                    }
                }
                let slice = self.input[start..self.span.1].trim_start();
                self.read()?;
                Ok(slice)
            }
            _ => Err(FormatError::Value(
                "outer markup requested on a non-element node".to_string(),
            )),
        }
    }

    /// From a start tag, consume everything up to and including the matching
    /// end tag, leaving the cursor on that end tag. No-op on other nodes.
    pub fn skip_to_end(&mut self) -> Result<()> {
        if self.kind != NodeKind::Start {
            return Ok(());
        }
        let target = self.depth;
        loop {
            if !self.read()? {
                return Err(FormatError::Syntax(
                    "unexpected end of document inside element".to_string(),
                ));
            }
            if self.kind == NodeKind::End && self.depth == target {
                return Ok(());
            }
        }
    }
}

/// Resolve one text-run fragment into `text`.
///
/// quick-xml reports entity references in character data as separate
/// `GeneralRef` events; character references and the five predefined XML
/// entities are resolved here. Anything else is unresolvable without a DTD.
fn append_fragment(text: &mut String, event: Event<'_>) -> Result<()> {
    match event {
        Event::Text(t) => {
            let decoded = t
                .decode()
                .map_err(|e| FormatError::Syntax(format!("bad character data: {e}")))?;
            let unescaped = unescape(&decoded)
                .map_err(|e| FormatError::Syntax(format!("bad character data: {e}")))?;
            text.push_str(&unescaped);
        }
        Event::CData(t) => {
            text.push_str(&String::from_utf8_lossy(&t.into_inner()));
        }
        Event::GeneralRef(r) => {
            if let Some(ch) = r
                .resolve_char_ref()
                .map_err(|e| FormatError::Syntax(format!("bad character reference: {e}")))?
            {
                text.push(ch);
                return Ok(());
            }
            let name = r
                .decode()
                .map_err(|e| FormatError::Syntax(format!("bad entity reference: {e}")))?;
            match name.as_ref() {
                "amp" => text.push('&'),
                "lt" => text.push('<'),
                "gt" => text.push('>'),
                "apos" => text.push('\''),
                "quot" => text.push('"'),
                other => {
                    return Err(FormatError::Syntax(format!(
                        "unresolvable entity reference '&{other};'"
                    )));
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// Streaming XML writer with an attribute-accepting open tag.
///
/// The start tag is held back until the first child, text or end arrives, so
/// `attribute` calls between `start_element` and the element's content attach
/// to it. An element closed while its start tag is still pending is written
/// self-closing.
pub struct XmlStateWriter {
    writer: Writer<Vec<u8>>,
    pending: Option<BytesStart<'static>>,
    path: Vec<String>,
    root_written: bool,
}

impl Default for XmlStateWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlStateWriter {
    pub fn new() -> Self {
        XmlStateWriter {
            writer: Writer::new(Vec::new()),
            pending: None,
            path: Vec::new(),
            root_written: false,
        }
    }

    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.flush_pending()?;
        let mut element = BytesStart::new(name.to_string());
        if !self.root_written {
            element.push_attribute(("xmlns", HL7_NAMESPACE));
            self.root_written = true;
        }
        self.pending = Some(element);
        self.path.push(name.to_string());
        Ok(())
    }

    /// Append an attribute to the currently open start tag.
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        match self.pending.as_mut() {
            Some(element) => {
                element.push_attribute((name, value));
                Ok(())
            }
            None => Err(FormatError::Value(format!(
                "attribute '{name}' written outside an open start tag"
            ))),
        }
    }

    /// Escaped character data.
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.flush_pending()?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        Ok(())
    }

    /// Raw markup written without escaping. The caller asserts the string is
    /// already well-formed XML.
    pub fn write_raw(&mut self, markup: &str) -> Result<()> {
        self.flush_pending()?;
        self.writer
            .write_event(Event::Text(BytesText::from_escaped(markup)))?;
        Ok(())
    }

    pub fn end_element(&mut self) -> Result<()> {
        let name = self.path.pop().ok_or_else(|| {
            FormatError::Value("end_element called with no element open".to_string())
        })?;
        match self.pending.take() {
            Some(element) => self.writer.write_event(Event::Empty(element))?,
            None => self.writer.write_event(Event::End(BytesEnd::new(name)))?,
        }
        Ok(())
    }

    /// Slash-joined open-element path, for diagnostics.
    pub fn current_path(&self) -> String {
        format!("/{}", self.path.join("/"))
    }

    pub fn into_string(mut self) -> Result<String> {
        self.flush_pending()?;
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| FormatError::Value(format!("produced XML is not UTF-8: {e}")))
    }

    fn flush_pending(&mut self) -> Result<()> {
        if let Some(element) = self.pending.take() {
            self.writer.write_event(Event::Start(element))?;
        }
        Ok(())
    }
}
