//! Minimal element/attribute markup: the writer and pull parser behind the
//! persistence format.
//!
//! Only the shape the format needs is supported: one root element with
//! attributes, a flat run of self-closing children, and a closing root tag.
//! No text content, no nesting, no comments. Attribute values are quoted
//! with `"` and entity-escaped; raw TAB/LF/CR inside values are preserved
//! as-is (the parser performs no attribute-value normalization).

use std::io::Write;

use crate::error::{StoreError, StoreResult};

/// One parsed element: its name plus attributes in document order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    /// First attribute under the given key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Writes elements of the markup subset to a sink.
pub(crate) struct ElementWriter<W: Write> {
    sink: W,
}

impl<W: Write> ElementWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    /// Emit an opening tag: `<name a="v" ...>`.
    pub fn open(&mut self, name: &str, attrs: &[(String, String)]) -> std::io::Result<()> {
        self.tag(name, attrs, false)
    }

    /// Emit a self-closing element: `<name a="v" .../>`.
    pub fn empty(&mut self, name: &str, attrs: &[(String, String)]) -> std::io::Result<()> {
        self.tag(name, attrs, true)
    }

    /// Emit a closing tag: `</name>`.
    pub fn close(&mut self, name: &str) -> std::io::Result<()> {
        writeln!(self.sink, "</{name}>")?;
        self.sink.flush()
    }

    fn tag(&mut self, name: &str, attrs: &[(String, String)], empty: bool) -> std::io::Result<()> {
        write!(self.sink, "<{name}")?;
        for (key, value) in attrs {
            write!(self.sink, " {key}=\"{}\"", escape_attr(value))?;
        }
        if empty {
            writeln!(self.sink, "/>")
        } else {
            writeln!(self.sink, ">")
        }
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            other => out.push(other),
        }
    }
    out
}

/// Parse a document of the shape `<Root ...> <Child .../>* </Root>` (or a
/// single self-closed root). Returns the root element and its children.
pub(crate) fn parse_document(input: &str) -> StoreResult<(Element, Vec<Element>)> {
    let mut parser = Parser::new(input);
    parser.skip_ws();
    let (root, self_closed) = parser.element_open()?;
    let mut children = Vec::new();
    if !self_closed {
        loop {
            parser.skip_ws();
            if parser.eat("</") {
                let name = parser.name()?;
                parser.skip_ws();
                parser.expect('>')?;
                if name != root.name {
                    return Err(StoreError::malformed(format!(
                        "closing tag '{name}' does not match root '{}'",
                        root.name
                    )));
                }
                break;
            }
            let (child, child_closed) = parser.element_open()?;
            if !child_closed {
                return Err(StoreError::malformed(format!(
                    "element '{}' must be self-closing",
                    child.name
                )));
            }
            children.push(child);
        }
    }
    parser.skip_ws();
    if !parser.at_end() {
        return Err(StoreError::malformed("trailing content after root element"));
    }
    Ok((root, children))
}

struct Parser<'a> {
    rest: &'a str,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { rest: input }
    }

    fn at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn eat(&mut self, prefix: &str) -> bool {
        if let Some(rest) = self.rest.strip_prefix(prefix) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char) -> StoreResult<()> {
        if self.eat_char(c) {
            Ok(())
        } else {
            Err(StoreError::malformed(format!(
                "expected '{c}' at '{}'",
                self.context()
            )))
        }
    }

    fn eat_char(&mut self, c: char) -> bool {
        if let Some(rest) = self.rest.strip_prefix(c) {
            self.rest = rest;
            true
        } else {
            false
        }
    }

    /// An element or attribute name: alphanumerics plus `:`, `_`, `-`.
    fn name(&mut self) -> StoreResult<String> {
        let end = self
            .rest
            .find(|c: char| !(c.is_alphanumeric() || c == ':' || c == '_' || c == '-'))
            .unwrap_or(self.rest.len());
        if end == 0 {
            return Err(StoreError::malformed(format!(
                "expected a name at '{}'",
                self.context()
            )));
        }
        let (name, rest) = self.rest.split_at(end);
        self.rest = rest;
        Ok(name.to_string())
    }

    /// Parse `<Name key="value" ...>` or `<Name .../>`. Returns the element
    /// and whether it was self-closed.
    fn element_open(&mut self) -> StoreResult<(Element, bool)> {
        self.expect('<')?;
        let name = self.name()?;
        let mut attrs = Vec::new();
        loop {
            self.skip_ws();
            if self.eat("/>") {
                return Ok((Element { name, attrs }, true));
            }
            if self.eat_char('>') {
                return Ok((Element { name, attrs }, false));
            }
            let key = self.name()?;
            self.skip_ws();
            self.expect('=')?;
            self.skip_ws();
            self.expect('"')?;
            let raw_end = self.rest.find('"').ok_or_else(|| {
                StoreError::malformed(format!("unterminated attribute value for '{key}'"))
            })?;
            let (raw, rest) = self.rest.split_at(raw_end);
            self.rest = &rest[1..]; // past the closing quote
            attrs.push((key, unescape_attr(raw)?));
        }
    }

    fn context(&self) -> &str {
        let end = self
            .rest
            .char_indices()
            .nth(24)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        &self.rest[..end]
    }
}

fn unescape_attr(raw: &str) -> StoreResult<String> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + 1..];
        let end = rest
            .find(';')
            .ok_or_else(|| StoreError::malformed("unterminated entity reference"))?;
        let entity = &rest[..end];
        rest = &rest[end + 1..];
        match entity {
            "amp" => out.push('&'),
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                let code = entity
                    .strip_prefix("#x")
                    .map(|hex| u32::from_str_radix(hex, 16))
                    .or_else(|| entity.strip_prefix('#').map(|dec| dec.parse::<u32>()))
                    .ok_or_else(|| {
                        StoreError::malformed(format!("unknown entity '&{entity};'"))
                    })?
                    .map_err(|_| {
                        StoreError::malformed(format!("bad character reference '&{entity};'"))
                    })?;
                let c = char::from_u32(code).ok_or_else(|| {
                    StoreError::malformed(format!("invalid codepoint in '&{entity};'"))
                })?;
                out.push(c);
            }
        }
    }
    out.push_str(rest);
    Ok(out)
}
