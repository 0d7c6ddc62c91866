// SPDX-FileCopyrightText: Copyright (c) 2025 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Namespace-resolving pull cursor over XML and a thin event writer.
//!
//! The Atom and GML readers are recursive descent over [`XmlCursor`]: each
//! element kind has one function that is called right after its start tag
//! was consumed and returns after its end tag. Comments, processing
//! instructions and text outside the document element never reach the
//! readers.

/// Event writer.
pub mod writer;

#[doc(inline)]
pub use writer::XmlWriter;

use crate::error::ParseError;
use crate::version::XML_NS;
use crate::Error;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// Attribute with resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Namespace URI, `None` for unprefixed attributes.
    pub ns: Option<String>,
    /// Local name.
    pub local: String,
    /// Unescaped value.
    pub value: String,
}

/// Start tag with resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Namespace URI.
    pub ns: Option<String>,
    /// Local name.
    pub local: String,
    /// Attributes except namespace declarations.
    pub attrs: Vec<Attr>,
}

impl StartTag {
    /// Whether the element has the namespace and local name.
    #[must_use]
    pub fn is(&self, ns: &str, local: &str) -> bool {
        self.local == local && self.ns.as_deref() == Some(ns)
    }

    /// Whether the element is in the namespace.
    #[must_use]
    pub fn in_ns(&self, ns: &str) -> bool {
        self.ns.as_deref() == Some(ns)
    }

    /// Attribute value by namespace and local name.
    #[must_use]
    pub fn attr(&self, ns: Option<&str>, local: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.local == local && a.ns.as_deref() == ns)
            .map(|a| a.value.as_str())
    }
}

/// Content node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Start of a child element.
    Start(StartTag),
    /// Character data (may be split in several nodes).
    Text(String),
    /// End of the current element.
    End,
}

/// Pull cursor over an in-memory document.
pub struct XmlCursor<'i> {
    reader: NsReader<&'i [u8]>,
    depth: usize,
}

impl<'i> XmlCursor<'i> {
    /// Create cursor over the document bytes.
    #[must_use]
    pub fn new(input: &'i [u8]) -> Self {
        let mut reader = NsReader::from_reader(input);
        reader.config_mut().expand_empty_elements = true;
        Self { reader, depth: 0 }
    }

    /// Current element nesting.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    fn position(&self) -> u64 {
        u64::try_from(self.reader.buffer_position()).unwrap_or_default()
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse(ParseError::at(message, self.position()))
    }

    /// Move to the document element.
    ///
    /// # Errors
    ///
    /// Returns error if the document is malformed or has no element.
    pub fn root(&mut self) -> Result<StartTag, Error> {
        match self.next()? {
            Node::Start(tag) => Ok(tag),
            Node::Text(_) => Err(self.error("character data before document element")),
            Node::End => Err(self.error("unexpected end tag")),
        }
    }

    /// Next content node of the current element.
    ///
    /// # Errors
    ///
    /// Returns error on malformed XML, including a document that ends
    /// before every element was closed.
    pub fn next(&mut self) -> Result<Node, Error> {
        loop {
            let pos = self.position();
            let at = |message: String| Error::Parse(ParseError::at(message, pos));
            let (resolved, event) = self
                .reader
                .read_resolved_event()
                .map_err(|e| at(e.to_string()))?;
            let ns = namespace(&resolved).map_err(at)?;
            match event {
                Event::Start(start) => {
                    let tag = self.start_tag(ns, &start).map_err(at)?;
                    self.depth += 1;
                    return Ok(Node::Start(tag));
                }
                Event::End(_) => {
                    self.depth = self.depth.saturating_sub(1);
                    return Ok(Node::End);
                }
                Event::Text(text) => {
                    let text = utf8(&text).map_err(at)?;
                    if self.depth > 0 && !text.is_empty() {
                        return Ok(Node::Text(text));
                    }
                }
                Event::CData(data) => return Ok(Node::Text(utf8(&data).map_err(at)?)),
                Event::GeneralRef(reference) => {
                    let name = utf8(&reference).map_err(at)?;
                    let resolved =
                        resolve_reference(&name).ok_or_else(|| at(format!("unknown entity &{name};")))?;
                    return Ok(Node::Text(resolved));
                }
                Event::Eof => {
                    return Err(at(if self.depth == 0 {
                        "document has no element".into()
                    } else {
                        "unexpected end of document".into()
                    }));
                }
                _ => {}
            }
        }
    }

    /// Next child element of the current element, skipping character data.
    /// `None` once the end tag of the current element was consumed.
    ///
    /// # Errors
    ///
    /// Returns error on malformed XML.
    pub fn next_child(&mut self) -> Result<Option<StartTag>, Error> {
        loop {
            match self.next()? {
                Node::Start(tag) => return Ok(Some(tag)),
                Node::Text(_) => {}
                Node::End => return Ok(None),
            }
        }
    }

    fn start_tag(&self, ns: Option<String>, start: &BytesStart<'_>) -> Result<StartTag, String> {
        let local = utf8(start.local_name().into_inner())?;
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let (resolved, local) = self.reader.resolve_attribute(attr.key);
            // `xml:` is bound without a declaration.
            let attr_ns = match attr.key.prefix() {
                Some(prefix) if prefix.as_ref() == b"xml" => Some(XML_NS.to_string()),
                _ => namespace(&resolved)?,
            };
            let local = utf8(local.into_inner())?;
            let value = attr
                .decode_and_unescape_value(self.reader.decoder())
                .map_err(|e| e.to_string())?
                .into_owned();
            attrs.push(Attr {
                ns: attr_ns,
                local,
                value,
            });
        }
        Ok(StartTag { ns, local, attrs })
    }

    /// Skip the rest of the current element including its end tag.
    ///
    /// # Errors
    ///
    /// Returns error on malformed XML.
    pub fn skip(&mut self) -> Result<(), Error> {
        let mut open = 1_usize;
        while open > 0 {
            match self.next()? {
                Node::Start(_) => open += 1,
                Node::End => open -= 1,
                Node::Text(_) => {}
            }
        }
        Ok(())
    }

    /// Concatenated character data of the current element, consuming its
    /// end tag. Child elements are skipped.
    ///
    /// # Errors
    ///
    /// Returns error on malformed XML.
    pub fn text(&mut self) -> Result<String, Error> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Node::Text(t) => out.push_str(&t),
                Node::Start(tag) => {
                    tracing::trace!(element = %tag.local, "skipping element inside text content");
                    self.skip()?;
                }
                Node::End => return Ok(out),
            }
        }
    }

    /// Require end of document after the root element was read.
    ///
    /// # Errors
    ///
    /// Returns error if another element follows.
    pub fn finish(&mut self) -> Result<(), Error> {
        loop {
            match self.reader.read_event() {
                Ok(Event::Eof) => return Ok(()),
                Ok(Event::Start(_) | Event::Empty(_)) => {
                    return Err(self.error("content after document element"))
                }
                Ok(_) => {}
                Err(err) => return Err(self.error(err.to_string())),
            }
        }
    }
}

fn namespace(resolved: &ResolveResult<'_>) -> Result<Option<String>, String> {
    match resolved {
        ResolveResult::Bound(ns) => Ok(Some(utf8(ns.as_ref())?)),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(format!(
            "unknown namespace prefix '{}'",
            String::from_utf8_lossy(prefix)
        )),
    }
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(ToString::to_string)
        .map_err(|e| e.to_string())
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let code = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }
    resolve_predefined_entity(name).map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<?xml version="1.0"?>
<a:root xmlns:a="urn:a" xmlns="urn:default" a:x="1" y="&lt;2&gt;">
  <!-- comment -->
  <child>one &amp; two&#x21;<![CDATA[<three>]]></child>
  <a:empty/>
</a:root>"#;

    #[test]
    fn resolves_namespaces_and_attributes() {
        let mut c = XmlCursor::new(DOC.as_bytes());
        let root = c.root().unwrap();
        assert!(root.is("urn:a", "root"));
        assert_eq!(root.attr(Some("urn:a"), "x"), Some("1"));
        assert_eq!(root.attr(None, "y"), Some("<2>"));
        assert_eq!(root.attrs.len(), 2);

        let child = c.next_child().unwrap().unwrap();
        assert!(child.is("urn:default", "child"));
        assert_eq!(c.text().unwrap(), "one & two!<three>");

        let empty = c.next_child().unwrap().unwrap();
        assert!(empty.is("urn:a", "empty"));
        assert_eq!(c.next().unwrap(), Node::End);
        assert_eq!(c.next_child().unwrap(), None);
        c.finish().unwrap();
    }

    #[test]
    fn truncated_document_is_a_parse_error() {
        let mut c = XmlCursor::new(b"<root><child>text</child>");
        c.root().unwrap();
        assert!(matches!(c.skip(), Err(Error::Parse(_))));
    }

    #[test]
    fn mismatched_end_tag_is_a_parse_error() {
        let mut c = XmlCursor::new(b"<root><child></root>");
        c.root().unwrap();
        assert!(matches!(c.skip(), Err(Error::Parse(_))));
    }

    #[test]
    fn empty_document() {
        let mut c = XmlCursor::new(b"  ");
        assert!(matches!(c.root(), Err(Error::Parse(_))));
    }
}
