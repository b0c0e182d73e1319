//! XML document handling
//!
//! A small element tree used as the intermediate form on both sides of the
//! codec: the unmarshaller walks a parsed tree, the marshaller builds one and
//! writes it out. Attribute order is preserved.

use crate::config::{Encoding, MarshalConfig};
use crate::error::{Error, Result};
use crate::limits::Limits;
use indexmap::IndexMap;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::borrow::Cow;

/// XML element in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create a new element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Get the tag name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get an attribute value by name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Whether the attribute is present with a non-empty value
    pub fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some_and(|v| !v.is_empty())
    }

    /// Set an attribute, replacing any previous value in place
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Add a child element at the end
    pub fn add_child(&mut self, child: XmlElement) {
        self.children.push(child);
    }

    /// Insert a child element at a position
    pub fn insert_child(&mut self, index: usize, child: XmlElement) {
        let index = index.min(self.children.len());
        self.children.insert(index, child);
    }

    /// Set text content
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = Some(text.into());
    }

    /// Text content, empty when absent
    pub fn text_content(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Whitespace between child elements is layout, not content. Text of an
    /// element without children is kept as is.
    fn drop_layout_text(&mut self) {
        if !self.children.is_empty() && self.text_content().trim().is_empty() {
            self.text = None;
        }
    }

    fn append_text(&mut self, text: &str) {
        match self.text.as_mut() {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }

    fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            let value = escape_attribute(value);
            start.push_attribute((name.as_bytes(), value.as_bytes()));
        }

        if self.children.is_empty() && self.text.is_none() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if let Some(text) = &self.text {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;
        Ok(())
    }
}

/// Escape an attribute value. Line breaks and tabs become character
/// references, as readers normalize literal ones to spaces.
fn escape_attribute(value: &str) -> Cow<'_, str> {
    let escaped = escape(value);
    if !escaped.contains(|c: char| matches!(c, '\n' | '\r' | '\t')) {
        return escaped;
    }
    Cow::Owned(
        escaped
            .replace('\n', "&#10;")
            .replace('\r', "&#13;")
            .replace('\t', "&#9;"),
    )
}

/// Encoding named in the XML declaration, UTF-8 when there is none
fn declared_encoding(xml: &[u8]) -> Result<Encoding> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => match decl.encoding() {
            Some(Ok(label)) => Encoding::from_label(&String::from_utf8_lossy(&label)),
            Some(Err(e)) => Err(Error::Xml(format!("Invalid XML declaration: {}", e))),
            None => Ok(Encoding::Utf8),
        },
        // malformed input is reported by the parse itself
        _ => Ok(Encoding::Utf8),
    }
}

/// XML document representation
#[derive(Debug, Default)]
pub struct Document {
    /// Root element of the document
    pub root: Option<XmlElement>,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Create a document around a root element
    pub fn with_root(root: XmlElement) -> Self {
        Self { root: Some(root) }
    }

    /// Parse an XML document from a string
    pub fn from_string(xml: &str) -> Result<Self> {
        Self::parse(xml.as_bytes())
    }

    /// Parse an XML document from bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        Self::parse_with_limits(xml, &Limits::default())
    }

    /// Parse an XML document from bytes, enforcing the nesting limit
    ///
    /// Input declared as ISO-8859-1 is transcoded before parsing; any other
    /// input is read as UTF-8.
    pub fn parse_with_limits(xml: &[u8], limits: &Limits) -> Result<Self> {
        let xml = declared_encoding(xml)?.decode(xml);
        let mut reader = Reader::from_reader(&xml[..]);
        reader.trim_text(false);

        let mut doc = Document::new();
        let mut element_stack: Vec<XmlElement> = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    let element = Self::parse_element(&e)?;
                    element_stack.push(element);
                    limits.check_depth(element_stack.len())?;
                }
                Ok(Event::End(_)) => {
                    if let Some(mut current) = element_stack.pop() {
                        current.drop_layout_text();
                        if let Some(parent) = element_stack.last_mut() {
                            parent.add_child(current);
                        } else {
                            doc.root = Some(current);
                        }
                    }
                }
                Ok(Event::Empty(e)) => {
                    let element = Self::parse_element(&e)?;
                    if let Some(parent) = element_stack.last_mut() {
                        parent.add_child(element);
                    } else {
                        doc.root = Some(element);
                    }
                }
                Ok(Event::Text(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = e
                            .unescape()
                            .map_err(|e| Error::Xml(format!("Failed to unescape text: {}", e)))?;
                        current.append_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = element_stack.last_mut() {
                        let text = std::str::from_utf8(e.as_ref())
                            .map_err(|e| Error::Xml(format!("Invalid CDATA section: {}", e)))?;
                        current.append_text(text);
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "Error parsing XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
                _ => {} // comments, processing instructions, declaration
            }
            buf.clear();
        }

        if !element_stack.is_empty() {
            return Err(Error::Xml(format!(
                "Unclosed element '{}'",
                element_stack[element_stack.len() - 1].name
            )));
        }

        Ok(doc)
    }

    fn parse_element(start: &BytesStart) -> Result<XmlElement> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::Xml(format!("Invalid element name: {}", e)))?
            .to_string();

        let mut element = XmlElement::new(name);

        for attr_result in start.attributes() {
            let attr = attr_result
                .map_err(|e| Error::Xml(format!("Failed to parse attribute: {}", e)))?;

            let attr_name = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::Xml(format!("Invalid attribute name: {}", e)))?;

            // namespace declarations are not part of the definition grammar
            if attr_name == "xmlns" || attr_name.starts_with("xmlns:") {
                continue;
            }

            let attr_value = attr
                .unescape_value()
                .map_err(|e| Error::Xml(format!("Failed to unescape attribute value: {}", e)))?
                .to_string();

            element.attributes.insert(attr_name.to_string(), attr_value);
        }

        Ok(element)
    }

    /// Get the root element
    pub fn root(&self) -> Option<&XmlElement> {
        self.root.as_ref()
    }

    /// Serialize the document using the output settings of a marshal config
    pub fn to_bytes(&self, config: &MarshalConfig) -> Result<Vec<u8>> {
        let mut writer = if config.pretty_print {
            Writer::new_with_indent(Vec::new(), b' ', config.indent)
        } else {
            Writer::new(Vec::new())
        };

        if config.xml_declaration {
            writer.write_event(Event::Decl(BytesDecl::new(
                "1.0",
                Some(config.encoding.label()),
                None,
            )))?;
        }
        if let Some(root) = &self.root {
            root.write_to(&mut writer)?;
        }

        let markup = String::from_utf8(writer.into_inner())
            .map_err(|e| Error::Encoding(format!("invalid UTF-8 in output: {}", e)))?;
        Ok(config.encoding.encode(&markup))
    }
}
