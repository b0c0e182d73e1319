//! Codec configuration
//!
//! Policies for the marshaller and the unmarshaller. Both structs follow the
//! builder pattern and can be loaded from JSON.

use crate::error::{Error, Result};
use crate::limits::Limits;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Text encoding of marshalled documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    /// UTF-8
    #[default]
    #[serde(rename = "UTF-8")]
    Utf8,
    /// ISO-8859-1
    #[serde(rename = "ISO-8859-1")]
    Latin1,
    /// US-ASCII
    #[serde(rename = "US-ASCII")]
    Ascii,
}

impl Encoding {
    /// Parse an encoding label (case-insensitive)
    pub fn from_label(label: &str) -> Result<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Encoding::Latin1),
            "us-ascii" | "ascii" => Ok(Encoding::Ascii),
            _ => Err(Error::Encoding(format!("unsupported encoding '{}'", label))),
        }
    }

    /// Label written in the XML declaration
    pub fn label(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "UTF-8",
            Encoding::Latin1 => "ISO-8859-1",
            Encoding::Ascii => "US-ASCII",
        }
    }

    /// Encode serialized markup.
    ///
    /// Markup names are always ASCII, so characters outside ASCII can only
    /// occur in attribute values and text, where a character reference is
    /// equivalent. Non-Unicode encodings therefore emit pure ASCII.
    pub fn encode(&self, markup: &str) -> Vec<u8> {
        match self {
            Encoding::Utf8 => markup.as_bytes().to_vec(),
            Encoding::Latin1 | Encoding::Ascii => {
                let mut out = String::with_capacity(markup.len());
                for c in markup.chars() {
                    if c.is_ascii() {
                        out.push(c);
                    } else {
                        out.push_str(&format!("&#x{:X};", c as u32));
                    }
                }
                out.into_bytes()
            }
        }
    }

    /// Transcode document bytes in this encoding to UTF-8
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Cow<'a, [u8]> {
        match self {
            // every Latin-1 byte is the code point of the same value
            Encoding::Latin1 if !bytes.is_ascii() => Cow::Owned(
                bytes
                    .iter()
                    .map(|&b| char::from(b))
                    .collect::<String>()
                    .into_bytes(),
            ),
            _ => Cow::Borrowed(bytes),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Configuration for the marshaller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarshalConfig {
    /// Output text encoding
    pub encoding: Encoding,
    /// Whether to write the XML declaration
    pub xml_declaration: bool,
    /// Whether to indent the output
    pub pretty_print: bool,
    /// Indentation width when pretty printing
    pub indent: usize,
    /// Drop supertypes that can not be referenced instead of failing
    pub ignore_unknown_super_types: bool,
    /// Inline supertypes instead of referencing them
    pub resolve_extensions: bool,
    /// Inline defined types instead of referencing them by id
    pub resolve_definitions: bool,
    /// Processing limits
    pub limits: Limits,
}

impl Default for MarshalConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Utf8,
            xml_declaration: false,
            pretty_print: true,
            indent: 4,
            ignore_unknown_super_types: false,
            resolve_extensions: false,
            resolve_definitions: false,
            limits: Limits::default(),
        }
    }
}

impl MarshalConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output encoding
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set whether to write the XML declaration
    pub fn with_xml_declaration(mut self, declaration: bool) -> Self {
        self.xml_declaration = declaration;
        self
    }

    /// Set pretty printing
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    /// Set indentation width
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set whether unknown supertypes are ignored
    pub fn with_ignore_unknown_super_types(mut self, ignore: bool) -> Self {
        self.ignore_unknown_super_types = ignore;
        self
    }

    /// Set whether supertypes are inlined
    pub fn with_resolve_extensions(mut self, resolve: bool) -> Self {
        self.resolve_extensions = resolve;
        self
    }

    /// Set whether defined types are inlined
    pub fn with_resolve_definitions(mut self, resolve: bool) -> Self {
        self.resolve_definitions = resolve;
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}

/// Configuration for the unmarshaller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnmarshalConfig {
    /// Drop unknown attributes and unresolvable definitions instead of failing
    pub ignore_unknown: bool,
    /// Identifier that refers to the type being unmarshalled
    pub self_id: Option<String>,
    /// Processing limits
    pub limits: Limits,
}

impl UnmarshalConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether unknown input is ignored
    pub fn with_ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    /// Set the self-reference identifier
    pub fn with_self_id(mut self, id: impl Into<String>) -> Self {
        self.self_id = Some(id.into());
        self
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }
}
