//! Fixed-point attribute resolution
//!
//! The properties a type supports can grow as values are resolved, so the
//! attributes of an element are matched in passes: each pass asks for the
//! supported properties given everything resolved so far and consumes the
//! attributes that match. Resolution stops after a pass that consumes
//! nothing. The property universe is finite, so this always terminates.

use super::UNBOUNDED;
use crate::documents::XmlElement;
use crate::error::{Error, Result};
use crate::types::{
    supported_properties, CollectionHandler, Properties, Property, TypeKind, Value,
    ValueConverter, ALWAYS_ACCEPTED,
};
use tracing::{debug, trace};

/// Resolves the XML attributes of an element into property values
pub struct AttributeResolver<'a> {
    converter: &'a dyn ValueConverter,
    ignore_unknown: bool,
}

impl<'a> AttributeResolver<'a> {
    /// Create a resolver
    pub fn new(converter: &'a dyn ValueConverter, ignore_unknown: bool) -> Self {
        Self {
            converter,
            ignore_unknown,
        }
    }

    /// Resolve the attributes of `element` against a type kind.
    ///
    /// Attributes named in `reserved` and attributes with an empty value are
    /// skipped. Attributes left over at the fixed point are an error unless
    /// unknown attributes are ignored.
    pub fn resolve(
        &self,
        element: &XmlElement,
        kind: TypeKind,
        reserved: &[&str],
    ) -> Result<Properties> {
        let mut pending: Vec<&str> = element
            .attributes
            .iter()
            .filter(|(name, value)| !value.is_empty() && !reserved.contains(&name.as_str()))
            .map(|(name, _)| name.as_str())
            .collect();
        let mut resolved = Properties::new();

        let mut pass = 0;
        loop {
            pass += 1;
            let mut supported = supported_properties(kind, &resolved);
            supported.extend(ALWAYS_ACCEPTED);

            let before = pending.len();
            let mut remaining = Vec::with_capacity(before);
            for name in pending {
                match Property::from_name(name).filter(|p| supported.contains(p)) {
                    Some(property) => {
                        let text = element.get_attribute(name).unwrap_or_default();
                        resolved.set(property, self.convert(property, text)?);
                    }
                    None => remaining.push(name),
                }
            }
            pending = remaining;

            trace!(
                element = element.name(),
                pass,
                consumed = before - pending.len(),
                "attribute resolution pass"
            );
            if pending.len() == before {
                break;
            }
        }

        if !pending.is_empty() {
            if !self.ignore_unknown {
                return Err(Error::UnconsumedInput {
                    element: element.name().to_string(),
                    attributes: pending.iter().map(|s| s.to_string()).collect(),
                });
            }
            debug!(element = element.name(), attributes = ?pending, "dropping unknown attributes");
        }
        Ok(resolved)
    }

    fn convert(&self, property: Property, text: &str) -> Result<Value> {
        match property {
            Property::MaxOccurs if text == UNBOUNDED => Ok(Value::Integer(0)),
            Property::CollectionHandler => CollectionHandler::from_identifier(text)
                .map(Value::CollectionHandler)
                .ok_or_else(|| {
                    Error::unsupported(format!("unknown collection handler '{}'", text))
                }),
            _ => self.converter.from_text(text, property.value_kind()),
        }
    }
}
