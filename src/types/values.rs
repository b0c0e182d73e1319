//! Properties and their values
//!
//! A property is an identified trait of a type or element (cardinality,
//! format hints, facets, qualification flags). Each property declares the kind
//! of value it carries; the value converter moves values between that kind and
//! text.

use super::complex::Type;
use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use url::Url;

use crate::error::{Error, Result};

/// The kind of a value, as declared by a property or a scalar kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Plain text
    Text,
    /// true / false
    Boolean,
    /// Signed 64-bit integer
    Integer,
    /// Arbitrary precision decimal
    Decimal,
    /// 64-bit float
    Double,
    /// Calendar date
    Date,
    /// Date and time with offset
    DateTime,
    /// Timezone offset
    Timezone,
    /// URI
    Uri,
    /// Binary data, base64 in text form
    Bytes,
    /// Regular expression
    Pattern,
    /// Opaque object without a textual form
    Object,
    /// Ordered list of values
    List,
    /// Reference to a type
    Type,
    /// Collection handler
    CollectionHandler,
}

/// Regular expression value, compared by its source
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compile a pattern
    pub fn new(source: &str) -> Result<Self> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|e| Error::conversion(format!("invalid pattern '{}': {}", source, e)))
    }

    /// Pattern source
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.as_str())
    }
}

/// Known handlers for collection-valued elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionHandler {
    /// Collection exposed as a map keyed by string
    StringMap,
}

impl CollectionHandler {
    /// Parse from the identifier used in documents
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "stringMap" => Some(CollectionHandler::StringMap),
            _ => None,
        }
    }

    /// Identifier used in documents
    pub fn identifier(&self) -> &'static str {
        match self {
            CollectionHandler::StringMap => "stringMap",
        }
    }
}

/// A typed value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Text
    Text(String),
    /// Boolean
    Boolean(bool),
    /// Integer
    Integer(i64),
    /// Decimal
    Decimal(Decimal),
    /// Double
    Double(f64),
    /// Date
    Date(NaiveDate),
    /// Date and time
    DateTime(DateTime<FixedOffset>),
    /// Timezone offset
    Timezone(FixedOffset),
    /// URI
    Uri(Url),
    /// Binary data
    Bytes(Vec<u8>),
    /// Regular expression
    Pattern(Pattern),
    /// List of values (enumerations)
    List(Vec<Value>),
    /// Type reference
    Type(Type),
    /// Collection handler
    CollectionHandler(CollectionHandler),
}

impl Value {
    /// Create a text value
    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    /// The kind of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Text(_) => ValueKind::Text,
            Value::Boolean(_) => ValueKind::Boolean,
            Value::Integer(_) => ValueKind::Integer,
            Value::Decimal(_) => ValueKind::Decimal,
            Value::Double(_) => ValueKind::Double,
            Value::Date(_) => ValueKind::Date,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Timezone(_) => ValueKind::Timezone,
            Value::Uri(_) => ValueKind::Uri,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Pattern(_) => ValueKind::Pattern,
            Value::List(_) => ValueKind::List,
            Value::Type(_) => ValueKind::Type,
            Value::CollectionHandler(_) => ValueKind::CollectionHandler,
        }
    }

    /// Get as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get as integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(value) => Some(*value),
            _ => None,
        }
    }

    /// Get as list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(values) => Some(values),
            _ => None,
        }
    }
}

/// Property kinds understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Name of an element or group
    Name,
    /// Namespace
    Namespace,
    /// Minimum occurrences
    MinOccurs,
    /// Maximum occurrences, 0 meaning unbounded
    MaxOccurs,
    /// Whether nil is allowed
    Nillable,
    /// Free-form comment
    Comment,
    /// Format hint for temporal values
    Format,
    /// Timezone hint for temporal values
    Timezone,
    /// Regular expression facet
    Pattern,
    /// Exact length facet
    Length,
    /// Minimum length facet
    MinLength,
    /// Maximum length facet
    MaxLength,
    /// Inclusive lower bound
    MinInclusive,
    /// Inclusive upper bound
    MaxInclusive,
    /// Total digits facet
    TotalDigits,
    /// Fraction digits facet
    FractionDigits,
    /// Scalar kind a textual value actually holds
    ActualType,
    /// Permitted values
    Enumeration,
    /// Supertype of a type
    SuperType,
    /// Whether the element is namespace qualified
    Qualified,
    /// Default qualification of child elements
    ElementQualifiedDefault,
    /// Default qualification of child attributes
    AttributeQualifiedDefault,
    /// Handler used for collection values
    CollectionHandler,
}

impl Property {
    /// All property kinds
    pub const ALL: [Property; 23] = [
        Property::Name,
        Property::Namespace,
        Property::MinOccurs,
        Property::MaxOccurs,
        Property::Nillable,
        Property::Comment,
        Property::Format,
        Property::Timezone,
        Property::Pattern,
        Property::Length,
        Property::MinLength,
        Property::MaxLength,
        Property::MinInclusive,
        Property::MaxInclusive,
        Property::TotalDigits,
        Property::FractionDigits,
        Property::ActualType,
        Property::Enumeration,
        Property::SuperType,
        Property::Qualified,
        Property::ElementQualifiedDefault,
        Property::AttributeQualifiedDefault,
        Property::CollectionHandler,
    ];

    /// Attribute name of the property
    pub fn name(&self) -> &'static str {
        match self {
            Property::Name => "name",
            Property::Namespace => "namespace",
            Property::MinOccurs => "minOccurs",
            Property::MaxOccurs => "maxOccurs",
            Property::Nillable => "nillable",
            Property::Comment => "comment",
            Property::Format => "format",
            Property::Timezone => "timezone",
            Property::Pattern => "pattern",
            Property::Length => "length",
            Property::MinLength => "minLength",
            Property::MaxLength => "maxLength",
            Property::MinInclusive => "minInclusive",
            Property::MaxInclusive => "maxInclusive",
            Property::TotalDigits => "totalDigits",
            Property::FractionDigits => "fractionDigits",
            Property::ActualType => "actualType",
            Property::Enumeration => "enumeration",
            Property::SuperType => "superType",
            Property::Qualified => "qualified",
            Property::ElementQualifiedDefault => "elementQualifiedDefault",
            Property::AttributeQualifiedDefault => "attributeQualifiedDefault",
            Property::CollectionHandler => "collectionHandler",
        }
    }

    /// Look up a property by attribute name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// Kind of value the property carries
    pub fn value_kind(&self) -> ValueKind {
        match self {
            Property::Name
            | Property::Namespace
            | Property::Comment
            | Property::Format
            | Property::ActualType => ValueKind::Text,
            Property::MinOccurs
            | Property::MaxOccurs
            | Property::Length
            | Property::MinLength
            | Property::MaxLength
            | Property::TotalDigits
            | Property::FractionDigits => ValueKind::Integer,
            Property::Nillable
            | Property::Qualified
            | Property::ElementQualifiedDefault
            | Property::AttributeQualifiedDefault => ValueKind::Boolean,
            Property::MinInclusive | Property::MaxInclusive => ValueKind::Decimal,
            Property::Timezone => ValueKind::Timezone,
            Property::Pattern => ValueKind::Pattern,
            Property::Enumeration => ValueKind::List,
            Property::SuperType => ValueKind::Type,
            Property::CollectionHandler => ValueKind::CollectionHandler,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Property values in insertion order.
///
/// Equality ignores order: two sets are equal when they hold the same
/// property/value pairs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    values: IndexMap<Property, Value>,
}

impl Properties {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, keeping the original position of an existing property
    pub fn set(&mut self, property: Property, value: Value) {
        self.values.insert(property, value);
    }

    /// Builder-style set
    pub fn with(mut self, property: Property, value: Value) -> Self {
        self.set(property, value);
        self
    }

    /// Get a value
    pub fn get(&self, property: Property) -> Option<&Value> {
        self.values.get(&property)
    }

    /// Remove a value, preserving the order of the rest
    pub fn remove(&mut self, property: Property) -> Option<Value> {
        self.values.shift_remove(&property)
    }

    /// Check if a property has a value
    pub fn contains(&self, property: Property) -> bool {
        self.values.contains_key(&property)
    }

    /// Iterate over property/value pairs
    pub fn iter(&self) -> impl Iterator<Item = (Property, &Value)> {
        self.values.iter().map(|(p, v)| (*p, v))
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Copy of this set with the values of `other` applied on top
    pub fn merged(&self, other: &Properties) -> Properties {
        let mut merged = self.clone();
        merged.extend(other.clone());
        merged
    }

    /// Copy of this set without one property
    pub fn without(&self, property: Property) -> Properties {
        let mut copy = self.clone();
        copy.remove(property);
        copy
    }

    /// Enumeration values, if any
    pub fn enumeration(&self) -> Option<&[Value]> {
        self.get(Property::Enumeration).and_then(Value::as_list)
    }

    /// Minimum occurrences, if set
    pub fn min_occurs(&self) -> Option<i64> {
        self.get(Property::MinOccurs).and_then(Value::as_integer)
    }

    /// Maximum occurrences, if set (0 means unbounded)
    pub fn max_occurs(&self) -> Option<i64> {
        self.get(Property::MaxOccurs).and_then(Value::as_integer)
    }
}

impl Extend<(Property, Value)> for Properties {
    fn extend<I: IntoIterator<Item = (Property, Value)>>(&mut self, iter: I) {
        for (property, value) in iter {
            self.set(property, value);
        }
    }
}

impl FromIterator<(Property, Value)> for Properties {
    fn from_iter<I: IntoIterator<Item = (Property, Value)>>(iter: I) -> Self {
        let mut properties = Properties::new();
        properties.extend(iter);
        properties
    }
}

impl IntoIterator for Properties {
    type Item = (Property, Value);
    type IntoIter = indexmap::map::IntoIter<Property, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
