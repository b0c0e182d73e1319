//! Scalar kinds and simple types
//!
//! Simple types are leaves: a scalar kind plus properties, optionally
//! registered under a global id and optionally derived from another simple
//! type.

use super::values::{Properties, Property, Value, ValueKind};
use std::fmt;
use std::sync::Arc;

/// Built-in scalar kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Text
    String,
    /// true / false
    Boolean,
    /// 32-bit range integer
    Integer,
    /// 64-bit range integer
    Long,
    /// Arbitrary precision decimal
    Decimal,
    /// 64-bit float
    Double,
    /// Calendar date
    Date,
    /// Date and time
    DateTime,
    /// URI
    Uri,
    /// Binary data
    Bytes,
    /// Opaque object
    Object,
}

impl ScalarKind {
    /// All scalar kinds
    pub const ALL: [ScalarKind; 11] = [
        ScalarKind::String,
        ScalarKind::Boolean,
        ScalarKind::Integer,
        ScalarKind::Long,
        ScalarKind::Decimal,
        ScalarKind::Double,
        ScalarKind::Date,
        ScalarKind::DateTime,
        ScalarKind::Uri,
        ScalarKind::Bytes,
        ScalarKind::Object,
    ];

    /// Stable raw identifier
    pub fn identifier(&self) -> &'static str {
        match self {
            ScalarKind::String => "string",
            ScalarKind::Boolean => "boolean",
            ScalarKind::Integer => "integer",
            ScalarKind::Long => "long",
            ScalarKind::Decimal => "decimal",
            ScalarKind::Double => "double",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "dateTime",
            ScalarKind::Uri => "anyURI",
            ScalarKind::Bytes => "base64Binary",
            ScalarKind::Object => "object",
        }
    }

    /// Look up a kind by raw identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.identifier() == identifier)
    }

    /// Kind of the values of this scalar
    pub fn value_kind(&self) -> ValueKind {
        match self {
            ScalarKind::String => ValueKind::Text,
            ScalarKind::Boolean => ValueKind::Boolean,
            ScalarKind::Integer | ScalarKind::Long => ValueKind::Integer,
            ScalarKind::Decimal => ValueKind::Decimal,
            ScalarKind::Double => ValueKind::Double,
            ScalarKind::Date => ValueKind::Date,
            ScalarKind::DateTime => ValueKind::DateTime,
            ScalarKind::Uri => ValueKind::Uri,
            ScalarKind::Bytes => ValueKind::Bytes,
            ScalarKind::Object => ValueKind::Object,
        }
    }

    /// Whether values of this kind can be written as text
    pub fn is_marshallable(&self) -> bool {
        !matches!(self, ScalarKind::Object)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// A leaf type
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Global id when the type is defined
    pub id: Option<String>,
    /// Type name
    pub name: String,
    /// Scalar kind of the values
    pub kind: ScalarKind,
    /// Simple type this one derives from
    pub super_type: Option<Arc<SimpleType>>,
    /// Own properties, including the type's own enumeration
    pub properties: Properties,
}

impl SimpleType {
    /// Create an anonymous simple type
    pub fn new(name: impl Into<String>, kind: ScalarKind) -> Self {
        Self {
            id: None,
            name: name.into(),
            kind,
            super_type: None,
            properties: Properties::new(),
        }
    }

    /// Create the anonymous built-in type of a scalar kind
    pub fn builtin(kind: ScalarKind) -> Self {
        Self::new(kind.identifier(), kind)
    }

    /// Create a simple type defined under a global id
    pub fn defined(id: impl Into<String>, kind: ScalarKind) -> Self {
        let id = id.into();
        let name = id.rsplit('.').next().unwrap_or(&id).to_string();
        Self {
            id: Some(id),
            ..Self::new(name, kind)
        }
    }

    /// Set the supertype
    pub fn with_super_type(mut self, super_type: Arc<SimpleType>) -> Self {
        self.super_type = Some(super_type);
        self
    }

    /// Set a property
    pub fn with_property(mut self, property: Property, value: Value) -> Self {
        self.properties.set(property, value);
        self
    }

    /// Set the type's own enumeration
    pub fn with_enumeration(self, values: Vec<Value>) -> Self {
        self.with_property(Property::Enumeration, Value::List(values))
    }

    /// Global id, if defined
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The type's own enumeration values
    pub fn enumeration(&self) -> &[Value] {
        self.properties.enumeration().unwrap_or(&[])
    }

    /// This type or its nearest ancestor that can write values as text
    pub fn marshallable_ancestor(&self) -> Option<&SimpleType> {
        let mut current = Some(self);
        while let Some(ty) = current {
            if ty.kind.is_marshallable() {
                return Some(ty);
            }
            current = ty.super_type.as_deref();
        }
        None
    }
}

impl PartialEq for SimpleType {
    fn eq(&self, other: &Self) -> bool {
        match (&self.id, &other.id) {
            (Some(a), Some(b)) => a == b,
            _ => {
                self.id == other.id
                    && self.name == other.name
                    && self.kind == other.kind
                    && self.super_type == other.super_type
                    && self.properties == other.properties
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifiers_round_trip() {
        for kind in ScalarKind::ALL {
            assert_eq!(ScalarKind::from_identifier(kind.identifier()), Some(kind));
        }
        assert_eq!(ScalarKind::from_identifier("java.lang.String"), None);
    }

    #[test]
    fn test_defined_name_is_last_segment() {
        let ty = SimpleType::defined("com.example.PostalCode", ScalarKind::String);
        assert_eq!(ty.name, "PostalCode");
        assert_eq!(ty.id(), Some("com.example.PostalCode"));
    }

    #[test]
    fn test_defined_types_compare_by_id() {
        let a = SimpleType::defined("example.Color", ScalarKind::String)
            .with_enumeration(vec![Value::text("RED")]);
        let b = SimpleType::defined("example.Color", ScalarKind::String);
        assert_eq!(a, b);
        assert_ne!(SimpleType::builtin(ScalarKind::String), SimpleType::builtin(ScalarKind::Long));
    }

    #[test]
    fn test_marshallable_ancestor() {
        let base = Arc::new(SimpleType::builtin(ScalarKind::String));
        let opaque = SimpleType::new("handle", ScalarKind::Object).with_super_type(base);
        assert_eq!(opaque.marshallable_ancestor().unwrap().kind, ScalarKind::String);

        let bare = SimpleType::builtin(ScalarKind::Object);
        assert!(bare.marshallable_ancestor().is_none());
    }
}
