//! Complex types, elements and groups
//!
//! A complex type owns an ordered set of uniquely named child elements and a
//! list of groups. Attributes always sit ahead of other children; among
//! themselves they keep insertion order.

use super::capabilities::TypeKind;
use super::simple::SimpleType;
use super::values::{Properties, Property, Value};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Any type an element can have
#[derive(Debug, Clone)]
pub enum Type {
    /// A simple type
    Simple(Arc<SimpleType>),
    /// A complex type held in place
    Complex(Arc<ComplexType>),
    /// A complex type known only by its global id.
    ///
    /// Used for references to a type that is still under construction, such
    /// as a definition that refers to itself. Resolve it through a type
    /// registry once the type has been registered.
    Reference(String),
}

impl Type {
    /// Wrap a simple type
    pub fn simple(ty: SimpleType) -> Self {
        Type::Simple(Arc::new(ty))
    }

    /// Wrap a complex type
    pub fn complex(ty: ComplexType) -> Self {
        Type::Complex(Arc::new(ty))
    }

    /// Global id of the type, if it is a defined type
    pub fn defined_id(&self) -> Option<&str> {
        match self {
            Type::Simple(ty) => ty.id(),
            Type::Complex(ty) => ty.id(),
            Type::Reference(id) => Some(id),
        }
    }

    /// Whether the type has child structure
    pub fn is_complex(&self) -> bool {
        !matches!(self, Type::Simple(_))
    }

    /// Get as simple type
    pub fn as_simple(&self) -> Option<&Arc<SimpleType>> {
        match self {
            Type::Simple(ty) => Some(ty),
            _ => None,
        }
    }

    /// Get as complex type
    pub fn as_complex(&self) -> Option<&Arc<ComplexType>> {
        match self {
            Type::Complex(ty) => Some(ty),
            _ => None,
        }
    }

    /// Capability kind of the type
    pub fn kind(&self) -> TypeKind {
        match self {
            Type::Simple(ty) => TypeKind::Simple(ty.kind),
            Type::Complex(ty) => ty.kind(),
            Type::Reference(_) => TypeKind::Complex { wrapped: None },
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.defined_id(), other.defined_id()) {
            return a == b;
        }
        match (self, other) {
            (Type::Simple(a), Type::Simple(b)) => a == b,
            (Type::Complex(a), Type::Complex(b)) => a == b,
            _ => false,
        }
    }
}

/// How a complex type relates to its supertype
#[derive(Debug, Clone, Default)]
pub enum SuperType {
    /// No supertype
    #[default]
    None,
    /// Supertype known only by global id
    ByReference(String),
    /// Supertype held in place (defined or anonymous)
    Inline(Type),
}

impl SuperType {
    /// Whether there is no supertype
    pub fn is_none(&self) -> bool {
        matches!(self, SuperType::None)
    }

    /// Global id of the supertype, if it has one
    pub fn id(&self) -> Option<&str> {
        match self {
            SuperType::None => None,
            SuperType::ByReference(id) => Some(id),
            SuperType::Inline(ty) => ty.defined_id(),
        }
    }
}

impl PartialEq for SuperType {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (SuperType::None, SuperType::None) => true,
            (SuperType::None, _) | (_, SuperType::None) => false,
            (SuperType::Inline(a), SuperType::Inline(b)) => a == b,
            _ => match (self.id(), other.id()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

/// Whether an element is a regular member or an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// Regular member
    Field,
    /// Attribute, restricted to simple content
    Attribute,
}

/// A named, typed member of a complex type
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Member name, unique within the parent
    pub name: String,
    /// Member kind
    pub kind: ElementKind,
    /// Member type
    pub ty: Type,
    /// Occurrence properties
    pub properties: Properties,
}

impl Element {
    /// Create a regular member
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Field,
            ty,
            properties: Properties::new(),
        }
    }

    /// Create an attribute
    pub fn attribute(name: impl Into<String>, ty: Arc<SimpleType>) -> Self {
        Self {
            name: name.into(),
            kind: ElementKind::Attribute,
            ty: Type::Simple(ty),
            properties: Properties::new(),
        }
    }

    /// Set a property
    pub fn with_property(mut self, property: Property, value: Value) -> Self {
        self.properties.set(property, value);
        self
    }

    /// Replace all properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Whether this is an attribute
    pub fn is_attribute(&self) -> bool {
        self.kind == ElementKind::Attribute
    }

    /// Enumeration values set on this element itself
    pub fn enumeration(&self) -> &[Value] {
        self.properties.enumeration().unwrap_or(&[])
    }

    /// The type's own enumeration followed by this element's additional values
    pub fn effective_enumeration(&self) -> Vec<Value> {
        let mut values: Vec<Value> = match &self.ty {
            Type::Simple(ty) => ty.enumeration().to_vec(),
            Type::Complex(ty) => ty
                .wrapped
                .as_ref()
                .map(|w| w.enumeration().to_vec())
                .unwrap_or_default(),
            Type::Reference(_) => Vec::new(),
        };
        for value in self.enumeration() {
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
        values
    }
}

/// Kind of a group overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Exactly one member applies
    Choice,
    /// Members apply in order
    Sequence,
    /// Members apply in any order
    All,
}

impl GroupKind {
    /// Parse from the identifier used in documents
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        match identifier {
            "choice" => Some(GroupKind::Choice),
            "sequence" => Some(GroupKind::Sequence),
            "all" => Some(GroupKind::All),
            _ => None,
        }
    }

    /// Identifier used in documents
    pub fn identifier(&self) -> &'static str {
        match self {
            GroupKind::Choice => "choice",
            GroupKind::Sequence => "sequence",
            GroupKind::All => "all",
        }
    }
}

impl fmt::Display for GroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// An overlay over sibling elements, referencing them by name
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Group kind
    pub kind: GroupKind,
    /// Group properties (name, occurrences)
    pub properties: Properties,
    /// Names of the member elements
    pub members: Vec<String>,
}

impl Group {
    /// Create an empty group
    pub fn new(kind: GroupKind) -> Self {
        Self {
            kind,
            properties: Properties::new(),
            members: Vec::new(),
        }
    }

    /// Add a member by name
    pub fn with_member(mut self, name: impl Into<String>) -> Self {
        self.members.push(name.into());
        self
    }

    /// Set a property
    pub fn with_property(mut self, property: Property, value: Value) -> Self {
        self.properties.set(property, value);
        self
    }

    /// Replace all properties
    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    /// Group name, if set
    pub fn name(&self) -> Option<&str> {
        self.properties.get(Property::Name).and_then(Value::as_text)
    }
}

/// A type composed of named members
#[derive(Debug, Clone, Default)]
pub struct ComplexType {
    /// Global id when the type is defined
    pub id: Option<String>,
    /// Type name
    pub name: Option<String>,
    /// Supertype relationship
    pub super_type: SuperType,
    /// Simple value this structure extends, if any
    pub wrapped: Option<Arc<SimpleType>>,
    /// Own properties
    pub properties: Properties,
    children: IndexMap<String, Element>,
    groups: Vec<Group>,
}

impl ComplexType {
    /// Create an anonymous complex type
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a complex type defined under a global id
    pub fn defined(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// Set the name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the supertype
    pub fn with_super_type(mut self, super_type: SuperType) -> Self {
        self.super_type = super_type;
        self
    }

    /// Set the wrapped simple type
    pub fn with_wrapped(mut self, wrapped: Arc<SimpleType>) -> Self {
        self.wrapped = Some(wrapped);
        self
    }

    /// Set a property
    pub fn with_property(mut self, property: Property, value: Value) -> Self {
        self.properties.set(property, value);
        self
    }

    /// Global id, if defined
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Capability kind of the type
    pub fn kind(&self) -> TypeKind {
        TypeKind::Complex {
            wrapped: self.wrapped.as_ref().map(|w| w.kind),
        }
    }

    /// Add a child element.
    ///
    /// Attributes are placed after the existing attributes and ahead of all
    /// other children.
    pub fn add(&mut self, element: Element) -> Result<()> {
        if self.children.contains_key(&element.name) {
            return Err(Error::unsupported(format!(
                "duplicate child name '{}'",
                element.name
            )));
        }
        if element.is_attribute() {
            if element.ty.is_complex() {
                return Err(Error::unsupported(format!(
                    "attribute '{}' must have a simple type",
                    element.name
                )));
            }
            let position = self.attribute_count();
            self.children
                .shift_insert(position, element.name.clone(), element);
        } else {
            self.children.insert(element.name.clone(), element);
        }
        Ok(())
    }

    /// Add a group; every member must name an existing child
    pub fn add_group(&mut self, group: Group) -> Result<()> {
        if let Some(missing) = group.members.iter().find(|m| !self.children.contains_key(*m)) {
            return Err(Error::unresolved(format!(
                "group member '{}' is not a child of this type",
                missing
            )));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Get a child by name
    pub fn get(&self, name: &str) -> Option<&Element> {
        self.children.get(name)
    }

    /// Children in order, attributes first
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.values()
    }

    /// Number of children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Whether the type has no children
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Groups in order
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    fn attribute_count(&self) -> usize {
        self.children.values().filter(|c| c.is_attribute()).count()
    }
}

impl PartialEq for ComplexType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.super_type == other.super_type
            && self.wrapped == other.wrapped
            && self.properties == other.properties
            && self.children.len() == other.children.len()
            && self.children.values().eq(other.children.values())
            && self.groups == other.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::simple::ScalarKind;

    fn string() -> Arc<SimpleType> {
        Arc::new(SimpleType::builtin(ScalarKind::String))
    }

    #[test]
    fn test_attributes_precede_elements_in_insertion_order() {
        let mut ty = ComplexType::new();
        ty.add(Element::new("first", Type::Simple(string()))).unwrap();
        ty.add(Element::attribute("a1", string())).unwrap();
        ty.add(Element::new("second", Type::Simple(string()))).unwrap();
        ty.add(Element::attribute("a2", string())).unwrap();

        let names: Vec<&str> = ty.children().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["a1", "a2", "first", "second"]);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut ty = ComplexType::new();
        ty.add(Element::new("x", Type::Simple(string()))).unwrap();
        let err = ty.add(Element::attribute("x", string())).unwrap_err();
        assert!(matches!(err, Error::UnsupportedStructure(_)));
    }

    #[test]
    fn test_complex_attribute_rejected() {
        let mut ty = ComplexType::new();
        let mut attribute = Element::attribute("x", string());
        attribute.ty = Type::complex(ComplexType::new());
        assert!(ty.add(attribute).is_err());
    }

    #[test]
    fn test_group_members_must_exist() {
        let mut ty = ComplexType::new();
        ty.add(Element::new("a", Type::Simple(string()))).unwrap();

        assert!(ty
            .add_group(Group::new(GroupKind::Choice).with_member("a"))
            .is_ok());
        let err = ty
            .add_group(Group::new(GroupKind::Choice).with_member("b"))
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
        assert_eq!(ty.groups().len(), 1);
    }

    #[test]
    fn test_child_order_matters_for_equality() {
        let mut a = ComplexType::new();
        a.add(Element::new("x", Type::Simple(string()))).unwrap();
        a.add(Element::new("y", Type::Simple(string()))).unwrap();
        let mut b = ComplexType::new();
        b.add(Element::new("y", Type::Simple(string()))).unwrap();
        b.add(Element::new("x", Type::Simple(string()))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_defined_types_compare_by_id() {
        let full = Type::complex(ComplexType::defined("example.Node").with_name("node"));
        let reference = Type::Reference("example.Node".to_string());
        assert_eq!(full, reference);
        assert_ne!(reference, Type::Reference("example.Other".to_string()));
        assert_ne!(Type::complex(ComplexType::new()), reference);
    }

    #[test]
    fn test_super_type_equality() {
        let inline = SuperType::Inline(Type::complex(ComplexType::defined("example.Base")));
        let by_ref = SuperType::ByReference("example.Base".to_string());
        assert_eq!(inline, by_ref);
        assert_ne!(SuperType::None, by_ref);
        assert_ne!(
            SuperType::Inline(Type::complex(ComplexType::new())),
            by_ref
        );
    }

    #[test]
    fn test_effective_enumeration() {
        let color = Arc::new(
            SimpleType::defined("example.Color", ScalarKind::String)
                .with_enumeration(vec![Value::text("A"), Value::text("B")]),
        );
        let element = Element::new("c", Type::Simple(color))
            .with_property(Property::Enumeration, Value::List(vec![Value::text("C")]));
        assert_eq!(
            element.effective_enumeration(),
            vec![Value::text("A"), Value::text("B"), Value::text("C")]
        );
    }
}
