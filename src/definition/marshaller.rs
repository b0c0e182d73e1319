//! Writes complex types as XML definitions

use super::{
    ATTRIBUTE, DEFINITION, ENUMERATION, FIELD, GROUP, MEMBER, NAME, STRUCTURE, SUPER_TYPE, TYPE,
    UNBOUNDED,
};
use crate::config::MarshalConfig;
use crate::documents::{Document, XmlElement};
use crate::error::{Error, Result};
use crate::types::{
    BuiltinScalars, ComplexType, DefaultConverter, Element, Group, Properties, Property,
    ScalarKindRegistry, SimpleType, SuperType, Type, TypeRegistry, Value, ValueConverter,
};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, trace};

/// When a property value without a textual form may be left out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPolicy {
    /// Only while unknown supertypes are ignored
    WhenIgnoringUnknownSuperTypes,
    /// Always
    Always,
}

/// Properties whose value is left out, instead of failing the marshal, when
/// it has no textual form. Every other property must convert.
pub const DROPPABLE_PROPERTIES: [(Property, DropPolicy); 2] = [
    (Property::SuperType, DropPolicy::WhenIgnoringUnknownSuperTypes),
    (Property::CollectionHandler, DropPolicy::Always),
];

/// Marshals complex types into XML definitions
pub struct Marshaller {
    config: MarshalConfig,
    converter: Arc<dyn ValueConverter>,
    scalars: Arc<dyn ScalarKindRegistry>,
    registry: Option<Arc<dyn TypeRegistry>>,
}

impl Default for Marshaller {
    fn default() -> Self {
        Self::new(MarshalConfig::default())
    }
}

impl Marshaller {
    /// Create a marshaller with the default converter and built-in scalars
    pub fn new(config: MarshalConfig) -> Self {
        Self {
            config,
            converter: Arc::new(DefaultConverter::new()),
            scalars: Arc::new(BuiltinScalars::new()),
            registry: None,
        }
    }

    /// Use a different value converter
    pub fn with_converter(mut self, converter: Arc<dyn ValueConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Use a different scalar kind registry
    pub fn with_scalars(mut self, scalars: Arc<dyn ScalarKindRegistry>) -> Self {
        self.scalars = scalars;
        self
    }

    /// Resolve type references through a registry when inlining
    pub fn with_registry(mut self, registry: Arc<dyn TypeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &MarshalConfig {
        &self.config
    }

    /// Marshal a type to a writer.
    ///
    /// `values` apply to the root occurrence on top of the type's own
    /// properties.
    pub fn marshal<W: Write>(
        &self,
        output: &mut W,
        ty: &ComplexType,
        values: &Properties,
    ) -> Result<()> {
        let bytes = self.marshal_to_bytes(ty, values)?;
        output.write_all(&bytes)?;
        output.flush()?;
        Ok(())
    }

    /// Marshal a type to encoded bytes
    pub fn marshal_to_bytes(&self, ty: &ComplexType, values: &Properties) -> Result<Vec<u8>> {
        self.to_document(ty, values)?.to_bytes(&self.config)
    }

    /// Marshal a type to a string
    pub fn marshal_to_string(&self, ty: &ComplexType, values: &Properties) -> Result<String> {
        let bytes = self.marshal_to_bytes(ty, values)?;
        String::from_utf8(bytes).map_err(|e| Error::Encoding(e.to_string()))
    }

    /// Build the element tree for a type without writing it
    pub fn to_document(&self, ty: &ComplexType, values: &Properties) -> Result<Document> {
        let properties = ty.properties.merged(values);
        let mut root = XmlElement::new(STRUCTURE);

        let name = properties
            .get(Property::Name)
            .and_then(Value::as_text)
            .or(ty.name.as_deref());
        if let Some(name) = name {
            root.set_attribute(NAME, name);
        }
        self.write_attributes(&mut root, &properties.without(Property::Name))?;
        if let Some(wrapped) = &ty.wrapped {
            root.set_attribute(TYPE, self.scalars.identifier_of(wrapped));
        }

        let mut cursor = 0;
        self.serialize_into(&mut root, ty, &mut cursor, 1)?;

        if let Some(wrapped) = &ty.wrapped {
            self.write_enumerations(&mut root, wrapped, properties.enumeration().unwrap_or(&[]))?;
        }
        trace!(children = root.children.len(), "marshalled root structure");
        Ok(Document::with_root(root))
    }

    fn serialize_structure(&self, element: &Element, depth: usize) -> Result<XmlElement> {
        let (id, body) = match &element.ty {
            Type::Complex(ty) => (self.id_of(&element.ty), Some(Arc::clone(ty))),
            Type::Reference(id) if self.config.resolve_definitions => {
                (Some(id.clone()), Some(self.resolve_complex(id)?))
            }
            Type::Reference(id) => (Some(id.clone()), None),
            Type::Simple(_) => {
                return Err(Error::unsupported(format!(
                    "'{}' has a simple type and can not be written as a structure",
                    element.name
                )))
            }
        };

        let mut target = XmlElement::new(STRUCTURE);
        target.set_attribute(NAME, element.name.as_str());

        // a referenced definition carries its own supertype
        let properties = if id.is_some() && !self.config.resolve_definitions {
            element.properties.without(Property::SuperType)
        } else {
            element.properties.clone()
        };
        self.write_attributes(&mut target, &properties.without(Property::Name))?;

        let wrapped = body.as_ref().and_then(|b| b.wrapped.clone());
        if let Some(wrapped) = &wrapped {
            target.set_attribute(TYPE, self.scalars.identifier_of(wrapped));
        }

        match (&id, &body) {
            (Some(id), _) if !self.config.resolve_definitions => {
                target.set_attribute(DEFINITION, id.as_str());
            }
            (_, Some(body)) => {
                let mut cursor = 0;
                self.serialize_into(&mut target, body, &mut cursor, depth)?;
            }
            (_, None) => {
                return Err(Error::unresolved(format!(
                    "structure '{}' has no body to write",
                    element.name
                )))
            }
        }

        if let Some(wrapped) = &wrapped {
            self.write_enumerations(&mut target, wrapped, element.enumeration())?;
        }
        Ok(target)
    }

    /// Write the supertype, children and groups of `ty` into `target`.
    ///
    /// `cursor` is the position after the last attribute member written so
    /// far, shared with inlined supertypes so their attributes stay in front.
    fn serialize_into(
        &self,
        target: &mut XmlElement,
        ty: &ComplexType,
        cursor: &mut usize,
        depth: usize,
    ) -> Result<()> {
        self.config.limits.check_depth(depth)?;
        self.write_super_type(target, &ty.super_type, cursor, depth)?;

        for child in ty.children() {
            match &child.ty {
                Type::Simple(simple) => {
                    let member = self.serialize_simple(child, simple)?;
                    if child.is_attribute() {
                        target.insert_child(*cursor, member);
                        *cursor += 1;
                    } else {
                        target.add_child(member);
                    }
                }
                _ => target.add_child(self.serialize_structure(child, depth + 1)?),
            }
        }

        for group in ty.groups() {
            target.add_child(self.serialize_group(group)?);
        }
        Ok(())
    }

    fn write_super_type(
        &self,
        target: &mut XmlElement,
        super_type: &SuperType,
        cursor: &mut usize,
        depth: usize,
    ) -> Result<()> {
        let ty = match super_type {
            SuperType::None => return Ok(()),
            SuperType::ByReference(id) | SuperType::Inline(Type::Reference(id)) => {
                return self.write_super_reference(target, id, cursor, depth)
            }
            SuperType::Inline(ty) => ty,
        };

        if self.config.resolve_extensions {
            match ty {
                Type::Simple(simple) => {
                    target.set_attribute(TYPE, self.scalars.identifier_of(simple));
                    return Ok(());
                }
                Type::Complex(complex) => {
                    return self.serialize_into(target, complex, cursor, depth + 1)
                }
                Type::Reference(_) => {}
            }
        }
        match self.id_of(ty) {
            Some(id) => {
                target.set_attribute(SUPER_TYPE, id);
                Ok(())
            }
            None => self.unreferenceable_super_type(&describe(ty)),
        }
    }

    /// Global id of a type, asking the registry first when there is one
    fn id_of(&self, ty: &Type) -> Option<String> {
        self.registry
            .as_ref()
            .and_then(|registry| registry.id_of(ty))
            .or_else(|| ty.defined_id().map(str::to_string))
    }

    fn write_super_reference(
        &self,
        target: &mut XmlElement,
        id: &str,
        cursor: &mut usize,
        depth: usize,
    ) -> Result<()> {
        if self.config.resolve_extensions {
            match self.registry.as_ref().and_then(|r| r.resolve(id)) {
                Some(Type::Complex(complex)) => {
                    return self.serialize_into(target, &complex, cursor, depth + 1)
                }
                Some(Type::Simple(simple)) => {
                    target.set_attribute(TYPE, self.scalars.identifier_of(&simple));
                    return Ok(());
                }
                _ => debug!(super_type = id, "super type can not be inlined, writing a reference"),
            }
        }
        target.set_attribute(SUPER_TYPE, id);
        Ok(())
    }

    fn unreferenceable_super_type(&self, description: &str) -> Result<()> {
        if self.config.ignore_unknown_super_types {
            debug!(super_type = description, "skipping super type without a global id");
            return Ok(());
        }
        Err(Error::unresolved(format!(
            "can not reference the super type {} as it has no global id",
            description
        )))
    }

    fn serialize_simple(&self, element: &Element, ty: &SimpleType) -> Result<XmlElement> {
        let tag = if element.is_attribute() { ATTRIBUTE } else { FIELD };
        let mut target = XmlElement::new(tag);
        target.set_attribute(NAME, element.name.as_str());
        self.write_attributes(&mut target, &element.properties.without(Property::Name))?;
        target.set_attribute(TYPE, self.scalars.identifier_of(ty));
        self.write_enumerations(&mut target, ty, element.enumeration())?;
        Ok(target)
    }

    fn serialize_group(&self, group: &Group) -> Result<XmlElement> {
        let mut target = XmlElement::new(GROUP);
        self.write_attributes(&mut target, &group.properties)?;
        target.set_attribute(TYPE, group.kind.identifier());
        for name in &group.members {
            let mut member = XmlElement::new(MEMBER);
            member.set_attribute(NAME, name.as_str());
            target.add_child(member);
        }
        Ok(target)
    }

    fn write_attributes(&self, target: &mut XmlElement, values: &Properties) -> Result<()> {
        for (property, value) in values.iter() {
            // enumerations are written as child elements
            if property == Property::Enumeration {
                continue;
            }
            let text = match (property, value) {
                (Property::MaxOccurs, Value::Integer(0)) => Ok(UNBOUNDED.to_string()),
                _ => self.converter.to_text(value),
            };
            match text {
                Ok(text) => target.set_attribute(property.name(), text),
                Err(_) if self.is_droppable(property) => {
                    trace!(property = property.name(), "dropping value without textual form");
                }
                Err(e) => {
                    return Err(Error::conversion(format!(
                        "could not convert the property {} to text ({})",
                        property, e
                    )))
                }
            }
        }
        Ok(())
    }

    fn is_droppable(&self, property: Property) -> bool {
        DROPPABLE_PROPERTIES.iter().any(|(droppable, policy)| {
            *droppable == property
                && match policy {
                    DropPolicy::Always => true,
                    DropPolicy::WhenIgnoringUnknownSuperTypes => {
                        self.config.ignore_unknown_super_types
                    }
                }
        })
    }

    /// Write the values not already declared by the type itself
    fn write_enumerations(
        &self,
        target: &mut XmlElement,
        ty: &SimpleType,
        values: &[Value],
    ) -> Result<()> {
        let own = ty.enumeration();
        let remaining: Vec<&Value> = values.iter().filter(|v| !own.contains(v)).collect();
        if remaining.is_empty() {
            return Ok(());
        }
        if ty.marshallable_ancestor().is_none() {
            return Err(Error::MarshalCapabilityMissing(format!(
                "neither '{}' nor its supertypes can write values as text",
                ty.name
            )));
        }
        for value in remaining {
            let mut enumeration = XmlElement::new(ENUMERATION);
            enumeration.set_text(self.converter.to_text(value)?);
            target.add_child(enumeration);
        }
        Ok(())
    }

    fn resolve_complex(&self, id: &str) -> Result<Arc<ComplexType>> {
        match self.registry.as_ref().and_then(|r| r.resolve(id)) {
            Some(Type::Complex(complex)) => Ok(complex),
            Some(_) => Err(Error::unsupported(format!(
                "definition '{}' is not a complex type",
                id
            ))),
            None => Err(Error::unresolved(format!("definition '{}'", id))),
        }
    }
}

fn describe(ty: &Type) -> String {
    match ty {
        Type::Simple(simple) => simple.name.clone(),
        Type::Complex(complex) => complex
            .name
            .clone()
            .unwrap_or_else(|| "<anonymous>".to_string()),
        Type::Reference(id) => id.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;
    use crate::types::{builtin, CollectionHandler, GroupKind, MemoryRegistry, ScalarKind};

    fn compact() -> MarshalConfig {
        MarshalConfig::new().with_pretty_print(false)
    }

    fn string() -> Arc<SimpleType> {
        builtin(ScalarKind::String)
    }

    #[test]
    fn test_marshal_fields_and_attributes() {
        let mut ty = ComplexType::new().with_name("person");
        ty.add(Element::new("first", Type::Simple(string()))).unwrap();
        ty.add(
            Element::attribute("id", builtin(ScalarKind::Long))
                .with_property(Property::MinOccurs, Value::Integer(0)),
        )
        .unwrap();

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            xml,
            r#"<structure name="person"><attribute name="id" minOccurs="0" type="long"/><field name="first" type="string"/></structure>"#
        );
    }

    #[test]
    fn test_max_occurs_zero_is_unbounded() {
        let mut ty = ComplexType::new();
        ty.add(
            Element::new("tags", Type::Simple(string()))
                .with_property(Property::MaxOccurs, Value::Integer(0)),
        )
        .unwrap();
        ty.add(
            Element::new("pair", Type::Simple(string()))
                .with_property(Property::MaxOccurs, Value::Integer(2)),
        )
        .unwrap();

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert!(xml.contains(r#"<field name="tags" maxOccurs="unbounded" type="string"/>"#));
        assert!(xml.contains(r#"<field name="pair" maxOccurs="2" type="string"/>"#));
    }

    #[test]
    fn test_enumeration_subtraction() {
        let color = Arc::new(
            SimpleType::defined("example.Color", ScalarKind::String)
                .with_enumeration(vec![Value::text("A"), Value::text("B")]),
        );
        let mut ty = ComplexType::new();
        ty.add(Element::new("color", Type::Simple(color)).with_property(
            Property::Enumeration,
            Value::List(vec![Value::text("A"), Value::text("B"), Value::text("C")]),
        ))
        .unwrap();

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            xml,
            r#"<structure><field name="color" type="example.Color"><enumeration>C</enumeration></field></structure>"#
        );
    }

    #[test]
    fn test_enumeration_requires_marshallable_type() {
        let mut ty = ComplexType::new();
        ty.add(
            Element::new("handle", Type::Simple(builtin(ScalarKind::Object)))
                .with_property(Property::Enumeration, Value::List(vec![Value::text("x")])),
        )
        .unwrap();

        let err = Marshaller::default()
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::MarshalCapabilityMissing(_)));
    }

    #[test]
    fn test_defined_child_written_as_definition() {
        let mut address = ComplexType::defined("example.Address")
            .with_super_type(SuperType::ByReference("example.Location".to_string()));
        address
            .add(Element::new("street", Type::Simple(string())))
            .unwrap();
        let mut ty = ComplexType::new();
        ty.add(
            Element::new("home", Type::complex(address))
                .with_property(
                    Property::SuperType,
                    Value::Type(Type::Reference("example.Location".to_string())),
                )
                .with_property(Property::MinOccurs, Value::Integer(0)),
        )
        .unwrap();

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            xml,
            r#"<structure><structure name="home" minOccurs="0" definition="example.Address"/></structure>"#
        );
    }

    #[test]
    fn test_resolve_definitions_inlines_references() {
        let mut address = ComplexType::defined("example.Address");
        address
            .add(Element::new("street", Type::Simple(string())))
            .unwrap();
        let registry = MemoryRegistry::new()
            .with(Type::complex(address))
            .unwrap();

        let mut ty = ComplexType::new();
        ty.add(Element::new(
            "home",
            Type::Reference("example.Address".to_string()),
        ))
        .unwrap();

        let marshaller = Marshaller::new(compact().with_resolve_definitions(true))
            .with_registry(Arc::new(registry));
        let xml = marshaller.marshal_to_string(&ty, &Properties::new()).unwrap();
        assert_eq!(
            xml,
            r#"<structure><structure name="home"><field name="street" type="string"/></structure></structure>"#
        );

        let err = Marshaller::new(compact().with_resolve_definitions(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
    }

    #[test]
    fn test_super_type_reference_and_inlining() {
        let mut base = ComplexType::defined("example.Base");
        base.add(Element::attribute("id", string())).unwrap();
        base.add(Element::new("created", Type::Simple(builtin(ScalarKind::DateTime))))
            .unwrap();

        let mut ty = ComplexType::new()
            .with_super_type(SuperType::Inline(Type::complex(base)));
        ty.add(Element::new("label", Type::Simple(string()))).unwrap();
        ty.add(Element::attribute("version", string())).unwrap();

        let referenced = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            referenced,
            r#"<structure superType="example.Base"><attribute name="version" type="string"/><field name="label" type="string"/></structure>"#
        );

        let inlined = Marshaller::new(compact().with_resolve_extensions(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            inlined,
            r#"<structure><attribute name="id" type="string"/><attribute name="version" type="string"/><field name="created" type="dateTime"/><field name="label" type="string"/></structure>"#
        );
    }

    #[test]
    fn test_simple_super_type() {
        let code = Arc::new(SimpleType::defined("example.Code", ScalarKind::String));
        let ty = ComplexType::new().with_super_type(SuperType::Inline(Type::Simple(code)));

        let referenced = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(referenced, r#"<structure superType="example.Code"/>"#);

        let inlined = Marshaller::new(compact().with_resolve_extensions(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(inlined, r#"<structure type="example.Code"/>"#);

        let builtin_super =
            ComplexType::new().with_super_type(SuperType::Inline(Type::Simple(string())));
        let inlined = Marshaller::new(compact().with_resolve_extensions(true))
            .marshal_to_string(&builtin_super, &Properties::new())
            .unwrap();
        assert_eq!(inlined, r#"<structure type="string"/>"#);
    }

    #[test]
    fn test_anonymous_simple_super_type() {
        let ty = ComplexType::new().with_super_type(SuperType::Inline(Type::Simple(string())));

        let err = Marshaller::default()
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));

        let xml = Marshaller::new(compact().with_ignore_unknown_super_types(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(xml, "<structure/>");
    }

    #[test]
    fn test_simple_super_type_by_reference_inlined_through_registry() {
        let code = SimpleType::defined("example.Code", ScalarKind::String);
        let registry = MemoryRegistry::new().with(Type::simple(code)).unwrap();
        let ty = ComplexType::new()
            .with_super_type(SuperType::ByReference("example.Code".to_string()));

        let inlined = Marshaller::new(compact().with_resolve_extensions(true))
            .with_registry(Arc::new(registry))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(inlined, r#"<structure type="example.Code"/>"#);

        // without a registry the reference is kept
        let referenced = Marshaller::new(compact().with_resolve_extensions(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(referenced, r#"<structure superType="example.Code"/>"#);
    }

    /// Assigns ids to named complex types that carry none themselves
    struct NamingRegistry;

    impl TypeRegistry for NamingRegistry {
        fn resolve(&self, _id: &str) -> Option<Type> {
            None
        }

        fn id_of(&self, ty: &Type) -> Option<String> {
            match ty {
                Type::Complex(complex) => complex.name.as_ref().map(|n| format!("example.{}", n)),
                _ => None,
            }
        }
    }

    #[test]
    fn test_registry_supplies_ids() {
        let base = ComplexType::new().with_name("Base");
        let mut address = ComplexType::new().with_name("Address");
        address
            .add(Element::new("street", Type::Simple(string())))
            .unwrap();

        let mut ty = ComplexType::new().with_super_type(SuperType::Inline(Type::complex(base)));
        ty.add(Element::new("home", Type::complex(address))).unwrap();

        let xml = Marshaller::new(compact())
            .with_registry(Arc::new(NamingRegistry))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            xml,
            r#"<structure superType="example.Base"><structure name="home" definition="example.Address"/></structure>"#
        );

        // without the registry the anonymous supertype has no id
        let err = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));
    }

    #[test]
    fn test_anonymous_super_type() {
        let ty = ComplexType::new()
            .with_super_type(SuperType::Inline(Type::complex(ComplexType::new())));

        let err = Marshaller::default()
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::UnresolvedReference(_)));

        let xml = Marshaller::new(compact().with_ignore_unknown_super_types(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(xml, "<structure/>");
    }

    #[test]
    fn test_droppable_properties() {
        let anonymous = Value::Type(Type::complex(ComplexType::new()));
        let ty = ComplexType::new()
            .with_property(
                Property::CollectionHandler,
                Value::CollectionHandler(CollectionHandler::StringMap),
            )
            .with_property(Property::SuperType, anonymous.clone());

        let err = Marshaller::default()
            .marshal_to_string(&ty, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));

        let xml = Marshaller::new(compact().with_ignore_unknown_super_types(true))
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(xml, "<structure/>");

        // any other property without a textual form fails
        let ty = ComplexType::new().with_property(Property::Comment, anonymous);
        assert!(Marshaller::new(compact().with_ignore_unknown_super_types(true))
            .marshal_to_string(&ty, &Properties::new())
            .is_err());
    }

    #[test]
    fn test_groups_list_member_names() {
        let mut ty = ComplexType::new();
        ty.add(Element::new("a", Type::Simple(string()))).unwrap();
        ty.add(Element::new("b", Type::Simple(string()))).unwrap();
        ty.add_group(
            Group::new(GroupKind::Choice)
                .with_property(Property::Name, Value::text("either"))
                .with_member("a")
                .with_member("b"),
        )
        .unwrap();

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert!(xml.ends_with(
            r#"<group name="either" type="choice"><member name="a"/><member name="b"/></group></structure>"#
        ));
    }

    #[test]
    fn test_root_values_override_type_properties() {
        let ty = ComplexType::new()
            .with_name("order")
            .with_property(Property::Comment, Value::text("draft"));
        let values = Properties::new().with(Property::Comment, Value::text("final"));

        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &values)
            .unwrap();
        assert_eq!(xml, r#"<structure name="order" comment="final"/>"#);
    }

    #[test]
    fn test_wrapped_root_writes_type_and_enumerations() {
        let ty = ComplexType::new()
            .with_wrapped(builtin(ScalarKind::Integer))
            .with_property(
                Property::Enumeration,
                Value::List(vec![Value::Integer(1), Value::Integer(2)]),
            );
        let xml = Marshaller::new(compact())
            .marshal_to_string(&ty, &Properties::new())
            .unwrap();
        assert_eq!(
            xml,
            r#"<structure type="integer"><enumeration>1</enumeration><enumeration>2</enumeration></structure>"#
        );
    }

    #[test]
    fn test_self_inlining_hits_depth_limit() {
        let mut node = ComplexType::defined("example.Node");
        node.add(Element::new("next", Type::Reference("example.Node".to_string())))
            .unwrap();
        let registry = MemoryRegistry::new().with(Type::complex(node.clone())).unwrap();

        let config = compact()
            .with_resolve_definitions(true)
            .with_limits(Limits::new().with_max_depth(16));
        let err = Marshaller::new(config)
            .with_registry(Arc::new(registry))
            .marshal_to_string(&node, &Properties::new())
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_marshal_to_writer() {
        let ty = ComplexType::new().with_name("empty");
        let mut out = Vec::new();
        Marshaller::new(compact().with_xml_declaration(true))
            .marshal(&mut out, &ty, &Properties::new())
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"<?xml version="1.0" encoding="UTF-8"?><structure name="empty"/>"#
        );
    }
}
