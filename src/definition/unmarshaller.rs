//! Reads XML definitions back into complex types

use super::{
    AttributeResolver, ATTRIBUTE, DEFINITION, ENUMERATION, FIELD, GROUP, MEMBER, NAME,
    STRUCTURE, SUPER_TYPE, TYPE,
};
use crate::config::UnmarshalConfig;
use crate::documents::{Document, XmlElement};
use crate::error::{Error, Result};
use crate::types::{
    BuiltinScalars, ComplexType, DefaultConverter, Element, Group, GroupKind, MemoryRegistry,
    Properties, Property, ScalarKindRegistry, SimpleType, SuperType, Type, TypeKind, TypeRegistry,
    Value, ValueConverter,
};
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

/// Unmarshals XML definitions into complex types.
///
/// An unmarshaller keeps the references it ignored during its last run, so
/// it takes `&mut self` and should not be shared between concurrent calls.
pub struct Unmarshaller {
    config: UnmarshalConfig,
    converter: Arc<dyn ValueConverter>,
    scalars: Arc<dyn ScalarKindRegistry>,
    types: Arc<dyn TypeRegistry>,
    ignored_references: Vec<String>,
}

impl Default for Unmarshaller {
    fn default() -> Self {
        Self::new(UnmarshalConfig::default())
    }
}

impl Unmarshaller {
    /// Create an unmarshaller with the default converter, built-in scalars
    /// and an empty type registry
    pub fn new(config: UnmarshalConfig) -> Self {
        Self {
            config,
            converter: Arc::new(DefaultConverter::new()),
            scalars: Arc::new(BuiltinScalars::new()),
            types: Arc::new(MemoryRegistry::new()),
            ignored_references: Vec::new(),
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

    /// Resolve definitions and supertypes through a registry
    pub fn with_types(mut self, types: Arc<dyn TypeRegistry>) -> Self {
        self.types = types;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &UnmarshalConfig {
        &self.config
    }

    /// Definition ids skipped during the last run because they could not be
    /// resolved
    pub fn ignored_references(&self) -> &[String] {
        &self.ignored_references
    }

    /// Unmarshal from a reader
    pub fn unmarshal<R: Read>(&mut self, input: R) -> Result<ComplexType> {
        let limit = self.config.limits.max_document_size;
        let mut buffer = Vec::new();
        input
            .take((limit as u64).saturating_add(1))
            .read_to_end(&mut buffer)?;
        self.config.limits.check_document_size(buffer.len())?;
        self.unmarshal_bytes(&buffer)
    }

    /// Unmarshal from bytes
    pub fn unmarshal_bytes(&mut self, xml: &[u8]) -> Result<ComplexType> {
        let document = Document::parse_with_limits(xml, &self.config.limits)?;
        self.unmarshal_document(&document)
    }

    /// Unmarshal from a string
    pub fn unmarshal_str(&mut self, xml: &str) -> Result<ComplexType> {
        self.unmarshal_bytes(xml.as_bytes())
    }

    /// Unmarshal a file, refusing files above the document size limit
    pub fn unmarshal_file(&mut self, path: impl AsRef<Path>) -> Result<ComplexType> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        self.config
            .limits
            .check_document_size(usize::try_from(size).unwrap_or(usize::MAX))?;
        let xml = std::fs::read(path)?;
        self.unmarshal_bytes(&xml)
    }

    /// Unmarshal a parsed document into a new root type.
    ///
    /// The root carries the configured self id, so references to it from
    /// inside the document compare equal to it.
    pub fn unmarshal_document(&mut self, document: &Document) -> Result<ComplexType> {
        let mut root = ComplexType::new();
        root.id = self.config.self_id.clone();
        self.unmarshal_into(document, &mut root)?;
        Ok(root)
    }

    /// Populate an existing type from a parsed document
    pub fn unmarshal_into(&mut self, document: &Document, target: &mut ComplexType) -> Result<()> {
        self.ignored_references.clear();
        let element = document
            .root()
            .ok_or_else(|| Error::Xml("document has no root element".to_string()))?;
        if element.name() != STRUCTURE {
            return Err(Error::unsupported(format!(
                "root element must be '{}', found '{}'",
                STRUCTURE,
                element.name()
            )));
        }

        if let Some(identifier) = attribute(element, TYPE) {
            target.wrapped = Some(self.scalar_of(identifier)?);
        }
        if let Some(super_type) = self.super_type(element)? {
            target.super_type = super_type;
        }

        let mut properties = self.resolver().resolve(element, target.kind(), &[SUPER_TYPE, TYPE])?;
        if let Some(Value::Text(name)) = properties.remove(Property::Name) {
            target.name = Some(name);
        }
        target.properties.extend(properties);

        let enumerations = self.populate(element, target, 1)?;
        if !enumerations.is_empty() {
            target
                .properties
                .set(Property::Enumeration, Value::List(enumerations));
        }
        Ok(())
    }

    fn resolver(&self) -> AttributeResolver<'_> {
        AttributeResolver::new(self.converter.as_ref(), self.config.ignore_unknown)
    }

    /// Add the children of `element` to `target`, returning the enumeration
    /// values found for a wrapping structure
    fn populate(
        &mut self,
        element: &XmlElement,
        target: &mut ComplexType,
        depth: usize,
    ) -> Result<Vec<Value>> {
        self.config.limits.check_depth(depth)?;
        let mut enumerations = Vec::new();

        for child in &element.children {
            match child.name() {
                STRUCTURE => self.unmarshal_structure(child, target, depth)?,
                FIELD | ATTRIBUTE => self.unmarshal_simple(child, target)?,
                GROUP => self.unmarshal_group(child, target)?,
                ENUMERATION => match &target.wrapped {
                    Some(wrapped) => enumerations.push(
                        self.converter
                            .from_text(child.text_content(), wrapped.kind.value_kind())?,
                    ),
                    None => {
                        return Err(Error::unsupported(
                            "enumeration on a structure that wraps no scalar kind",
                        ))
                    }
                },
                other => return Err(Error::unsupported(format!("invalid tag '{}'", other))),
            }
        }
        Ok(enumerations)
    }

    fn unmarshal_structure(
        &mut self,
        element: &XmlElement,
        parent: &mut ComplexType,
        depth: usize,
    ) -> Result<()> {
        // a definition is a reference to an existing type, not a declaration
        if let Some(id) = attribute(element, DEFINITION) {
            let reference = match self.resolve_definition(id)? {
                Some(reference) => reference,
                None if self.config.ignore_unknown => {
                    debug!(definition = id, "ignoring unresolved definition");
                    self.ignored_references.push(id.to_string());
                    return Ok(());
                }
                None => return Err(Error::unresolved(format!("definition '{}'", id))),
            };
            let properties =
                self.resolver()
                    .resolve(element, reference.kind(), &[DEFINITION, SUPER_TYPE, TYPE])?;
            let (name, properties) = take_name(element, properties)?;
            trace!(name = name.as_str(), definition = id, "referenced structure");
            return parent.add(Element::new(name, reference).with_properties(properties));
        }

        let mut structure = ComplexType::new();
        if let Some(identifier) = attribute(element, TYPE) {
            structure.wrapped = Some(self.scalar_of(identifier)?);
        }
        if let Some(super_type) = self.super_type(element)? {
            structure.super_type = super_type;
        }

        let properties = self
            .resolver()
            .resolve(element, structure.kind(), &[TYPE, SUPER_TYPE])?;
        let (name, mut properties) = take_name(element, properties)?;
        let enumerations = self.populate(element, &mut structure, depth + 1)?;
        if !enumerations.is_empty() {
            properties.set(Property::Enumeration, Value::List(enumerations));
        }

        trace!(name = name.as_str(), children = structure.len(), "unmarshalled structure");
        parent.add(Element::new(name, Type::complex(structure)).with_properties(properties))
    }

    fn unmarshal_simple(&mut self, element: &XmlElement, parent: &mut ComplexType) -> Result<()> {
        let tag = element.name();
        if element.has_attribute(SUPER_TYPE) {
            return Err(Error::unsupported(format!(
                "supertypes are only supported on structures, not on '{}'",
                tag
            )));
        }
        let identifier = attribute(element, TYPE)
            .ok_or_else(|| Error::unsupported(format!("'{}' element is missing its type", tag)))?;
        let simple = self.scalar_of(identifier)?;

        let properties = self.resolver().resolve(
            element,
            TypeKind::Simple(simple.kind),
            &[TYPE, SUPER_TYPE],
        )?;
        let (name, mut properties) = take_name(element, properties)?;
        let enumerations = self.unmarshal_enumerations(element, &simple)?;
        if !enumerations.is_empty() {
            properties.set(Property::Enumeration, Value::List(enumerations));
        }

        let member = if tag == ATTRIBUTE {
            Element::attribute(name, simple)
        } else {
            Element::new(name, Type::Simple(simple))
        };
        parent.add(member.with_properties(properties))
    }

    fn unmarshal_enumerations(&self, element: &XmlElement, ty: &SimpleType) -> Result<Vec<Value>> {
        let kind = ty.kind.value_kind();
        element
            .children
            .iter()
            .map(|child| {
                if child.name() != ENUMERATION {
                    return Err(Error::unsupported(format!(
                        "unexpected tag '{}' in '{}'",
                        child.name(),
                        element.name()
                    )));
                }
                self.converter.from_text(child.text_content(), kind)
            })
            .collect()
    }

    fn unmarshal_group(&mut self, element: &XmlElement, parent: &mut ComplexType) -> Result<()> {
        let identifier = attribute(element, TYPE)
            .ok_or_else(|| Error::unsupported("group is missing its type"))?;
        let kind = GroupKind::from_identifier(identifier)
            .ok_or_else(|| Error::unsupported(format!("unknown group type '{}'", identifier)))?;

        let properties = self.resolver().resolve(element, TypeKind::Group, &[TYPE])?;
        let mut group = Group::new(kind).with_properties(properties);
        for member in &element.children {
            if member.name() != MEMBER {
                return Err(Error::unsupported(format!(
                    "unexpected tag '{}' in group",
                    member.name()
                )));
            }
            let name = attribute(member, NAME)
                .ok_or_else(|| Error::unsupported("group member is missing its name"))?;
            group.members.push(name.to_string());
        }
        parent.add_group(group)
    }

    /// The self id stands for the type under construction, which no registry
    /// knows yet
    fn is_self(&self, id: &str) -> bool {
        self.config.self_id.as_deref() == Some(id)
    }

    fn super_type(&self, element: &XmlElement) -> Result<Option<SuperType>> {
        let Some(id) = attribute(element, SUPER_TYPE) else {
            return Ok(None);
        };
        if self.is_self(id) {
            return Ok(Some(SuperType::ByReference(id.to_string())));
        }
        self.types
            .resolve(id)
            .map(|ty| Some(SuperType::Inline(ty)))
            .ok_or_else(|| Error::unresolved(format!("super type '{}'", id)))
    }

    fn resolve_definition(&self, id: &str) -> Result<Option<Type>> {
        if self.is_self(id) {
            return Ok(Some(Type::Reference(id.to_string())));
        }
        match self.types.resolve(id) {
            Some(Type::Simple(_)) => Err(Error::unsupported(format!(
                "definition '{}' is not a complex type",
                id
            ))),
            resolved => Ok(resolved),
        }
    }

    fn scalar_of(&self, identifier: &str) -> Result<Arc<SimpleType>> {
        self.scalars
            .by_name(identifier)
            .or_else(|| self.scalars.by_raw_identifier(identifier))
            .ok_or_else(|| Error::unresolved(format!("scalar kind '{}'", identifier)))
    }
}

/// Attribute value, treating an empty value as absent
fn attribute<'a>(element: &'a XmlElement, name: &str) -> Option<&'a str> {
    element.get_attribute(name).filter(|value| !value.is_empty())
}

fn take_name(element: &XmlElement, mut properties: Properties) -> Result<(String, Properties)> {
    match properties.remove(Property::Name) {
        Some(Value::Text(name)) => Ok((name, properties)),
        _ => Err(Error::unsupported(format!(
            "'{}' element is missing its name",
            element.name()
        ))),
    }
}
