//! Type and scalar kind registries
//!
//! The codec never constructs defined types itself. It looks them up through
//! a [`TypeRegistry`] by global id, and looks up the simple type behind a
//! `type` attribute through a [`ScalarKindRegistry`].

use super::complex::Type;
use super::simple::{ScalarKind, SimpleType};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// Resolves global ids to defined types
pub trait TypeRegistry: Send + Sync {
    /// Resolve a global id
    fn resolve(&self, id: &str) -> Option<Type>;

    /// Global id of a type
    fn id_of(&self, ty: &Type) -> Option<String> {
        ty.defined_id().map(str::to_string)
    }
}

/// In-memory registry of defined types
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistry {
    types: IndexMap<String, Type>,
}

impl MemoryRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a defined type under its global id, replacing any previous one
    pub fn register(&mut self, ty: Type) -> Result<()> {
        if matches!(ty, Type::Reference(_)) {
            return Err(Error::unsupported(
                "a type reference can not be registered as a definition",
            ));
        }
        let id = ty
            .defined_id()
            .ok_or_else(|| Error::unsupported("only types with a global id can be registered"))?
            .to_string();
        self.types.insert(id, ty);
        Ok(())
    }

    /// Builder-style register
    pub fn with(mut self, ty: Type) -> Result<Self> {
        self.register(ty)?;
        Ok(self)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl TypeRegistry for MemoryRegistry {
    fn resolve(&self, id: &str) -> Option<Type> {
        self.types.get(id).cloned()
    }
}

/// Maps `type` attribute values to simple types
pub trait ScalarKindRegistry: Send + Sync {
    /// Look up by name or alias
    fn by_name(&self, name: &str) -> Option<Arc<SimpleType>>;

    /// Look up by raw scalar kind identifier
    fn by_raw_identifier(&self, identifier: &str) -> Option<Arc<SimpleType>>;

    /// Identifier written for a simple type: its global id when defined,
    /// otherwise its scalar kind
    fn identifier_of(&self, ty: &SimpleType) -> String {
        ty.id()
            .map(str::to_string)
            .unwrap_or_else(|| ty.kind.identifier().to_string())
    }
}

static BUILTINS: Lazy<Vec<Arc<SimpleType>>> = Lazy::new(|| {
    ScalarKind::ALL
        .iter()
        .map(|kind| Arc::new(SimpleType::builtin(*kind)))
        .collect()
});

const ALIASES: &[(&str, ScalarKind)] = &[
    ("str", ScalarKind::String),
    ("text", ScalarKind::String),
    ("int", ScalarKind::Integer),
    ("i64", ScalarKind::Long),
    ("bool", ScalarKind::Boolean),
    ("float", ScalarKind::Double),
    ("f64", ScalarKind::Double),
    ("uri", ScalarKind::Uri),
    ("url", ScalarKind::Uri),
    ("bytes", ScalarKind::Bytes),
    ("binary", ScalarKind::Bytes),
    ("datetime", ScalarKind::DateTime),
    ("timestamp", ScalarKind::DateTime),
    ("any", ScalarKind::Object),
];

/// Built-in type for a scalar kind
pub fn builtin(kind: ScalarKind) -> Arc<SimpleType> {
    BUILTINS
        .iter()
        .find(|ty| ty.kind == kind)
        .cloned()
        .unwrap_or_else(|| Arc::new(SimpleType::builtin(kind)))
}

/// Built-in scalar kinds, their aliases, and registered defined simple types
#[derive(Debug, Clone, Default)]
pub struct BuiltinScalars {
    defined: IndexMap<String, Arc<SimpleType>>,
}

impl BuiltinScalars {
    /// Create a registry with only the built-in kinds
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a defined simple type, resolvable by name through its id
    pub fn register(&mut self, ty: SimpleType) -> Result<Arc<SimpleType>> {
        let id = ty
            .id()
            .ok_or_else(|| Error::unsupported("only simple types with a global id can be registered"))?
            .to_string();
        let ty = Arc::new(ty);
        self.defined.insert(id, Arc::clone(&ty));
        Ok(ty)
    }
}

impl ScalarKindRegistry for BuiltinScalars {
    fn by_name(&self, name: &str) -> Option<Arc<SimpleType>> {
        if let Some(ty) = self.defined.get(name) {
            return Some(Arc::clone(ty));
        }
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, kind)| builtin(*kind))
    }

    fn by_raw_identifier(&self, identifier: &str) -> Option<Arc<SimpleType>> {
        ScalarKind::from_identifier(identifier).map(builtin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::complex::ComplexType;
    use crate::types::values::Value;

    #[test]
    fn test_memory_registry() {
        let mut registry = MemoryRegistry::new();
        registry
            .register(Type::complex(ComplexType::defined("example.Address")))
            .unwrap();
        assert_eq!(registry.len(), 1);

        let resolved = registry.resolve("example.Address").unwrap();
        assert_eq!(registry.id_of(&resolved).as_deref(), Some("example.Address"));
        assert!(registry.resolve("example.Missing").is_none());
    }

    #[test]
    fn test_memory_registry_rejects_anonymous() {
        let mut registry = MemoryRegistry::new();
        assert!(registry.register(Type::complex(ComplexType::new())).is_err());
        assert!(registry
            .register(Type::Reference("example.Node".to_string()))
            .is_err());
    }

    #[test]
    fn test_aliases_then_raw_identifiers() {
        let scalars = BuiltinScalars::new();
        assert_eq!(scalars.by_name("str").unwrap().kind, ScalarKind::String);
        assert_eq!(scalars.by_name("timestamp").unwrap().kind, ScalarKind::DateTime);
        assert!(scalars.by_name("dateTime").is_none());
        assert_eq!(
            scalars.by_raw_identifier("dateTime").unwrap().kind,
            ScalarKind::DateTime
        );
        assert!(scalars.by_raw_identifier("java.lang.String").is_none());
    }

    #[test]
    fn test_defined_simple_types_resolve_by_id() {
        let mut scalars = BuiltinScalars::new();
        let color = SimpleType::defined("example.Color", ScalarKind::String)
            .with_enumeration(vec![Value::text("RED")]);
        scalars.register(color).unwrap();

        let resolved = scalars.by_name("example.Color").unwrap();
        assert_eq!(resolved.enumeration(), &[Value::text("RED")]);
        assert_eq!(scalars.identifier_of(&resolved), "example.Color");
        assert_eq!(scalars.identifier_of(&builtin(ScalarKind::Bytes)), "base64Binary");
    }

    #[test]
    fn test_builtins_are_shared() {
        assert!(Arc::ptr_eq(
            &builtin(ScalarKind::Long),
            &builtin(ScalarKind::Long)
        ));
    }
}
