//! The type-definition model
//!
//! Simple and complex types, their elements and groups, the properties they
//! carry, and the registries and converter the codec resolves them through.

mod capabilities;
mod complex;
mod convert;
mod registry;
mod simple;
mod values;

pub use capabilities::{scalar_properties, supported_properties, TypeKind, ALWAYS_ACCEPTED};
pub use complex::{ComplexType, Element, ElementKind, Group, GroupKind, SuperType, Type};
pub use convert::{DefaultConverter, ValueConverter, DATE_FORMAT};
pub use registry::{builtin, BuiltinScalars, MemoryRegistry, ScalarKindRegistry, TypeRegistry};
pub use simple::{ScalarKind, SimpleType};
pub use values::{CollectionHandler, Pattern, Properties, Property, Value, ValueKind};
