//! # xmldefinition
//!
//! A bidirectional codec between in-memory type definitions and their XML
//! representation.
//!
//! A type definition is a tree of complex types with named fields,
//! attributes and nested structures, simple types with optional
//! enumerations, supertypes, and groups overlaying sibling members. The
//! [`Marshaller`] writes such a tree as a `<structure>` document; the
//! [`Unmarshaller`] reads it back.
//!
//! ## Features
//!
//! - Fixed-point resolution of element attributes against the properties a
//!   type supports, including properties unlocked by other property values
//! - Supertypes and external definitions written by reference or inlined
//! - Self-referential definitions through a configurable self id
//! - Enumerations written only where an instance adds to its type
//! - UTF-8, ISO-8859-1 and US-ASCII output
//! - Nesting depth and document size limits
//!
//! ## Example
//!
//! ```rust
//! use xmldefinition::types::{builtin, ComplexType, Element, Properties, Property, ScalarKind, Type, Value};
//! use xmldefinition::{MarshalConfig, Marshaller, Unmarshaller};
//!
//! let mut person = ComplexType::new().with_name("person");
//! person.add(Element::attribute("id", builtin(ScalarKind::Long)))?;
//! person.add(
//!     Element::new("nickname", Type::Simple(builtin(ScalarKind::String)))
//!         .with_property(Property::MaxOccurs, Value::Integer(0)),
//! )?;
//!
//! let marshaller = Marshaller::new(MarshalConfig::new());
//! let xml = marshaller.marshal_to_string(&person, &Properties::new())?;
//! assert!(xml.contains(r#"maxOccurs="unbounded""#));
//!
//! let parsed = Unmarshaller::default().unmarshal_str(&xml)?;
//! assert_eq!(parsed, person);
//! # Ok::<(), xmldefinition::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;
pub mod config;

// XML element tree
pub mod documents;

// Type model and collaborators
pub mod types;

// The codec
pub mod definition;

// Re-exports for convenience
pub use config::{Encoding, MarshalConfig, UnmarshalConfig};
pub use definition::{Marshaller, Unmarshaller};
pub use error::{Error, Result};
pub use limits::Limits;

/// Version of the xmldefinition library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
