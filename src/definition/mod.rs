//! XML definition codec
//!
//! The [`Marshaller`] writes a complex type as a `<structure>` document, the
//! [`Unmarshaller`] reads such a document back into a complex type. Both
//! speak the same grammar:
//!
//! ```xml
//! <structure name="person" superType="example.Party">
//!     <attribute name="id" type="long"/>
//!     <field name="status" type="string">
//!         <enumeration>ACTIVE</enumeration>
//!     </field>
//!     <structure name="address" definition="example.Address"/>
//!     <group type="choice">
//!         <member name="status"/>
//!     </group>
//! </structure>
//! ```

mod attributes;
mod marshaller;
mod unmarshaller;

pub use attributes::AttributeResolver;
pub use marshaller::{DropPolicy, Marshaller, DROPPABLE_PROPERTIES};
pub use unmarshaller::Unmarshaller;

/// Complex type container
pub const STRUCTURE: &str = "structure";
/// Simple member
pub const FIELD: &str = "field";
/// Attribute member
pub const ATTRIBUTE: &str = "attribute";
/// Enumeration value
pub const ENUMERATION: &str = "enumeration";
/// Group overlay
pub const GROUP: &str = "group";
/// Group member reference
pub const MEMBER: &str = "member";

/// Member or group name
pub const NAME: &str = "name";
/// Scalar kind, or group kind on a group
pub const TYPE: &str = "type";
/// Reference to an externally defined complex type
pub const DEFINITION: &str = "definition";
/// Reference to a supertype
pub const SUPER_TYPE: &str = "superType";

/// Textual form of the unbounded maxOccurs sentinel
pub const UNBOUNDED: &str = "unbounded";
