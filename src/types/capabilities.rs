//! Supported properties per type kind
//!
//! Which properties a type accepts can depend on property values that are
//! already set: once `actualType` names a scalar kind, the properties of that
//! kind become available too. The function here is declarative over a finite
//! property universe, so repeated application reaches a fixed point.

use super::simple::ScalarKind;
use super::values::{Properties, Property, Value};

/// What a set of attributes is being resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    /// Field or attribute of a scalar kind
    Simple(ScalarKind),
    /// Structure, optionally extending a scalar kind
    Complex {
        /// Wrapped scalar kind
        wrapped: Option<ScalarKind>,
    },
    /// Group overlay
    Group,
}

/// Properties accepted on every element regardless of type
pub const ALWAYS_ACCEPTED: [Property; 4] = [
    Property::ElementQualifiedDefault,
    Property::AttributeQualifiedDefault,
    Property::Qualified,
    Property::CollectionHandler,
];

const ELEMENT_PROPERTIES: &[Property] = &[
    Property::Name,
    Property::Namespace,
    Property::MinOccurs,
    Property::MaxOccurs,
    Property::Nillable,
    Property::Comment,
];

const GROUP_PROPERTIES: &[Property] = &[Property::Name, Property::MinOccurs, Property::MaxOccurs];

/// Properties specific to a scalar kind
pub fn scalar_properties(kind: ScalarKind) -> &'static [Property] {
    match kind {
        ScalarKind::String => &[
            Property::Pattern,
            Property::Length,
            Property::MinLength,
            Property::MaxLength,
            Property::ActualType,
        ],
        ScalarKind::Integer | ScalarKind::Long | ScalarKind::Double => {
            &[Property::MinInclusive, Property::MaxInclusive]
        }
        ScalarKind::Decimal => &[
            Property::MinInclusive,
            Property::MaxInclusive,
            Property::TotalDigits,
            Property::FractionDigits,
        ],
        ScalarKind::Date | ScalarKind::DateTime => &[Property::Format, Property::Timezone],
        ScalarKind::Bytes => &[Property::Length, Property::MinLength, Property::MaxLength],
        ScalarKind::Boolean | ScalarKind::Uri | ScalarKind::Object => &[],
    }
}

/// Properties supported by a type kind, given the values resolved so far
pub fn supported_properties(kind: TypeKind, resolved: &Properties) -> Vec<Property> {
    let mut supported: Vec<Property> = Vec::new();
    let mut push_all = |properties: &[Property], supported: &mut Vec<Property>| {
        for property in properties {
            if !supported.contains(property) {
                supported.push(*property);
            }
        }
    };

    match kind {
        TypeKind::Simple(scalar) => {
            push_all(ELEMENT_PROPERTIES, &mut supported);
            push_all(scalar_properties(scalar), &mut supported);
        }
        TypeKind::Complex { wrapped } => {
            push_all(ELEMENT_PROPERTIES, &mut supported);
            if let Some(scalar) = wrapped {
                push_all(scalar_properties(scalar), &mut supported);
            }
        }
        TypeKind::Group => push_all(GROUP_PROPERTIES, &mut supported),
    }

    if supported.contains(&Property::ActualType) {
        if let Some(actual) = resolved
            .get(Property::ActualType)
            .and_then(Value::as_text)
            .and_then(ScalarKind::from_identifier)
        {
            push_all(scalar_properties(actual), &mut supported);
        }
    }

    supported
}
