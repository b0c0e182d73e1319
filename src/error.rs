//! Error types for xmldefinition
//!
//! Every failure in the codec is terminal for the current marshal or
//! unmarshal call. The variants follow the failure classes of the codec:
//! conversion, reference resolution, structure, leftover input and missing
//! marshal capability, plus the I/O and XML layers underneath.

use thiserror::Error;

/// Result type alias using the xmldefinition Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for definition marshalling and unmarshalling
#[derive(Error, Debug)]
pub enum Error {
    /// A property value could not be converted to or from text
    #[error("conversion error: {0}")]
    Conversion(String),

    /// A supertype, definition or scalar kind identifier could not be resolved
    #[error("unresolved reference: {0}")]
    UnresolvedReference(String),

    /// The document or model has a shape the codec does not support
    #[error("unsupported structure: {0}")]
    UnsupportedStructure(String),

    /// Attributes remained after property resolution reached its fixed point
    #[error("unknown attributes found on '{element}': {attributes:?}")]
    UnconsumedInput {
        /// Tag of the element carrying the attributes
        element: String,
        /// Attribute names that no supported property consumed
        attributes: Vec<String>,
    },

    /// Enumeration values must be written but no type in the chain supports text
    #[error("can not marshal enumeration values: {0}")]
    MarshalCapabilityMissing(String),

    /// Output could not be represented in the requested encoding
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing or writing error
    #[error("XML error: {0}")]
    Xml(String),
}

impl Error {
    /// Shorthand for a conversion failure
    pub fn conversion(message: impl Into<String>) -> Self {
        Error::Conversion(message.into())
    }

    /// Shorthand for an unresolved reference
    pub fn unresolved(message: impl Into<String>) -> Self {
        Error::UnresolvedReference(message.into())
    }

    /// Shorthand for an unsupported structure
    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedStructure(message.into())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
