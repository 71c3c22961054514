//! Error categories reported by configuration loading.

use thiserror::Error;

/// Load failure categories. Each carries the offending identifier as free
/// text; the caller decides whether to abort, warn, or continue with
/// degraded knowledge.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    /// No search-path candidate exists.
    #[error("configuration file not found")]
    FileNotFound,

    /// The document is not well-formed XML.
    #[error("malformed configuration document: {0}")]
    BadXml(String),

    /// Root element is not `<def>` or the declared format version is
    /// outside the supported range.
    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// A required attribute is missing at some nesting level.
    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    /// An attribute value failed to parse or names an unknown entity.
    #[error("bad attribute value: {0}")]
    BadAttributeValue(String),

    /// The same `define` name+value pair occurred twice.
    #[error("duplicate define: {0}")]
    DuplicateDefine(String),

    /// A platform type was redefined with identical content.
    #[error("duplicate platform type: {0}")]
    DuplicatePlatformType(String),

    /// A platform type was redefined with conflicting content.
    #[error("platform type redefined: {0}")]
    PlatformTypeRedefined(String),

    /// Unrecognized element names, batched over the whole document and
    /// comma-joined.
    #[error("unknown elements: {0}")]
    UnknownElement(String),
}
