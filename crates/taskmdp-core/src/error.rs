//! Error types for taskmdp

use thiserror::Error;

/// Main error type for taskmdp.
///
/// Every variant except `Serialization` is a fatal configuration error: it
/// is raised while building the catalog or the seed models and is never
/// recovered internally.
#[derive(Error, Debug)]
pub enum MdpError {
    #[error("Empty catalog: {0}")]
    EmptyCatalog(String),

    #[error("Attribute '{0}' has an empty domain")]
    EmptyDomain(String),

    #[error("Duplicate attribute: {0}")]
    DuplicateAttribute(String),

    #[error("Duplicate value '{value}' in domain of attribute '{attribute}'")]
    DuplicateValue { attribute: String, value: String },

    #[error("Duplicate action id: {0}")]
    DuplicateAction(String),

    #[error("Duplicate state: {0}")]
    DuplicateState(String),

    #[error("Invalid action category: {0}")]
    InvalidCategory(String),

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Missing attribute: {0}")]
    MissingAttribute(String),

    #[error("Value '{value}' is not in the domain of attribute '{attribute}'")]
    UnknownValue { attribute: String, value: String },

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("State catalog too large: {size} states exceeds limit of {limit}")]
    CatalogTooLarge { size: usize, limit: usize },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for taskmdp operations
pub type Result<T> = std::result::Result<T, MdpError>;
