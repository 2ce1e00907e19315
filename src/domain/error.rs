//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::GeonameId;

/// Domain errors represent violations of the region model.
/// These are independent of transport concerns.
#[derive(Error, Debug, PartialEq)]
pub enum DomainError {
    #[error("could not find any region with id == {0} in the region tree")]
    RegionNotFound(GeonameId),

    #[error("invalid geoname record, field '{field}': {reason}")]
    InvalidRecord { field: &'static str, reason: String },

    #[error("parent node is not part of this tree")]
    UnknownNode,

    #[error("unknown sibling order '{0}' (expected received, id or name)")]
    InvalidSiblingOrder(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
