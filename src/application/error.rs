//! Application-level errors (wraps domain errors)

use thiserror::Error;

use crate::domain::{DomainError, GeonameId};
use crate::infrastructure::traits::TransportError;

/// Application errors wrap domain errors and add remote-service and export context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("geonames request for region {region_id} failed: {source}")]
    Transport {
        region_id: GeonameId,
        #[source]
        source: TransportError,
    },

    #[error("cannot decode geonames response for region {region_id}: {message}")]
    Decode {
        region_id: GeonameId,
        message: String,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("export failed: {context}")]
    Export {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
