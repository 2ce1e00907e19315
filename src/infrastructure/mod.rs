//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements the HTTP and clock boundaries, XML decoding, atomic
//! file output, and wires up services.

pub mod di;
pub mod error;
pub mod fs;
pub mod traits;
pub mod xml;

pub use error::{InfraError, InfraResult};
