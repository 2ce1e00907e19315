//! Domain layer: region model and tree
//!
//! This layer is independent of external concerns (no I/O, no HTTP, no config loading).

pub mod arena;
pub mod entities;
pub mod error;

pub use arena::{Level, RegionNode, RegionTree, TreeIterator, TreeStats};
pub use entities::*;
pub use error::{DomainError, DomainResult};
