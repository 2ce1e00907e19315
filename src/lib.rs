//! Three-level world region tree built from the GeoNames web service.
//!
//! Earth → continents → countries → administrative subdivisions, fetched one
//! throttled request at a time and exported as text or graph descriptions.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod log;
pub mod util;

pub use application::services::{
    ChildResolver, ExportService, GeonamesResolver, RegionNavigator, TreeBuilder,
};
pub use domain::{Coordinate, Region, RegionTree, EARTH_ID};
