//! Application services

pub mod builder;
pub mod export;
pub mod navigator;
pub mod resolver;

pub use builder::TreeBuilder;
pub use export::{ExportService, ReportSummary};
pub use navigator::RegionNavigator;
pub use resolver::{ChildResolver, GeonamesResolver, ResolverSettings};
