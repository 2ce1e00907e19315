//! Logging capability injected into components that talk to GeoNames.
//!
//! Components accept an `Arc<dyn Logger>` instead of reaching for a global.
//! `TracingLogger` forwards to `tracing`; `NoOpLogger` discards everything.

mod logger;
mod noop;
mod tracing_adapter;

pub use logger::{LogLevel, Logger};
pub use noop::NoOpLogger;
pub use tracing_adapter::TracingLogger;
