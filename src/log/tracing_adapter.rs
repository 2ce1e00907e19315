use std::fmt::Arguments;

use crate::log::{LogLevel, Logger};

/// Logger that delegates to the `tracing` crate.
///
/// Assumes a subscriber has been installed (see `main.rs`); without one the
/// messages are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        match level {
            LogLevel::Trace => tracing::trace!(target: "regiontree::geonames", "{}", args),
            LogLevel::Debug => tracing::debug!(target: "regiontree::geonames", "{}", args),
            LogLevel::Info => tracing::info!(target: "regiontree::geonames", "{}", args),
            LogLevel::Warn => tracing::warn!(target: "regiontree::geonames", "{}", args),
            LogLevel::Error => tracing::error!(target: "regiontree::geonames", "{}", args),
        }
    }
}
