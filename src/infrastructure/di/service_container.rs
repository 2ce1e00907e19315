//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{
    ExportService, GeonamesResolver, RegionNavigator, ResolverSettings,
};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::{HttpClient, ReqwestClient, Sleeper, ThreadSleeper};
use crate::log::{Logger, TracingLogger};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// HTTP abstraction
    pub http: Arc<dyn HttpClient>,

    /// Throttle clock
    pub sleeper: Arc<dyn Sleeper>,

    /// Log sink handed to the resolver
    pub logger: Arc<dyn Logger>,

    resolver: Arc<GeonamesResolver>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let http = ReqwestClient::new(settings.timeout()).map_err(InfraError::HttpSetup)?;
        Self::with_deps(
            settings,
            Arc::new(http),
            Arc::new(ThreadSleeper),
            Arc::new(TracingLogger),
        )
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        http: Arc<dyn HttpClient>,
        sleeper: Arc<dyn Sleeper>,
        logger: Arc<dyn Logger>,
    ) -> InfraResult<Self> {
        let resolver_settings = ResolverSettings::from_settings(&settings)?;
        let resolver = Arc::new(GeonamesResolver::new(
            resolver_settings,
            Arc::clone(&http),
            Arc::clone(&sleeper),
            Arc::clone(&logger),
        ));

        Ok(Self {
            settings: Arc::new(settings),
            http,
            sleeper,
            logger,
            resolver,
        })
    }

    pub fn resolver(&self) -> Arc<GeonamesResolver> {
        Arc::clone(&self.resolver)
    }

    /// Build the world tree; this issues one throttled request per region.
    pub fn navigator(&self) -> ApplicationResult<RegionNavigator> {
        RegionNavigator::build(self.resolver())
    }

    pub fn export_service(&self) -> ExportService {
        ExportService::new(self.settings.export.sibling_order)
    }
}
