//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::SearchService;
use crate::config::Settings;
use crate::domain::EntryParser;
use crate::infrastructure::error::InfraResult;
use crate::infrastructure::traits::{FormTransport, HttpTransport};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Network abstraction
    pub transport: Arc<dyn FormTransport>,
}

impl ServiceContainer {
    /// Create a new service container with the real HTTP transport.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let transport = HttpTransport::new(&settings)?;
        Ok(Self::with_deps(settings, Arc::new(transport)))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, transport: Arc<dyn FormTransport>) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            transport,
        }
    }

    /// Search service configured from settings.
    ///
    /// The parser is built per call, so a bad selector surfaces only when searching.
    pub fn search_service(&self) -> InfraResult<SearchService> {
        let parser = EntryParser::new(&self.settings.results_selector, self.settings.parse_mode)
            .map_err(crate::application::ApplicationError::from)?;
        Ok(SearchService::new(
            Arc::clone(&self.transport),
            self.settings.endpoint.clone(),
            parser,
        ))
    }
}
