//! Injected dependencies for the page reducers.

use crate::config::PageConfig;
use eventdesk_core::environment::{Clock, Navigator};
use std::sync::Arc;

/// Environment shared by every page component
#[derive(Clone)]
pub struct PageEnvironment {
    /// Wall clock used for countdowns and toast ids
    pub clock: Arc<dyn Clock>,
    /// Page navigation used by booking redirects
    pub navigator: Arc<dyn Navigator>,
    /// Timings and feature switches
    pub config: PageConfig,
}

impl PageEnvironment {
    /// Create an environment with the default configuration
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            clock,
            navigator,
            config: PageConfig::default(),
        }
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }
}

impl std::fmt::Debug for PageEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageEnvironment")
            .field("now", &self.clock.now())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Navigator that only logs where the page would go
///
/// Used by the demo binary, where there is no browser to leave the page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNavigator;

impl Navigator for LoggingNavigator {
    fn navigate(&self, url: &str) {
        tracing::info!(url, "Navigating away from page");
    }
}
