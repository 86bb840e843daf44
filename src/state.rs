//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::report::{FontSupport, ReportGenerator};

/// Shared application state.
///
/// Immutable after startup; each request builds its own document.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    reports: ReportGenerator,
}

impl AppState {
    /// Create application state, probing the script font once
    pub fn new(config: Config) -> Self {
        let fonts = FontSupport::probe(&config.reports.font_path);
        Self::with_fonts(config, fonts)
    }

    /// Create application state with an already resolved font capability
    pub fn with_fonts(config: Config, fonts: FontSupport) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                reports: ReportGenerator::new(fonts),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the report generator
    pub fn reports(&self) -> &ReportGenerator {
        &self.inner.reports
    }
}
