//! Application state for the payroll API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ServiceConfig;
use crate::extractor::{PayrollExtractor, SharedExtractor};
use crate::request_log::RequestLog;

/// Shared application state.
///
/// Built once at startup. The extractor is injected here instead of being
/// looked up at request time, so tests and deployments choose it freely.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServiceConfig>,
    extractor: SharedExtractor,
    request_log: Arc<RequestLog>,
}

impl AppState {
    /// Creates the application state from a configuration and an extractor.
    pub fn new(config: ServiceConfig, extractor: impl PayrollExtractor + 'static) -> Self {
        Self::with_shared_extractor(config, Arc::new(extractor))
    }

    /// Creates the application state around an already shared extractor.
    pub fn with_shared_extractor(config: ServiceConfig, extractor: SharedExtractor) -> Self {
        let request_log = RequestLog::new(config.logging.request_log.clone());
        Self {
            config: Arc::new(config),
            extractor,
            request_log: Arc::new(request_log),
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the payroll extractor.
    pub fn extractor(&self) -> &dyn PayrollExtractor {
        self.extractor.as_ref()
    }

    /// Returns the request log.
    pub fn request_log(&self) -> &RequestLog {
        &self.request_log
    }

    /// Directory temporary upload copies are written to.
    pub fn temp_dir(&self) -> PathBuf {
        self.config
            .server
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Path of the request log file.
    pub fn request_log_path(&self) -> &Path {
        self.request_log.path()
    }
}
