//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file and validating it before startup.

use std::fs;
use std::path::Path;

use axum::http::HeaderValue;

use crate::error::{ServiceError, ServiceResult};

use super::types::ServiceConfig;

/// Loads and validates the service configuration.
///
/// # Example
///
/// ```no_run
/// use payroll_api::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/payroll-api.yaml").unwrap();
/// println!("Listening on {}", loader.config().socket_addr());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ServiceConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing or unreadable
    /// - The file contains invalid YAML or unknown value types
    /// - A value fails validation (see [`ConfigLoader::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> ServiceResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ServiceError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config: ServiceConfig =
            serde_yaml::from_str(&content).map_err(|e| ServiceError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Self::from_config(config)
    }

    /// Wraps an already-built configuration after validating it.
    pub fn from_config(config: ServiceConfig) -> ServiceResult<Self> {
        Self::validate(&config)?;
        Ok(Self { config })
    }

    /// Checks values that would otherwise only fail once the server runs.
    pub fn validate(config: &ServiceConfig) -> ServiceResult<()> {
        if config.extractor.program.trim().is_empty() {
            return Err(ServiceError::InvalidConfig {
                field: "extractor.program".to_string(),
                message: "must not be empty".to_string(),
            });
        }

        if config.server.max_upload_bytes == 0 {
            return Err(ServiceError::InvalidConfig {
                field: "server.max_upload_bytes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        for origin in &config.cors.allowed_origins {
            if origin.trim().is_empty() || HeaderValue::from_str(origin).is_err() {
                return Err(ServiceError::InvalidConfig {
                    field: "cors.allowed_origins".to_string(),
                    message: format!("'{}' is not a valid origin", origin),
                });
            }
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> ServiceConfig {
        self.config
    }
}
