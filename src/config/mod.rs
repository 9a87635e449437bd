//! Configuration loading and management for the payroll API.
//!
//! The listen address, upload limit, CORS allow-list, request log path and
//! extractor command are process-wide settings. They are collected in a
//! [`ServiceConfig`] built once at startup and handed to the router.
//!
//! # Example
//!
//! ```no_run
//! use payroll_api::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/payroll-api.yaml").unwrap();
//! println!("Extractor: {}", config.config().extractor.program);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CorsConfig, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, ExtractorConfig, LoggingConfig,
    ServerConfig, ServiceConfig,
};
