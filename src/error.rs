//! Error types for the payroll API.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the service can run into: configuration problems,
//! rejected uploads, temporary file I/O and extractor failures.

use std::io;

use thiserror::Error;

/// The main error type for the payroll API.
///
/// # Example
///
/// ```
/// use payroll_api::error::ServiceError;
///
/// let error = ServiceError::NotAPdf {
///     filename: "notes.txt".to_string(),
/// };
/// assert_eq!(error.to_string(), "File must be a PDF");
/// ```
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value was rejected during validation.
    #[error("Invalid configuration value '{field}': {message}")]
    InvalidConfig {
        /// The offending configuration key.
        field: String,
        /// Why the value was rejected.
        message: String,
    },

    /// The uploaded file does not look like a PDF.
    #[error("File must be a PDF")]
    NotAPdf {
        /// The filename supplied by the client.
        filename: String,
    },

    /// The uploaded file had no content.
    #[error("Empty file uploaded")]
    EmptyUpload {
        /// The filename supplied by the client.
        filename: String,
    },

    /// The multipart body had no `file` field.
    #[error("Missing multipart field '{field}'")]
    MissingFileField {
        /// The expected field name.
        field: String,
    },

    /// The multipart body could not be read.
    #[error("Malformed upload: {message}")]
    MalformedUpload {
        /// The HTTP status suggested by the multipart parser.
        status: u16,
        /// The parser's description of the problem.
        message: String,
    },

    /// The temporary copy of the upload could not be written.
    #[error("Failed to write temporary file: {0}")]
    TempFile(#[source] io::Error),

    /// The extractor program could not be started.
    #[error("Failed to start extractor '{program}': {source}")]
    ExtractorSpawn {
        /// The program that was launched.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The extractor program exited unsuccessfully.
    #[error("Extractor '{program}' exited with {status}: {stderr}")]
    ExtractorFailed {
        /// The program that was launched.
        program: String,
        /// Exit status description.
        status: String,
        /// Last non-empty line of standard error.
        stderr: String,
    },

    /// The extractor produced output that is not an extraction result.
    #[error("Extractor returned invalid output: {message}")]
    ExtractorOutput {
        /// A description of the decode error.
        message: String,
    },
}

/// A type alias for Results that return ServiceError.
pub type ServiceResult<T> = Result<T, ServiceError>;
