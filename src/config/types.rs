//! Configuration types for the payroll API.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML service configuration. Every section
//! falls back to its defaults when omitted.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Default request body cap (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Python snippet that bridges to the external `extract_payroll` function and
/// prints its result as JSON on stdout. The PDF path arrives as `sys.argv[1]`.
///
/// Exceptions are reduced to their message on stderr so a traceback never
/// reaches a client.
const PYTHON_BRIDGE: &str = "import json, sys
try:
    from extractor.extract_payroll import extract_payroll
    result = extract_payroll(sys.argv[1])
except Exception as e:
    print(e, file=sys.stderr)
    sys.exit(1)
json.dump(result, sys.stdout, ensure_ascii=False)
";

/// Listener and upload settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind.
    pub host: IpAddr,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
    /// Directory for temporary upload copies; the system temp dir when unset.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            temp_dir: None,
        }
    }
}

/// Cross-origin settings for the browser frontend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to call the API.
    pub allowed_origins: Vec<String>,
    /// Whether cookies and auth headers may be sent cross-origin.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://127.0.0.1:3001".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

/// Log destinations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Append-only file receiving one line per request.
    pub request_log: PathBuf,
    /// `tracing` filter used when neither the CLI nor `RUST_LOG` sets one.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            request_log: PathBuf::from("outbox/api_log.txt"),
            filter: "info,tower_http=warn".to_string(),
        }
    }
}

/// How to invoke the external payroll extractor.
///
/// The PDF path is appended as the final argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Program to run.
    pub program: String,
    /// Arguments placed before the PDF path.
    pub args: Vec<String>,
    /// Working directory for the program.
    pub working_dir: Option<PathBuf>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: "python3".to_string(),
            args: vec!["-c".to_string(), PYTHON_BRIDGE.to_string()],
            working_dir: Some(PathBuf::from("../payroll-extractor")),
        }
    }
}

/// The complete service configuration.
///
/// # Example
///
/// ```
/// use payroll_api::config::ServiceConfig;
///
/// let config = ServiceConfig::default();
/// assert_eq!(config.socket_addr().port(), 8000);
/// assert_eq!(config.cors.allowed_origins.len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener and upload settings.
    pub server: ServerConfig,
    /// Cross-origin settings.
    pub cors: CorsConfig,
    /// Log destinations.
    pub logging: LoggingConfig,
    /// Extractor invocation.
    pub extractor: ExtractorConfig,
}

impl ServiceConfig {
    /// Returns the address the server should bind.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }
}
