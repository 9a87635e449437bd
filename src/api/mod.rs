//! HTTP API module for the payroll service.
//!
//! This module provides the REST endpoints: the payroll upload, the health
//! check and the generated documentation pages.

mod docs;
mod handlers;
mod response;
mod state;
mod upload;

pub use docs::openapi_document;
pub use handlers::{EXTRACT_PAYROLL_PATH, HEALTH_PATH, create_router};
pub use response::{ApiError, ApiErrorResponse, HealthResponse};
pub use state::AppState;
pub use upload::{DEFAULT_FILENAME, FILE_FIELD, is_pdf_filename};
