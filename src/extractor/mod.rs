//! The boundary to the payroll extractor.
//!
//! The service never parses PDFs itself. It hands the path of a temporary
//! copy of the upload to a [`PayrollExtractor`] chosen at startup and
//! returns whatever that extractor produced.

mod command;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ServiceResult;
use crate::models::ExtractionResult;

pub use command::CommandExtractor;

/// Turns a payslip PDF on disk into structured payroll records.
///
/// Implementations must not keep the path beyond the call: the file is
/// deleted as soon as `extract` returns.
#[async_trait]
pub trait PayrollExtractor: Send + Sync {
    /// Extracts every payroll record found in the PDF at `path`.
    ///
    /// Returning `Ok(ExtractionResult::Failed(..))` means the extractor ran
    /// and rejected the document; `Err` means it could not run at all.
    async fn extract(&self, path: &Path) -> ServiceResult<ExtractionResult>;
}

/// Shared handle to an extractor.
pub type SharedExtractor = Arc<dyn PayrollExtractor>;
