//! Core data models for the payroll API.
//!
//! This module contains the payslip records an extractor produces and the
//! result envelope the upload endpoint returns.

mod extraction_result;
mod payroll_record;

pub use extraction_result::{
    ExtractionFailure, ExtractionResult, FAILURE_STATUS, PayrollRecords, UNKNOWN_EXTRACTION_ERROR,
};
pub use payroll_record::{LineItem, PaySlipSummary, PayrollRecord};
