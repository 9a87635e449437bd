//! Payroll API
//!
//! This crate provides an HTTP service that accepts payslip PDFs, hands
//! them to an external payroll extractor and returns the extracted
//! records as JSON.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod request_log;
pub mod telemetry;
