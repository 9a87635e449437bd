//! Payroll record model and related types.
//!
//! This module defines [`PayrollRecord`], [`LineItem`] and [`PaySlipSummary`],
//! the per-employee payslip data produced by an extractor. Every value is
//! kept exactly as printed on the payslip (`"1 234,50"`, `"2024-05-25"`).
//! Nothing here parses or sums amounts.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One pay-component row of a payslip (a "lönepost").
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Salary type code (lönart), e.g. `"11"`.
    #[serde(default)]
    pub lonart: String,
    /// Description (benämning), e.g. `"Månadslön"`.
    #[serde(default)]
    pub benamning: String,
    /// Quantity (antal).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub antal: Option<String>,
    /// Unit amount (à-pris).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a_pris: Option<String>,
    /// Line total (belopp).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub belopp: Option<String>,
    /// The period the line refers to, when it differs from the pay period.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
}

/// Summary block at the foot of a payslip.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaySlipSummary {
    /// Tax base (skatteunderlag).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skatteunderlag: Option<String>,
    /// Employer fee (arbetsgivaravgift).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arbetsgivaravgift: Option<String>,
    /// Gross pay (bruttolön).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bruttolon: Option<String>,
    /// Net pay (nettolön).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nettolon: Option<String>,
    /// Any further summary fields the extractor emitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One employee's extracted payslip for a pay period.
///
/// This is a typed view over the raw JSON an extractor returns; the upload
/// endpoint never sends records through it. Fields this type does not name
/// are captured in `extra`.
///
/// # Example
///
/// ```
/// use payroll_api::models::PayrollRecord;
///
/// let json = r#"{
///     "anstallningsnr": "1042",
///     "namn": "Anna Andersson",
///     "loneposter": [
///         {"lonart": "11", "benamning": "Månadslön", "belopp": "32 500,00"}
///     ],
///     "lonebesked": {"nettolon": "24 310,00"}
/// }"#;
///
/// let record: PayrollRecord = serde_json::from_str(json).unwrap();
/// assert_eq!(record.anstallningsnr, "1042");
/// assert_eq!(record.loneposter.len(), 1);
/// assert_eq!(record.lonebesked.nettolon.as_deref(), Some("24 310,00"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollRecord {
    /// Employee number (anställningsnummer).
    pub anstallningsnr: String,
    /// Employee name.
    #[serde(default)]
    pub namn: String,
    /// Pay period as printed, e.g. `"2024-05-01 - 2024-05-31"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loneperiod: Option<String>,
    /// Payment date as printed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utbetalningsdatum: Option<String>,
    /// Pay-component rows in document order.
    #[serde(default)]
    pub loneposter: Vec<LineItem>,
    /// Free-text message printed on the payslip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meddelande: Option<String>,
    /// Summary block.
    #[serde(default)]
    pub lonebesked: PaySlipSummary,
    /// Any further fields the extractor emitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
