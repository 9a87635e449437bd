//! Extraction result models.
//!
//! An extractor either returns a mapping from employee number to payslip
//! record or a failure object of the shape
//! `{"status": "error", "error_message": ..., "filename": ...}`.
//!
//! Records are kept as raw JSON so the upload endpoint returns them exactly
//! as the extractor produced them, key order and `null`s included.
//! [`ExtractionResult::typed_records`] offers the [`PayrollRecord`] view.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Map, Value};

use super::PayrollRecord;

/// `status` value that marks a failure object.
pub const FAILURE_STATUS: &str = "error";

/// Message used when a failure object carries no `error_message`.
pub const UNKNOWN_EXTRACTION_ERROR: &str = "Unknown extraction error";

/// Extracted records keyed by employee number, in extractor order.
pub type PayrollRecords = Map<String, Value>;

fn unknown_extraction_error() -> String {
    UNKNOWN_EXTRACTION_ERROR.to_string()
}

/// A failure reported by the extractor itself rather than raised.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    /// Always `"error"` for failure objects.
    pub status: String,
    /// Human-readable reason.
    #[serde(default = "unknown_extraction_error")]
    pub error_message: String,
    /// The file the extractor was working on, if it said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// The outcome of running an extractor over one document.
///
/// Any JSON object whose `status` is the string `"error"` is a failure;
/// every other object is the records mapping. Serializes untagged so the
/// success case is the bare mapping.
///
/// # Example
///
/// ```
/// use payroll_api::models::ExtractionResult;
///
/// let ok: ExtractionResult =
///     serde_json::from_str(r#"{"1042": {"anstallningsnr": "1042"}}"#).unwrap();
/// assert_eq!(ok.employee_count(), 1);
///
/// let failed: ExtractionResult =
///     serde_json::from_str(r#"{"status": "error", "error_message": "no table"}"#).unwrap();
/// assert!(failed.is_failure());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    /// The extractor gave up and said why.
    Failed(ExtractionFailure),
    /// Records keyed by employee number.
    Records(PayrollRecords),
}

impl ExtractionResult {
    /// Returns true if the extractor reported a failure object.
    pub fn is_failure(&self) -> bool {
        matches!(self, ExtractionResult::Failed(_))
    }

    /// Number of employee records, zero for a failure.
    pub fn employee_count(&self) -> usize {
        match self {
            ExtractionResult::Failed(_) => 0,
            ExtractionResult::Records(records) => records.len(),
        }
    }

    /// Decodes the records as [`PayrollRecord`]s.
    ///
    /// Fails if any record does not fit the payslip schema. A failure
    /// object has no records.
    pub fn typed_records(&self) -> serde_json::Result<BTreeMap<String, PayrollRecord>> {
        match self {
            ExtractionResult::Failed(_) => Ok(BTreeMap::new()),
            ExtractionResult::Records(records) => records
                .iter()
                .map(|(key, record)| {
                    PayrollRecord::deserialize(record).map(|record| (key.clone(), record))
                })
                .collect(),
        }
    }
}

impl TryFrom<Value> for ExtractionResult {
    type Error = serde_json::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(object) = value else {
            return Err(de::Error::invalid_type(
                de::Unexpected::Other(json_type(&value)),
                &"a JSON object",
            ));
        };

        if object.get("status").and_then(Value::as_str) == Some(FAILURE_STATUS) {
            serde_json::from_value(Value::Object(object)).map(ExtractionResult::Failed)
        } else {
            Ok(ExtractionResult::Records(object))
        }
    }
}

impl<'de> Deserialize<'de> for ExtractionResult {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        ExtractionResult::try_from(value).map_err(de::Error::custom)
    }
}

impl From<PayrollRecords> for ExtractionResult {
    fn from(records: PayrollRecords) -> Self {
        ExtractionResult::Records(records)
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_deserialize_as_mapping() {
        let value = json!({
            "1042": {"anstallningsnr": "1042", "namn": "Anna Andersson"},
            "2001": {"anstallningsnr": "2001", "namn": "Bo Berg"}
        });

        let result: ExtractionResult = serde_json::from_value(value).unwrap();

        match result {
            ExtractionResult::Records(records) => {
                assert_eq!(records.len(), 2);
                assert_eq!(records["2001"]["namn"], "Bo Berg");
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_object_deserializes_as_failure() {
        let value = json!({
            "status": "error",
            "error_message": "Could not locate payslip header",
            "filename": "/tmp/payroll-abc.pdf"
        });

        let result: ExtractionResult = serde_json::from_value(value).unwrap();

        assert!(result.is_failure());
        assert_eq!(result.employee_count(), 0);
    }

    #[test]
    fn test_failure_without_message_uses_unknown_error() {
        let result: ExtractionResult =
            serde_json::from_str(r#"{"status": "error", "filename": "x"}"#).unwrap();

        match result {
            ExtractionResult::Failed(failure) => {
                assert_eq!(failure.error_message, UNKNOWN_EXTRACTION_ERROR);
                assert_eq!(failure.filename.as_deref(), Some("x"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_employee_keyed_status_is_still_a_record() {
        // An employee number that happens to be "status" must not be
        // mistaken for a failure object.
        let value = json!({
            "status": {"anstallningsnr": "status"}
        });

        let result: ExtractionResult = serde_json::from_value(value).unwrap();
        assert!(!result.is_failure());
        assert_eq!(result.employee_count(), 1);
    }

    #[test]
    fn test_records_round_trip_unchanged() {
        let raw = r#"{"2001":{"anstallningsnr":"2001","namn":null,"antal":1.0,"loneposter":[]},"1042":{"meddelande":null}}"#;

        let result: ExtractionResult = serde_json::from_str(raw).unwrap();
        let out = serde_json::to_string(&result).unwrap();

        assert_eq!(out, raw);
    }

    #[test]
    fn test_typed_records_view() {
        let result: ExtractionResult = serde_json::from_value(json!({
            "1042": {"anstallningsnr": "1042", "namn": "Anna Andersson"}
        }))
        .unwrap();

        let typed = result.typed_records().unwrap();
        assert_eq!(typed["1042"].namn, "Anna Andersson");
    }

    #[test]
    fn test_typed_records_rejects_off_schema_record() {
        let result: ExtractionResult =
            serde_json::from_value(json!({"1042": {"namn": "Anna"}})).unwrap();

        assert!(result.typed_records().is_err());
        assert_eq!(result.employee_count(), 1);
    }

    #[test]
    fn test_empty_mapping_is_empty_records() {
        let result: ExtractionResult = serde_json::from_value(json!({})).unwrap();
        assert_eq!(result, ExtractionResult::Records(PayrollRecords::new()));
    }

    #[test]
    fn test_records_serialize_without_wrapper() {
        let mut records = PayrollRecords::new();
        records.insert("1042".to_string(), json!({"anstallningsnr": "1042"}));

        let out = serde_json::to_value(ExtractionResult::from(records)).unwrap();

        assert_eq!(out["1042"]["anstallningsnr"], json!("1042"));
        assert!(out.get("Records").is_none());
    }

    #[test]
    fn test_non_object_output_is_rejected() {
        let result: Result<ExtractionResult, _> = serde_json::from_value(json!(["1042"]));
        assert!(result.is_err());
    }
}
