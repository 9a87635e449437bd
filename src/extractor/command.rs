//! Extractor that shells out to an external program.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ExtractorConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::ExtractionResult;

use super::PayrollExtractor;

/// Runs `program args... <pdf path>` and decodes its stdout as an
/// [`ExtractionResult`].
///
/// A non-zero exit is an extraction error carrying the last non-empty line
/// of stderr; the full stderr is only logged.
///
/// # Example
///
/// ```
/// use payroll_api::config::ExtractorConfig;
/// use payroll_api::extractor::CommandExtractor;
///
/// let extractor = CommandExtractor::from_config(&ExtractorConfig::default());
/// assert_eq!(extractor.program(), "python3");
/// ```
#[derive(Debug, Clone)]
pub struct CommandExtractor {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
}

impl CommandExtractor {
    /// Creates an extractor for `program` with no extra arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
        }
    }

    /// Creates an extractor from the `extractor` configuration section.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
            working_dir: config.working_dir.clone(),
        }
    }

    /// Appends an argument placed before the PDF path.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the working directory of the spawned program.
    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Returns the program this extractor runs.
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }
        command
    }
}

#[async_trait]
impl PayrollExtractor for CommandExtractor {
    async fn extract(&self, path: &Path) -> ServiceResult<ExtractionResult> {
        debug!(program = %self.program, path = %path.display(), "Running extractor");

        let output = self
            .command(path)
            .output()
            .await
            .map_err(|source| ServiceError::ExtractorSpawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(
                program = %self.program,
                status = %output.status,
                stderr = %stderr.trim(),
                "Extractor exited unsuccessfully"
            );
            return Err(ServiceError::ExtractorFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: last_line(&stderr).to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|e| ServiceError::ExtractorOutput {
            message: e.to_string(),
        })
    }
}

fn last_line(stderr: &str) -> &str {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    // `cat <path>` echoes the "PDF" back, so the fixture's content stands in
    // for the extractor's stdout.
    fn fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_decodes_records_from_stdout() {
        let pdf = fixture(
            r#"{"1042": {"anstallningsnr": "1042", "namn": "Anna Andersson",
                "loneposter": [{"lonart": "11", "benamning": "Månadslön", "belopp": "32 500,00"}]}}"#,
        );

        let result = CommandExtractor::new("cat").extract(pdf.path()).await.unwrap();

        match result {
            ExtractionResult::Records(records) => {
                assert_eq!(records["1042"]["namn"], "Anna Andersson");
                assert_eq!(records["1042"]["loneposter"][0]["lonart"], "11");
            }
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_decodes_reported_failure() {
        let pdf = fixture(r#"{"status": "error", "error_message": "No payslip found"}"#);

        let result = CommandExtractor::new("cat").extract(pdf.path()).await.unwrap();

        assert!(result.is_failure());
    }

    #[tokio::test]
    async fn test_non_json_output_is_an_output_error() {
        let pdf = fixture("%PDF-1.7 not json");

        let result = CommandExtractor::new("cat").extract(pdf.path()).await;

        assert!(matches!(result, Err(ServiceError::ExtractorOutput { .. })));
    }

    #[tokio::test]
    async fn test_non_zero_exit_captures_stderr() {
        let pdf = fixture("{}");

        let result = CommandExtractor::new("sh")
            .arg("-c")
            .arg("echo 'extractor exploded' >&2; exit 3")
            .extract(pdf.path())
            .await;

        match result {
            Err(ServiceError::ExtractorFailed { stderr, status, .. }) => {
                assert_eq!(stderr, "extractor exploded");
                assert!(status.contains('3'));
            }
            other => panic!("expected ExtractorFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_only_last_stderr_line_is_kept() {
        let pdf = fixture("{}");

        let result = CommandExtractor::new("sh")
            .arg("-c")
            .arg(r#"printf 'Traceback (most recent call last):\n  File "/srv/x.py", line 2\nValueError: boom\n\n' >&2; exit 1"#)
            .extract(pdf.path())
            .await;

        match result {
            Err(ServiceError::ExtractorFailed { stderr, .. }) => {
                assert_eq!(stderr, "ValueError: boom");
            }
            other => panic!("expected ExtractorFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_program_is_a_spawn_error() {
        let pdf = fixture("{}");

        let result = CommandExtractor::new("payroll-extractor-does-not-exist")
            .extract(pdf.path())
            .await;

        assert!(matches!(result, Err(ServiceError::ExtractorSpawn { .. })));
    }

    #[tokio::test]
    async fn test_path_is_passed_as_last_argument() {
        let pdf = fixture("ignored");
        let dir = tempfile::tempdir().unwrap();

        // $0 is "extract", $1 is the PDF path.
        let result = CommandExtractor::new("sh")
            .arg("-c")
            .arg(r#"printf '{"%s": {"anstallningsnr": "%s"}}' "$(pwd)" "$1""#)
            .arg("extract")
            .working_dir(dir.path())
            .extract(pdf.path())
            .await
            .unwrap();

        let ExtractionResult::Records(records) = result else {
            panic!("expected records");
        };
        let (cwd, record) = records.into_iter().next().unwrap();
        assert_eq!(
            std::fs::canonicalize(cwd).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
        assert_eq!(record["anstallningsnr"], pdf.path().display().to_string());
    }

    fn python_available() -> bool {
        std::process::Command::new("python3")
            .arg("--version")
            .output()
            .is_ok_and(|output| output.status.success())
    }

    // Lays out an `extractor.extract_payroll` module for the default bridge.
    fn python_extractor(body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let package = dir.path().join("extractor");
        std::fs::create_dir(&package).unwrap();
        std::fs::write(package.join("__init__.py"), "").unwrap();
        std::fs::write(package.join("extract_payroll.py"), body).unwrap();
        dir
    }

    fn default_bridge(dir: &Path) -> CommandExtractor {
        CommandExtractor::from_config(&ExtractorConfig {
            working_dir: Some(dir.to_path_buf()),
            ..ExtractorConfig::default()
        })
    }

    #[tokio::test]
    async fn test_default_bridge_reports_exception_message_only() {
        if !python_available() {
            return;
        }
        let dir = python_extractor(
            "def extract_payroll(path):\n    raise ValueError('payslip table missing')\n",
        );
        let pdf = fixture("%PDF-1.7");

        let err = default_bridge(dir.path())
            .extract(pdf.path())
            .await
            .unwrap_err();

        assert!(matches!(
            &err,
            ServiceError::ExtractorFailed { stderr, .. } if stderr == "payslip table missing"
        ));
        let response = crate::api::ApiErrorResponse::from(err);
        assert_eq!(
            response.error.error_message,
            "Unexpected error: payslip table missing"
        );
    }

    #[tokio::test]
    async fn test_default_bridge_passes_output_through() {
        if !python_available() {
            return;
        }
        let dir = python_extractor(
            "def extract_payroll(path):\n    return {\n        '2001': {'anstallningsnr': '2001', 'namn': None, 'antal': 1.0},\n        '1042': {'anstallningsnr': '1042', 'namn': 'Anna Andersson'},\n    }\n",
        );
        let pdf = fixture("%PDF-1.7");

        let result = default_bridge(dir.path()).extract(pdf.path()).await.unwrap();

        let ExtractionResult::Records(records) = result else {
            panic!("expected records");
        };
        let keys: Vec<&str> = records.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2001", "1042"]);
        assert!(records["2001"]["namn"].is_null());
        assert_eq!(records["2001"]["antal"], serde_json::json!(1.0));
    }
}
