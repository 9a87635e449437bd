//! HTTP request handlers for the payroll API.
//!
//! This module contains the router and the handler functions for all
//! API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartRejection},
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::CorsConfig;
use crate::error::{ServiceError, ServiceResult};
use crate::models::ExtractionResult;
use crate::request_log::LogEntry;

use super::docs::{self, OPENAPI_PATH};
use super::response::{ApiError, ApiErrorResponse, HealthResponse, STATUS_OK};
use super::state::AppState;
use super::upload::{DEFAULT_FILENAME, Upload, read_upload, stage_upload};

/// Route of the health check.
pub const HEALTH_PATH: &str = "/health";

/// Route of the payroll upload endpoint.
pub const EXTRACT_PAYROLL_PATH: &str = "/extract/payroll";

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    let config = state.config();
    let cors = cors_layer(&config.cors);
    let body_limit = DefaultBodyLimit::max(config.server.max_upload_bytes);

    Router::new()
        .route(HEALTH_PATH, get(health_handler))
        .route(EXTRACT_PAYROLL_PATH, post(extract_payroll_handler))
        .route(OPENAPI_PATH, get(docs::openapi_handler))
        .route("/docs", get(docs::swagger_ui_handler))
        .route("/redoc", get(docs::redoc_handler))
        .layer(body_limit)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Builds the CORS layer from the configured allow-list.
///
/// Methods and headers are mirrored from the preflight request because a
/// wildcard may not be combined with credentials. Origins that are not
/// valid header values are skipped with a warning.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "Skipping invalid CORS origin");
                None
            }
        })
        .collect::<Vec<_>>();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
}

/// Handler for GET /health endpoint.
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: STATUS_OK.to_string(),
        timestamp: Local::now().to_rfc3339(),
    })
}

/// Handler for POST /extract/payroll endpoint.
///
/// Accepts a multipart upload with a `file` field, runs the extractor on a
/// temporary copy and returns the extracted records.
async fn extract_payroll_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    let start_time = Instant::now();
    info!(correlation_id = %correlation_id, "Processing payroll upload");

    let upload = match multipart {
        Ok(mut multipart) => read_upload(&mut multipart).await,
        Err(rejection) => Err(ServiceError::MalformedUpload {
            status: rejection.status().as_u16(),
            message: rejection.body_text(),
        }),
    };

    let Upload { filename, bytes } = match upload {
        Ok(upload) => upload,
        Err(err) => {
            let filename = match &err {
                ServiceError::NotAPdf { filename } | ServiceError::EmptyUpload { filename } => {
                    filename.clone()
                }
                _ => DEFAULT_FILENAME.to_string(),
            };
            warn!(
                correlation_id = %correlation_id,
                filename = %filename,
                error = %err,
                "Upload rejected"
            );
            state
                .request_log()
                .record(&LogEntry::error(
                    EXTRACT_PAYROLL_PATH,
                    &filename,
                    err.to_string(),
                ))
                .await;
            return ApiErrorResponse::from(err).into_response();
        }
    };

    let size_bytes = bytes.len();
    match run_extraction(&state, bytes, correlation_id).await {
        Ok(ExtractionResult::Failed(failure)) => {
            warn!(
                correlation_id = %correlation_id,
                filename = %filename,
                error = %failure.error_message,
                "Extractor rejected document"
            );
            state
                .request_log()
                .record(&LogEntry::error(
                    EXTRACT_PAYROLL_PATH,
                    &filename,
                    &failure.error_message,
                ))
                .await;
            ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::for_file(failure.error_message, filename),
            }
            .into_response()
        }
        Ok(result) => {
            if let Err(err) = result.typed_records() {
                debug!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Extractor output does not fit the payslip schema, returning it as is"
                );
            }
            info!(
                correlation_id = %correlation_id,
                filename = %filename,
                size_bytes,
                employee_count = result.employee_count(),
                duration_us = start_time.elapsed().as_micros(),
                "Successfully extracted payroll data"
            );
            state
                .request_log()
                .record(&LogEntry::success(EXTRACT_PAYROLL_PATH, &filename))
                .await;
            (StatusCode::OK, Json(result)).into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                filename = %filename,
                error = %err,
                "Extraction failed"
            );
            let api_error = ApiErrorResponse::from(err).with_filename(&filename);
            state
                .request_log()
                .record(&LogEntry::error(
                    EXTRACT_PAYROLL_PATH,
                    &filename,
                    &api_error.error.error_message,
                ))
                .await;
            api_error.into_response()
        }
    }
}

/// Stages the upload on disk, runs the extractor and removes the file.
///
/// The staged file is removed before this returns whatever the extractor
/// did. If the future is dropped mid-extraction the file handle's drop
/// removes it instead.
async fn run_extraction(
    state: &AppState,
    bytes: axum::body::Bytes,
    correlation_id: Uuid,
) -> ServiceResult<ExtractionResult> {
    let staged = stage_upload(&state.temp_dir(), bytes).await?;
    let temp_path = staged.path().to_path_buf();
    debug!(
        correlation_id = %correlation_id,
        temp_path = %temp_path.display(),
        "Staged upload"
    );

    let result = state.extractor().extract(&temp_path).await;

    match staged.close() {
        Ok(()) => debug!(
            correlation_id = %correlation_id,
            temp_path = %temp_path.display(),
            "Cleaned up temporary file"
        ),
        Err(err) => warn!(
            correlation_id = %correlation_id,
            temp_path = %temp_path.display(),
            error = %err,
            "Failed to remove temporary file"
        ),
    }

    result
}
