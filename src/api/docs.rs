//! Interactive API documentation.
//!
//! `/openapi.json` serves a static OpenAPI 3 document; `/docs` and `/redoc`
//! are thin HTML pages that render it with Swagger UI and ReDoc.

use axum::{Json, response::Html};
use serde_json::{Value, json};

/// Route serving the OpenAPI document.
pub const OPENAPI_PATH: &str = "/openapi.json";

const SWAGGER_UI_PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Payroll API - Swagger UI</title>
  <meta charset="utf-8"/>
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

const REDOC_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <title>Payroll API - ReDoc</title>
  <meta charset="utf-8"/>
</head>
<body>
  <redoc spec-url="/openapi.json"></redoc>
  <script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>
"#;

/// Builds the OpenAPI description of the service.
pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Payroll API",
            "description": "Extracts structured payroll data from payslip PDF files",
            "version": env!("CARGO_PKG_VERSION"),
            "license": { "name": "MIT" }
        },
        "paths": {
            "/health": health_path(),
            "/extract/payroll": extract_payroll_path()
        },
        "components": { "schemas": schemas() }
    })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/ApiError" }))
    })
}

fn health_path() -> Value {
    json!({
        "get": {
            "summary": "Health check",
            "responses": {
                "200": {
                    "description": "Service is up",
                    "content": json_content(json!({ "$ref": "#/components/schemas/HealthResponse" }))
                }
            }
        }
    })
}

fn extract_payroll_path() -> Value {
    let upload_schema = json!({
        "type": "object",
        "required": ["file"],
        "properties": { "file": { "type": "string", "format": "binary" } }
    });
    let records_schema = json!({
        "type": "object",
        "additionalProperties": { "$ref": "#/components/schemas/PayrollRecord" }
    });

    json!({
        "post": {
            "summary": "Extract payroll data from an uploaded PDF",
            "requestBody": {
                "required": true,
                "content": { "multipart/form-data": { "schema": upload_schema } }
            },
            "responses": {
                "200": {
                    "description": "Payroll records keyed by employee number",
                    "content": json_content(records_schema)
                },
                "400": error_response("Not a PDF, empty, or malformed upload"),
                "413": error_response("Upload exceeds the size limit"),
                "422": error_response("The extractor rejected the document"),
                "500": error_response("The extractor failed")
            }
        }
    })
}

fn string_properties(names: &[&str]) -> Value {
    let properties = names
        .iter()
        .map(|name| (name.to_string(), json!({ "type": "string" })))
        .collect::<serde_json::Map<_, _>>();
    Value::Object(properties)
}

fn schemas() -> Value {
    let mut record_properties = string_properties(&[
        "anstallningsnr",
        "namn",
        "loneperiod",
        "utbetalningsdatum",
        "meddelande",
    ]);
    record_properties["loneposter"] = json!({
        "type": "array",
        "items": { "$ref": "#/components/schemas/LineItem" }
    });
    record_properties["lonebesked"] = json!({ "$ref": "#/components/schemas/PaySlipSummary" });

    json!({
        "HealthResponse": {
            "type": "object",
            "properties": {
                "status": { "type": "string", "example": "ok" },
                "timestamp": { "type": "string", "format": "date-time" }
            }
        },
        "ApiError": {
            "type": "object",
            "required": ["status", "error_message"],
            "properties": string_properties(&["status", "error_message", "filename"])
        },
        "LineItem": {
            "type": "object",
            "properties": string_properties(&[
                "lonart", "benamning", "antal", "a_pris", "belopp", "period"
            ])
        },
        "PaySlipSummary": {
            "type": "object",
            "properties": string_properties(&[
                "skatteunderlag", "arbetsgivaravgift", "bruttolon", "nettolon"
            ])
        },
        "PayrollRecord": {
            "type": "object",
            "required": ["anstallningsnr"],
            "properties": record_properties
        }
    })
}

/// Handler for GET /openapi.json.
pub async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

/// Handler for GET /docs.
pub async fn swagger_ui_handler() -> Html<&'static str> {
    Html(SWAGGER_UI_PAGE)
}

/// Handler for GET /redoc.
pub async fn redoc_handler() -> Html<&'static str> {
    Html(REDOC_PAGE)
}
