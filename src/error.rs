// src/error.rs

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use std::fmt;
use validator::ValidationErrors;

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request (failed write)
    BadRequest(String),

    // 400 Bad Request: body is not the declared JSON shape.
    // `details` names the offending field when one can be identified.
    InvalidBody {
        message: String,
        details: Option<Value>,
    },

    // 400 Bad Request with per-field details
    ValidationError(ValidationErrors),

    // 404 Not Found
    NotFound(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InternalServerError(msg) => write!(f, "internal error: {msg}"),
            AppError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            AppError::InvalidBody { message, .. } => write!(f, "invalid body: {message}"),
            AppError::ValidationError(errors) => write!(f, "validation failed: {errors}"),
            AppError::NotFound(msg) => write!(f, "not found: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts the error into a JSON response with the matching HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::InvalidBody { message, details } => {
                let body = match details {
                    Some(details) => json!({ "error": message, "details": details }),
                    None => json!({ "error": message }),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "details": errors,
                }),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
        };

        (status, Json(body)).into_response()
    }
}

/// Converts `sqlx::Error` into `AppError::InternalServerError`.
/// Write paths map store failures to `BadRequest` explicitly instead.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

/// Body could not be read as the declared JSON shape: syntax errors, wrong types,
/// missing fields or a missing `Content-Type: application/json`.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        let message = rejection.body_text();
        let details = match &rejection {
            JsonRejection::JsonDataError(err) => data_error_details(&err.body_text()),
            _ => None,
        };

        AppError::InvalidBody { message, details }
    }
}

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// Turns a deserialization message such as
/// `choices[0].is_correct: invalid type: string "yes", expected a boolean at line 1 column 49`
/// into `{"choices[0].is_correct": [{"code": "invalid_type", "message": ...}]}`,
/// the same layout `validator` uses for rule violations.
///
/// Returns `None` when the failure is not tied to a field (e.g. the body is an array).
fn data_error_details(text: &str) -> Option<Value> {
    let text = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(text);

    // Field paths never contain spaces; "invalid type: ..." at the root has no path.
    let (path, message) = match text.split_once(": ") {
        Some((path, rest)) if !path.is_empty() && !path.contains(' ') => (Some(path), rest),
        _ => (None, text),
    };
    let message = message
        .rsplit_once(" at line ")
        .map_or(message, |(head, _)| head);

    let missing = message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());

    let (field, code) = match (missing, path) {
        (Some(name), Some(path)) => (format!("{path}.{name}"), "missing_field"),
        (Some(name), None) => (name.to_string(), "missing_field"),
        (None, Some(path)) if message.starts_with("invalid type") => {
            (path.to_string(), "invalid_type")
        }
        (None, Some(path)) => (path.to_string(), "invalid_value"),
        (None, None) => return None,
    };

    let mut details = Map::new();
    details.insert(field, json!([{ "code": code, "message": message }]));
    Some(Value::Object(details))
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}
