// HTTP response utilities for the JSON envelope
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<u64>,
    data: T,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope<'a> {
    success: bool,
    error: &'a str,
}

/// `{success: true, data}`
pub fn ok_response<T: Serialize>(data: T) -> Response {
    with_status(StatusCode::OK, data)
}

/// `{success: true, data}` with a non-200 status such as 201
pub fn with_status<T: Serialize>(status: StatusCode, data: T) -> Response {
    let body = Envelope {
        success: true,
        duration: None,
        data,
    };
    (status, Json(body)).into_response()
}

/// `{success: true, duration, data}`; duration is in milliseconds
pub fn timed_response<T: Serialize>(duration_ms: u64, data: T) -> Response {
    let body = Envelope {
        success: true,
        duration: Some(duration_ms),
        data,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// `{success: false, error}`
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let body = ErrorEnvelope {
        success: false,
        error: message,
    };
    (status, Json(body)).into_response()
}
