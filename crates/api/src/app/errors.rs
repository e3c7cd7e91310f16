use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use beerstock_core::DomainError;
use beerstock_infra::StockServiceError;

pub fn service_error_to_response(err: StockServiceError) -> axum::response::Response {
    match err {
        StockServiceError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        StockServiceError::AlreadyRegistered(msg) => {
            json_error(StatusCode::BAD_REQUEST, "already_registered", msg)
        }
        e @ StockServiceError::StockExceeded { .. } => {
            json_error(StatusCode::BAD_REQUEST, "stock_exceeded", e.to_string())
        }
        e @ StockServiceError::StockBelowZero { .. } => {
            json_error(StatusCode::BAD_REQUEST, "stock_below_zero", e.to_string())
        }
        StockServiceError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        StockServiceError::Concurrency(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StockServiceError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                format!("{e:?}"),
            )
        }
    }
}

/// Errors raised while mapping a request, before the service is called.
pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        other => service_error_to_response(other.into()),
    }
}

/// Malformed or non-JSON bodies are client errors, same as failed validation.
pub fn json_rejection_to_response(rejection: JsonRejection) -> axum::response::Response {
    json_error(
        StatusCode::BAD_REQUEST,
        "invalid_body",
        rejection.body_text(),
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "status": status.as_u16(),
            "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        })),
    )
        .into_response()
}
