// HTTP request handlers
use crate::application::customer_service::{CustomerFilter, ServiceError};
use crate::domain::customer::{CustomerDraft, CustomerPatch};
use crate::domain::status::TaxStatus;
use crate::infrastructure::http_response::{
    error_response, ok_response, timed_response, with_status,
};
use crate::presentation::app_state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Deserialize)]
pub struct SummaryQuery {
    pub fresh: Option<bool>,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct TagRequest {
    pub tag: String,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Dashboard counts over all customers
pub async fn dashboard_summary(
    Query(query): Query<SummaryQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state
        .dashboard_service
        .get_summary(query.fresh.unwrap_or(false))
        .await
    {
        Ok(timed) => timed_response(timed.duration_ms, timed.summary),
        Err(e) => {
            tracing::error!("Error building dashboard summary: {}", e);
            internal_error()
        }
    }
}

pub async fn list_customers(
    Query(query): Query<ListQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(label) => match TaxStatus::from_label(label) {
            Some(status) => Some(status),
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("Unknown status {:?}", label),
                );
            }
        },
        None => None,
    };
    let filter = CustomerFilter {
        status,
        query: query.q,
    };

    match state.customer_service.list(&filter).await {
        Ok(customers) => ok_response(customers),
        Err(e) => service_error(e),
    }
}

pub async fn get_customer(
    Path(plate): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.customer_service.get(&plate).await {
        Ok(customer) => ok_response(customer),
        Err(e) => service_error(e),
    }
}

pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CustomerDraft>, JsonRejection>,
) -> Response {
    let Json(draft) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    match state.customer_service.create(draft).await {
        Ok(customer) => with_status(StatusCode::CREATED, customer),
        Err(e) => service_error(e),
    }
}

pub async fn update_customer(
    Path(plate): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CustomerPatch>, JsonRejection>,
) -> Response {
    let Json(patch) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    match state.customer_service.update(&plate, patch).await {
        Ok(customer) => ok_response(customer),
        Err(e) => service_error(e),
    }
}

pub async fn delete_customer(
    Path(plate): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.customer_service.delete(&plate).await {
        Ok(()) => ok_response(serde_json::json!({ "licensePlate": plate })),
        Err(e) => service_error(e),
    }
}

pub async fn add_tag(
    Path(plate): Path<String>,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TagRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return error_response(StatusCode::BAD_REQUEST, &rejection.body_text()),
    };

    match state.customer_service.add_tag(&plate, &request.tag).await {
        Ok(customer) => ok_response(customer),
        Err(e) => service_error(e),
    }
}

pub async fn remove_tag(
    Path((plate, tag)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.customer_service.remove_tag(&plate, &tag).await {
        Ok(customer) => ok_response(customer),
        Err(e) => service_error(e),
    }
}

fn service_error(err: ServiceError) -> Response {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        ServiceError::Store(e) => {
            tracing::error!("Customer store error: {}", e);
            return internal_error();
        }
    };
    error_response(status, &err.to_string())
}

fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
