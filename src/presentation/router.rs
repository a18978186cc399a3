// Route table
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    add_tag, create_customer, dashboard_summary, delete_customer, get_customer, health_check,
    list_customers, remove_tag, update_customer,
};
use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboard/summary", get(dashboard_summary))
        .route("/api/customers", get(list_customers).post(create_customer))
        .route(
            "/api/customers/:plate",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/api/customers/:plate/tags", post(add_tag))
        .route("/api/customers/:plate/tags/:tag", delete(remove_tag))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
