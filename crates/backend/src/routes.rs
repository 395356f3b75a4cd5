use axum::{routing::get, Router};

use crate::api::handlers;

/// Configuration of all application routes
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // D402 SALES TREND DASHBOARD
        // ========================================
        .route("/api/d402/status", get(handlers::d402_sales_trend::get_status))
        .route(
            "/api/d402/filters",
            get(handlers::d402_sales_trend::get_filter_options),
        )
        .route(
            "/api/d402/chart",
            get(handlers::d402_sales_trend::get_trend_chart),
        )
        .route(
            "/api/d402/label",
            get(handlers::d402_sales_trend::get_series_label),
        )
}
