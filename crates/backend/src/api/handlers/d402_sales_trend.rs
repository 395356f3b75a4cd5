use axum::{extract::Query, http::StatusCode, Json};
use contracts::dashboards::d402_sales_trend::{
    DataLoadStatus, FilterOptions, FilterOptionsQuery, SeriesLabelQuery, SeriesLabelResponse,
    TrendChartResponse, TrendQuery,
};

use crate::dashboards::d402_sales_trend::error::TrendError;
use crate::dashboards::d402_sales_trend::service;

fn status_for(error: &TrendError) -> StatusCode {
    match error {
        TrendError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
        TrendError::InvalidFilter { .. } => StatusCode::BAD_REQUEST,
        TrendError::LoadFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// GET /api/d402/status
pub async fn get_status() -> Json<DataLoadStatus> {
    Json(service::get_status().await)
}

/// GET /api/d402/filters?product_line=Twisted
pub async fn get_filter_options(
    Query(query): Query<FilterOptionsQuery>,
) -> Result<Json<FilterOptions>, (StatusCode, String)> {
    match service::get_filter_options(query).await {
        Ok(options) => {
            tracing::info!(
                "D402 Dashboard: Returning filter options ({} product lines, {} strains, {} markets)",
                options.product_lines.len(),
                options.strains.len(),
                options.markets.len()
            );
            Ok(Json(options))
        }
        Err(e) => {
            tracing::error!("D402 Dashboard: Failed to get filter options: {}", e);
            Err((status_for(&e), e.to_string()))
        }
    }
}

/// GET /api/d402/chart?product_line=All&pack_size=All&strain=All&market=Total&metric=revenue&market_view=combined
pub async fn get_trend_chart(
    Query(query): Query<TrendQuery>,
) -> Result<Json<TrendChartResponse>, (StatusCode, String)> {
    tracing::info!("D402 Dashboard: Getting trend chart for {:?}", query);

    match service::get_trend_chart(query).await {
        Ok(response) => {
            tracing::info!(
                "D402 Dashboard: Returning {} rows for {} series",
                response.rows.len(),
                response.series.len()
            );
            Ok(Json(response.as_ref().clone()))
        }
        Err(e) => {
            tracing::error!("D402 Dashboard: Failed to get trend chart: {}", e);
            Err((status_for(&e), e.to_string()))
        }
    }
}

/// GET /api/d402/label?key=Twisted_Blue%20Magic_pk1_AZ&market=AZ
pub async fn get_series_label(
    Query(label): Query<SeriesLabelQuery>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<SeriesLabelResponse>, (StatusCode, String)> {
    service::label_series(&label.key, &query)
        .map(Json)
        .map_err(|e| {
            tracing::error!("D402 Dashboard: Failed to format label for {}: {}", label.key, e);
            (status_for(&e), e.to_string())
        })
}
