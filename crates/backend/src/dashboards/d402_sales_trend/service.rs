use contracts::dashboards::d402_sales_trend::{
    ChartType, DataLoadStatus, FilterOptions, FilterOptionsQuery, MarketView, Metric,
    SalesDataset, SalesRecord, SeriesInfo, SeriesKey, SeriesLabelResponse, TrendChartResponse,
    TrendFilters, TrendQuery, ALL, TOTAL_MARKET,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::shared::format::format_metric_value;
use crate::shared::pivot::{
    build_chart_rows, derive_active_keys, filter_options, filter_records, format_series_label,
    series_label,
};

use super::error::TrendError;
use super::repository::{DatasetState, DatasetStore, STORE};

/// Palette assigned to series by position, cycling
pub const SERIES_COLORS: &[&str] = &["#8884d8", "#82ca9d", "#ffc658", "#ff7300", "#8dd1e1"];

/// Treat missing, empty and sentinel values as "match all"
fn selected<'a>(value: &'a Option<String>, sentinels: &[&str]) -> Option<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !sentinels.contains(v))
}

/// Convert raw control values into a typed filter configuration
pub fn parse_query(query: &TrendQuery) -> Result<TrendFilters, TrendError> {
    let pack_size = match selected(&query.pack_size, &[ALL]) {
        Some(raw) => Some(raw.parse::<u32>().map_err(|_| TrendError::InvalidFilter {
            field: "pack_size",
            value: raw.to_string(),
        })?),
        None => None,
    };

    let metric = match selected(&query.metric, &[]) {
        Some(raw) => Metric::from_code(raw).ok_or_else(|| TrendError::InvalidFilter {
            field: "metric",
            value: raw.to_string(),
        })?,
        None => Metric::default(),
    };

    let market_view = match selected(&query.market_view, &[]) {
        Some(raw) => MarketView::from_code(raw).ok_or_else(|| TrendError::InvalidFilter {
            field: "market_view",
            value: raw.to_string(),
        })?,
        None => MarketView::default(),
    };

    let chart_type = match selected(&query.chart_type, &[]) {
        Some(raw) => ChartType::from_code(raw).ok_or_else(|| TrendError::InvalidFilter {
            field: "chart_type",
            value: raw.to_string(),
        })?,
        None => ChartType::default(),
    };

    Ok(TrendFilters {
        product_line: selected(&query.product_line, &[ALL]).map(str::to_string),
        pack_size,
        strain: selected(&query.strain, &[ALL]).map(str::to_string),
        market: selected(&query.market, &[TOTAL_MARKET]).map(str::to_string),
        metric,
        market_view,
        chart_type,
    })
}

/// Filter -> rows, filter -> active keys -> series descriptors
pub fn build_trend_chart(records: &[SalesRecord], filters: &TrendFilters) -> TrendChartResponse {
    let filtered = filter_records(records, filters);
    let rows = build_chart_rows(&filtered, filters);
    let keys = derive_active_keys(&filtered, filters);

    let mut totals: HashMap<&SeriesKey, f64> = HashMap::new();
    for row in &rows {
        for (key, value) in &row.values {
            *totals.entry(key).or_insert(0.0) += value;
        }
    }

    let series = keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let total = totals.get(key).copied().unwrap_or(0.0);
            SeriesInfo {
                key: key.clone(),
                label: series_label(key),
                color: SERIES_COLORS[index % SERIES_COLORS.len()].to_string(),
                total,
                total_display: format_metric_value(total, filters.metric),
            }
        })
        .collect();

    TrendChartResponse {
        filters: filters.clone(),
        rows,
        series,
        record_count: filtered.len(),
    }
}

pub fn build_filter_options(records: &[SalesRecord], product_line: Option<&str>) -> FilterOptions {
    filter_options(records, product_line)
}

fn occurs<T: PartialEq>(selected: Option<T>, mut values: impl Iterator<Item = T>) -> bool {
    match selected {
        Some(value) => values.any(|v| v == value),
        None => true,
    }
}

/// Every selected dimension value occurs somewhere in the snapshot
fn is_known_selection(records: &[SalesRecord], filters: &TrendFilters) -> bool {
    occurs(
        filters.product_line.as_deref(),
        records.iter().map(|r| r.product_line.as_str()),
    ) && occurs(filters.pack_size, records.iter().map(|r| r.pack_size))
        && occurs(filters.strain.as_deref(), records.iter().map(|r| r.strain.as_str()))
        && occurs(filters.market.as_deref(), records.iter().map(|r| r.market.as_str()))
}

fn ready_records(store: &DatasetStore) -> Result<Arc<SalesDataset>, TrendError> {
    match store.state() {
        DatasetState::Loading => Err(TrendError::NotReady),
        DatasetState::Failed(error) => Err(TrendError::LoadFailed(error)),
        DatasetState::Ready { dataset, .. } => Ok(dataset),
    }
}

pub fn trend_chart_for(
    store: &DatasetStore,
    query: &TrendQuery,
) -> Result<Arc<TrendChartResponse>, TrendError> {
    let filters = parse_query(query)?;
    let dataset = ready_records(store)?;

    if let Some(cached) = store.cached_chart(&filters) {
        tracing::debug!("D402: Chart served from cache for {:?}", filters);
        return Ok(cached);
    }

    let response = Arc::new(build_trend_chart(&dataset.monthly, &filters));
    if is_known_selection(&dataset.monthly, &filters) {
        store.cache_chart(filters, response.clone());
    }
    Ok(response)
}

pub fn filter_options_for(
    store: &DatasetStore,
    query: &FilterOptionsQuery,
) -> Result<FilterOptions, TrendError> {
    let dataset = ready_records(store)?;
    let product_line = selected(&query.product_line, &[ALL]);
    Ok(build_filter_options(&dataset.monthly, product_line))
}

/// Get chart rows and series for the given control values
pub async fn get_trend_chart(query: TrendQuery) -> Result<Arc<TrendChartResponse>, TrendError> {
    trend_chart_for(&STORE, &query)
}

/// Get values for the filter controls
pub async fn get_filter_options(query: FilterOptionsQuery) -> Result<FilterOptions, TrendError> {
    filter_options_for(&STORE, &query)
}

/// Label for a raw series key under the given control values
pub fn label_series(key: &str, query: &TrendQuery) -> Result<SeriesLabelResponse, TrendError> {
    let filters = parse_query(query)?;
    Ok(SeriesLabelResponse {
        key: key.to_string(),
        label: format_series_label(key, &filters),
    })
}

pub async fn get_status() -> DataLoadStatus {
    STORE.status()
}
