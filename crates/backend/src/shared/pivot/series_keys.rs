use contracts::dashboards::d402_sales_trend::{SalesRecord, SeriesKey, TrendFilters};
use std::collections::HashSet;

/// Distinct series keys the grouping stage produces for the same input.
///
/// Keys are returned in first-seen order over `records`. Uses the same
/// `SeriesKey::for_record` rule as `build_chart_rows`, so the two never drift.
pub fn derive_active_keys(records: &[&SalesRecord], filters: &TrendFilters) -> Vec<SeriesKey> {
    let mode = filters.series_mode();
    let mut seen: HashSet<SeriesKey> = HashSet::new();
    let mut keys = Vec::new();

    for record in records {
        let key = SeriesKey::for_record(record, mode);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    tracing::debug!("Pivot keys: {} active series ({:?})", keys.len(), mode);

    keys
}
