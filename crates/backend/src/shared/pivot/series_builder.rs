use contracts::dashboards::d402_sales_trend::{ChartRow, SalesRecord, SeriesKey, TrendFilters};
use std::collections::HashMap;

/// Fold filtered records into one row per (year, month).
///
/// Each record adds its metric value to the row's entry for its series key.
/// Keys nobody contributed to are left out of the row. Rows are sorted by
/// month number only, so multi-year data interleaves (ties keep first-seen
/// order).
pub fn build_chart_rows(records: &[&SalesRecord], filters: &TrendFilters) -> Vec<ChartRow> {
    let mode = filters.series_mode();
    let mut rows: Vec<ChartRow> = Vec::new();
    let mut row_index: HashMap<(i32, u32), usize> = HashMap::new();

    for record in records {
        let slot = *row_index
            .entry((record.year, record.month))
            .or_insert_with(|| {
                rows.push(ChartRow::new(record.year, record.month));
                rows.len() - 1
            });

        let key = SeriesKey::for_record(record, mode);
        *rows[slot].values.entry(key).or_insert(0.0) += filters.metric.value(record);
    }

    rows.sort_by_key(|row| row.month);

    tracing::debug!(
        "Pivot grouping: {} records -> {} rows ({:?})",
        records.len(),
        rows.len(),
        mode
    );

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::pivot::filter_records;
    use crate::shared::pivot::test_support::{record, sample_records};
    use contracts::dashboards::d402_sales_trend::{MarketView, Metric, SeriesMode};

    fn key(raw: &str) -> SeriesKey {
        raw.parse().unwrap()
    }

    #[test]
    fn test_combined_rows_by_month() {
        let records = sample_records();
        let filters = TrendFilters::default();
        let rows = build_chart_rows(&filter_records(&records, &filters), &filters);

        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows.iter().map(|r| r.month).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(rows[0].values.len(), 2);
        assert_eq!(rows[0].value(&key("Twisted_Blue Magic_pk1")), Some(113918.6));
        assert_eq!(rows[0].value(&key("Fire_Grandaddy Purple_pk1")), Some(109025.0));
    }

    #[test]
    fn test_values_are_summed_not_overwritten() {
        let records = vec![
            record(2025, 1, "Twisted", "Blue Magic", 1, "AZ", 10.0, 100.0),
            record(2025, 1, "Twisted", "Blue Magic", 1, "CA", 5.0, 50.0),
        ];
        let filters = TrendFilters::default().with_metric(Metric::Units);
        let rows = build_chart_rows(&filter_records(&records, &filters), &filters);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].value(&key("Twisted_Blue Magic_pk1")), Some(15.0));
    }

    #[test]
    fn test_rows_are_sparse() {
        let records = vec![
            record(2025, 1, "Twisted", "Blue Magic", 1, "AZ", 10.0, 100.0),
            record(2025, 2, "Fire", "Grandaddy Purple", 1, "CA", 5.0, 50.0),
        ];
        let filters = TrendFilters::default();
        let rows = build_chart_rows(&filter_records(&records, &filters), &filters);

        assert_eq!(rows.len(), 2);
        assert!(rows[0].value(&key("Fire_Grandaddy Purple_pk1")).is_none());
        assert!(rows[1].value(&key("Twisted_Blue Magic_pk1")).is_none());
    }

    #[test]
    fn test_per_market_collapses_products() {
        let records = vec![
            record(2025, 1, "Twisted", "Blue Magic", 1, "AZ", 10.0, 100.0),
            record(2025, 1, "Fire", "Grandaddy Purple", 2, "AZ", 5.0, 50.0),
        ];
        let filters = TrendFilters::default().with_market_view(MarketView::PerMarket);
        assert_eq!(filters.series_mode(), SeriesMode::PerMarket);

        let rows = build_chart_rows(&filter_records(&records, &filters), &filters);
        assert_eq!(rows[0].values.len(), 1);
        assert_eq!(rows[0].value(&key("AZ_Total")), Some(150.0));
    }

    #[test]
    fn test_sort_is_by_month_only_across_years() {
        let records = vec![
            record(2024, 3, "Twisted", "Blue Magic", 1, "AZ", 1.0, 1.0),
            record(2025, 1, "Twisted", "Blue Magic", 1, "AZ", 2.0, 2.0),
            record(2024, 1, "Twisted", "Blue Magic", 1, "AZ", 3.0, 3.0),
            record(2025, 2, "Twisted", "Blue Magic", 1, "AZ", 4.0, 4.0),
        ];
        let filters = TrendFilters::default();
        let rows = build_chart_rows(&filter_records(&records, &filters), &filters);

        let order: Vec<(i32, u32)> = rows.iter().map(|r| (r.year, r.month)).collect();
        assert_eq!(order, vec![(2025, 1), (2024, 1), (2025, 2), (2024, 3)]);
    }

    #[test]
    fn test_empty_input_gives_no_rows() {
        let rows = build_chart_rows(&[], &TrendFilters::default());
        assert!(rows.is_empty());
    }
}
