//! Pivot engine for the sales trend chart.
//!
//! Three pure stages over an immutable record snapshot:
//! filter -> rows grouped by period, and filter -> active series keys.
//! Accumulation assumes finite `units`/`revenue`; the loader owns that contract.

pub mod filter;
pub mod labels;
pub mod options;
pub mod series_builder;
pub mod series_keys;

pub use filter::*;
pub use labels::*;
pub use options::*;
pub use series_builder::*;
pub use series_keys::*;


#[cfg(test)]
mod tests {
    use super::*;
    use contracts::dashboards::d402_sales_trend::{
        MarketView, Metric, SalesRecord, SeriesKey, TrendFilters,
    };
    use proptest::prelude::*;
    use std::collections::HashSet;

    const PRODUCT_LINES: &[&str] = &["Twisted", "Fire", "Ice"];
    const STRAINS: &[&str] = &["Blue Magic", "Grandaddy Purple", "OG Kush"];
    const MARKETS: &[&str] = &["AZ", "CA", "NV"];

    fn arb_record() -> impl Strategy<Value = SalesRecord> {
        (
            2024i32..=2025,
            1u32..=12,
            prop::sample::select(PRODUCT_LINES),
            prop::sample::select(STRAINS),
            1u32..=3,
            prop::sample::select(MARKETS),
            0u32..=10_000,
            0u32..=1_000_000,
        )
            .prop_map(
                |(year, month, product_line, strain, pack_size, market, units, revenue)| {
                    test_support::record(
                        year,
                        month,
                        product_line,
                        strain,
                        pack_size,
                        market,
                        units as f64,
                        revenue as f64,
                    )
                },
            )
    }

    fn arb_metric() -> impl Strategy<Value = Metric> {
        prop_oneof![Just(Metric::Units), Just(Metric::Revenue)]
    }

    fn arb_market_view() -> impl Strategy<Value = MarketView> {
        prop_oneof![Just(MarketView::Combined), Just(MarketView::PerMarket)]
    }

    fn arb_filters() -> impl Strategy<Value = TrendFilters> {
        (
            prop::option::of(prop::sample::select(PRODUCT_LINES)),
            prop::option::of(1u32..=3),
            prop::option::of(prop::sample::select(STRAINS)),
            prop::option::of(prop::sample::select(MARKETS)),
            arb_metric(),
            arb_market_view(),
        )
            .prop_map(
                |(product_line, pack_size, strain, market, metric, market_view)| TrendFilters {
                    product_line: product_line.map(str::to_string),
                    pack_size,
                    strain: strain.map(str::to_string),
                    market: market.map(str::to_string),
                    metric,
                    market_view,
                    ..TrendFilters::default()
                },
            )
    }

    proptest! {
        #[test]
        fn filter_never_grows(
            records in prop::collection::vec(arb_record(), 0..60),
            filters in arb_filters(),
        ) {
            prop_assert!(filter_records(&records, &filters).len() <= records.len());
        }

        #[test]
        fn refilter_is_idempotent(
            records in prop::collection::vec(arb_record(), 0..60),
            filters in arb_filters(),
        ) {
            let once = filter_records(&records, &filters);
            let twice = filter_records(once.iter().copied(), &filters);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn match_all_conserves_metric_sum(
            records in prop::collection::vec(arb_record(), 0..60),
            metric in arb_metric(),
            market_view in arb_market_view(),
        ) {
            let filters = TrendFilters {
                metric,
                market_view,
                ..TrendFilters::default()
            };
            let rows = build_chart_rows(&filter_records(&records, &filters), &filters);

            let row_sum: f64 = rows.iter().flat_map(|r| r.values.values()).sum();
            let input_sum: f64 = records.iter().map(|r| metric.value(r)).sum();
            prop_assert!((row_sum - input_sum).abs() < 1e-6);
        }

        #[test]
        fn row_keys_match_active_keys(
            records in prop::collection::vec(arb_record(), 0..60),
            filters in arb_filters(),
        ) {
            let filtered = filter_records(&records, &filters);
            let rows = build_chart_rows(&filtered, &filters);
            let keys = derive_active_keys(&filtered, &filters);

            let declared: HashSet<&SeriesKey> = keys.iter().collect();
            prop_assert_eq!(declared.len(), keys.len());

            let used: HashSet<&SeriesKey> = rows.iter().flat_map(|r| r.values.keys()).collect();
            prop_assert_eq!(used, declared);
        }

        #[test]
        fn rows_only_hold_contributed_keys(
            records in prop::collection::vec(arb_record(), 0..60),
            filters in arb_filters(),
        ) {
            let filtered = filter_records(&records, &filters);
            let rows = build_chart_rows(&filtered, &filters);
            let mode = filters.series_mode();

            for row in &rows {
                for key in row.values.keys() {
                    let contributed = filtered.iter().any(|r| {
                        r.year == row.year
                            && r.month == row.month
                            && &SeriesKey::for_record(r, mode) == key
                    });
                    prop_assert!(contributed, "{} has no contributor in {}", key, row.period());
                }
            }
        }

        #[test]
        fn rows_are_sorted_by_month(
            records in prop::collection::vec(arb_record(), 0..60),
            filters in arb_filters(),
        ) {
            let rows = build_chart_rows(&filter_records(&records, &filters), &filters);
            prop_assert!(rows.windows(2).all(|w| w[0].month <= w[1].month));
        }
    }
}
