use contracts::dashboards::d402_sales_trend::{SalesRecord, TrendFilters};

/// Narrow records to those matching every active dimensional filter.
///
/// Accepts any iterator of borrowed records so an already filtered set can be
/// filtered again. An empty result is valid.
pub fn filter_records<'a, I>(records: I, filters: &TrendFilters) -> Vec<&'a SalesRecord>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    let filtered: Vec<&SalesRecord> = records
        .into_iter()
        .filter(|record| filters.matches(record))
        .collect();

    tracing::debug!(
        "Pivot filter: {} records kept (product_line={:?}, pack_size={:?}, strain={:?}, market={:?})",
        filtered.len(),
        filters.product_line,
        filters.pack_size,
        filters.strain,
        filters.market
    );

    filtered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::pivot::test_support::sample_records;

    #[test]
    fn test_match_all_keeps_everything() {
        let records = sample_records();
        let filtered = filter_records(&records, &TrendFilters::default());
        assert_eq!(filtered.len(), records.len());
    }

    #[test]
    fn test_market_filter() {
        let records = sample_records();
        let filtered = filter_records(&records, &TrendFilters::default().with_market("AZ"));
        assert_eq!(filtered.len(), 3);
        assert!(filtered.iter().all(|r| r.market == "AZ"));
    }

    #[test]
    fn test_pack_size_uses_integer_equality() {
        let records = sample_records();
        assert_eq!(
            filter_records(&records, &TrendFilters::default().with_pack_size(1)).len(),
            6
        );
        assert!(filter_records(&records, &TrendFilters::default().with_pack_size(10)).is_empty());
    }

    #[test]
    fn test_unknown_product_line_is_empty_not_error() {
        let records = sample_records();
        let filtered = filter_records(&records, &TrendFilters::default().with_product_line("Ghost"));
        assert!(filtered.is_empty());
    }

    #[test]
    fn test_filters_compose() {
        let records = sample_records();
        let filters = TrendFilters::default()
            .with_product_line("Fire")
            .with_strain("Grandaddy Purple")
            .with_market("CA");
        assert_eq!(filter_records(&records, &filters).len(), 3);

        // Strain from another product line
        let mismatched = TrendFilters::default()
            .with_product_line("Fire")
            .with_strain("Blue Magic");
        assert!(filter_records(&records, &mismatched).is_empty());
    }
}
