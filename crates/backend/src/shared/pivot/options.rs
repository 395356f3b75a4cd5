use contracts::dashboards::d402_sales_trend::{FilterOptions, SalesRecord};
use std::collections::HashSet;
use std::hash::Hash;

/// Distinct values in first-seen order
fn distinct<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|value| seen.insert(value.clone()))
        .collect()
}

/// Values for the filter controls.
///
/// Product lines, pack sizes and markets come from the full record set.
/// Strains are narrowed by the selected product line only.
pub fn filter_options(records: &[SalesRecord], product_line: Option<&str>) -> FilterOptions {
    FilterOptions {
        product_lines: distinct(records.iter().map(|r| r.product_line.clone())),
        pack_sizes: distinct(records.iter().map(|r| r.pack_size)),
        strains: distinct(
            records
                .iter()
                .filter(|r| product_line.map_or(true, |pl| r.product_line == pl))
                .map(|r| r.strain.clone()),
        ),
        markets: distinct(records.iter().map(|r| r.market.clone())),
    }
}
