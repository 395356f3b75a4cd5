use contracts::dashboards::d402_sales_trend::{SeriesKey, SeriesMode, TrendFilters};

const TOTAL_SUFFIX: &str = "_Total";

/// Display label for a structured series key
pub fn series_label(key: &SeriesKey) -> String {
    match key {
        SeriesKey::PerMarket { market } => format!("{} Market", market),
        SeriesKey::Combined {
            product_line,
            strain,
            pack_size,
        } => format!("{} - {} - Pack {}", product_line, strain, pack_size),
        SeriesKey::CombinedWithMarket {
            product_line,
            strain,
            pack_size,
            market,
        } => format!(
            "{} - {} - Pack {} ({})",
            product_line, strain, pack_size, market
        ),
    }
}

/// Display label for a series key in its `_`-joined string form.
///
/// Must stay in step with `SeriesKey`'s `Display` impl.
pub fn format_series_label(raw: &str, filters: &TrendFilters) -> String {
    if filters.series_mode() == SeriesMode::PerMarket {
        return match raw.strip_suffix(TOTAL_SUFFIX) {
            Some(market) => format!("{} Market", market),
            None => raw.to_string(),
        };
    }

    let parts: Vec<&str> = raw.split('_').collect();
    if parts.len() >= 3 {
        let mut formatted = parts[..3].join(" - ").replacen("pk", "Pack ", 1);
        if let Some(market) = parts.get(3) {
            formatted.push_str(&format!(" ({})", market));
        }
        return formatted;
    }

    raw.replace('_', " - ").replacen("pk", "Pack ", 1)
}
