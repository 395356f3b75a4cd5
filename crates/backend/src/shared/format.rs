use contracts::dashboards::d402_sales_trend::Metric;

/// Formats an integer with en-US thousands separators (commas)
///
/// # Examples
/// ```ignore
/// use backend::shared::format::format_number;
/// assert_eq!(format_number(1234567), "1,234,567");
/// assert_eq!(format_number(42), "42");
/// ```
pub fn format_number(n: usize) -> String {
    group_digits(&n.to_string())
}

fn group_digits(digits: &str) -> String {
    let mut result = String::new();
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Rounds to a whole number and splits off the sign
fn rounded_parts(value: f64) -> (bool, String) {
    let rounded = value.round();
    // -0.4 rounds to -0, which should not print a sign
    let negative = rounded < 0.0;
    (negative, format!("{:.0}", rounded.abs()))
}

/// Plain count: "12,345" (no fractional digits)
pub fn format_count(value: f64) -> String {
    let (negative, digits) = rounded_parts(value);
    let grouped = group_digits(&digits);
    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// USD amount without fractional digits: "$113,919"
pub fn format_currency(value: f64) -> String {
    let (negative, digits) = rounded_parts(value);
    let grouped = group_digits(&digits);
    if negative {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Currency for revenue, plain count for units
pub fn format_metric_value(value: f64, metric: Metric) -> String {
    match metric {
        Metric::Revenue => format_currency(value),
        Metric::Units => format_count(value),
    }
}
