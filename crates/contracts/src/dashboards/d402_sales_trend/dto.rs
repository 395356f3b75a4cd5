use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::series_key::SeriesKey;

/// Sentinel used by filter controls for "match all"
pub const ALL: &str = "All";
/// Sentinel used by the market control for the aggregate state
pub const TOTAL_MARKET: &str = "Total";

/// One monthly observation of sales for a product line, strain, pack size and market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    pub product_line: String,
    /// Meaningful only within its product line
    pub strain: String,
    /// Units per pack
    #[serde(rename = "pk")]
    pub pack_size: u32,
    pub units: f64,
    pub revenue: f64,
    /// Region code (e.g., "AZ")
    pub market: String,
}

/// Feed payload: `{ "monthly": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesDataset {
    pub monthly: Vec<SalesRecord>,
}

/// Numeric field that feeds the series values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Units,
    #[default]
    Revenue,
}

impl Metric {
    pub fn value(&self, record: &SalesRecord) -> f64 {
        match self {
            Metric::Units => record.units,
            Metric::Revenue => record.revenue,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Metric::Units => "units",
            Metric::Revenue => "revenue",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "units" => Some(Metric::Units),
            "revenue" => Some(Metric::Revenue),
            _ => None,
        }
    }
}

/// Grouping mode selected by the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketView {
    /// One series per product dimension, aggregated across markets
    #[default]
    Combined,
    /// One series per market, product dimensions collapsed
    #[serde(alias = "individual")]
    PerMarket,
}

impl MarketView {
    pub fn code(&self) -> &'static str {
        match self {
            MarketView::Combined => "combined",
            MarketView::PerMarket => "per_market",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "combined" => Some(MarketView::Combined),
            "per_market" | "individual" => Some(MarketView::PerMarket),
            _ => None,
        }
    }
}

/// Chart kind requested by the presentation layer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
}

impl ChartType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "line" => Some(ChartType::Line),
            "bar" => Some(ChartType::Bar),
            _ => None,
        }
    }
}

/// How series keys are built for the current configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesMode {
    /// `<market>_Total`
    PerMarket,
    /// `<product_line>_<strain>_pk<pack_size>`
    Combined,
    /// `<product_line>_<strain>_pk<pack_size>_<market>`
    CombinedWithMarket,
}

/// Immutable filter configuration passed into every derivation.
///
/// `None` means "match all"; for `market` it is the aggregate ("Total") state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrendFilters {
    pub product_line: Option<String>,
    pub pack_size: Option<u32>,
    pub strain: Option<String>,
    pub market: Option<String>,
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub market_view: MarketView,
    #[serde(default)]
    pub chart_type: ChartType,
}

impl TrendFilters {
    /// AND-composed equality filters; unset dimensions match everything
    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(product_line) = &self.product_line {
            if &record.product_line != product_line {
                return false;
            }
        }
        if let Some(pack_size) = self.pack_size {
            if record.pack_size != pack_size {
                return false;
            }
        }
        if let Some(strain) = &self.strain {
            if &record.strain != strain {
                return false;
            }
        }
        if let Some(market) = &self.market {
            if &record.market != market {
                return false;
            }
        }
        true
    }

    pub fn is_aggregate_market(&self) -> bool {
        self.market.is_none()
    }

    /// Resolve the key shape from `(market_view, market)`
    pub fn series_mode(&self) -> SeriesMode {
        match (self.market_view, self.is_aggregate_market()) {
            (MarketView::PerMarket, true) => SeriesMode::PerMarket,
            (MarketView::Combined, true) => SeriesMode::Combined,
            _ => SeriesMode::CombinedWithMarket,
        }
    }

    pub fn with_product_line(mut self, product_line: impl Into<String>) -> Self {
        self.product_line = Some(product_line.into());
        self
    }

    pub fn with_pack_size(mut self, pack_size: u32) -> Self {
        self.pack_size = Some(pack_size);
        self
    }

    pub fn with_strain(mut self, strain: impl Into<String>) -> Self {
        self.strain = Some(strain.into());
        self
    }

    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_market_view(mut self, market_view: MarketView) -> Self {
        self.market_view = market_view;
        self
    }
}

/// Raw configuration as sent by filter controls
///
/// GET /api/d402/chart?product_line=All&pack_size=1&market=Total&metric=units
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrendQuery {
    pub product_line: Option<String>,
    pub pack_size: Option<String>,
    pub strain: Option<String>,
    pub market: Option<String>,
    pub metric: Option<String>,
    pub market_view: Option<String>,
    pub chart_type: Option<String>,
}

/// Derived row: one per distinct (year, month) in the filtered set.
///
/// Sparse: a key is absent when nothing contributed to it in this period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    pub year: i32,
    pub month: u32,
    pub values: BTreeMap<SeriesKey, f64>,
}

impl ChartRow {
    pub fn new(year: i32, month: u32) -> Self {
        Self {
            year,
            month,
            values: BTreeMap::new(),
        }
    }

    pub fn value(&self, key: &SeriesKey) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Period in format "YYYY-MM"
    pub fn period(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Axis label like "Jan 2025"; falls back to the period for invalid months
    pub fn axis_label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b %Y").to_string(),
            None => self.period(),
        }
    }
}

/// Active series with its display attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesInfo {
    pub key: SeriesKey,
    pub label: String,
    pub color: String,
    /// Sum of the series over all rows
    pub total: f64,
    /// `total` formatted for the selected metric (e.g., "$347,699")
    pub total_display: String,
}

/// Response for GET /api/d402/chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendChartResponse {
    /// Configuration the rows were derived from
    pub filters: TrendFilters,
    /// Sorted by month
    pub rows: Vec<ChartRow>,
    /// Active series in legend order
    pub series: Vec<SeriesInfo>,
    /// Number of records that passed the filters
    pub record_count: usize,
}

/// Distinct values for the filter controls
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub product_lines: Vec<String>,
    pub pack_sizes: Vec<u32>,
    /// Narrowed by the selected product line only
    pub strains: Vec<String>,
    pub markets: Vec<String>,
}

/// GET /api/d402/filters?product_line=Twisted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterOptionsQuery {
    pub product_line: Option<String>,
}

/// GET /api/d402/label?key=AZ_Total&market_view=per_market
///
/// The filter values are read from the same query string as `TrendQuery`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesLabelQuery {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesLabelResponse {
    pub key: String,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Loading,
    Ready,
    Error,
}

/// Response for GET /api/d402/status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataLoadStatus {
    pub state: LoadState,
    /// Failure description when `state == Error`
    pub error: Option<String>,
    pub record_count: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}
