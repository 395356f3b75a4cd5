use chrono::{DateTime, Utc};
use contracts::dashboards::d402_sales_trend::{
    DataLoadStatus, LoadState, SalesDataset, TrendChartResponse, TrendFilters,
};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};
use thiserror::Error;

/// Sample feed shipped with the binary
const SAMPLE_DATASET: &str = include_str!("../../../data/sales_monthly.json");

/// Upper bound on memoized chart responses per snapshot
pub const CHART_CACHE_CAPACITY: usize = 256;

/// Process-wide snapshot for the session
pub static STORE: Lazy<DatasetStore> = Lazy::new(DatasetStore::new);

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Cannot read sales feed {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid sales feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the monthly records come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    Embedded,
    File(PathBuf),
}

impl DatasetSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        match path {
            Some(path) => DatasetSource::File(path),
            None => DatasetSource::Embedded,
        }
    }
}

pub fn sample_dataset() -> Result<SalesDataset, DataLoadError> {
    Ok(serde_json::from_str(SAMPLE_DATASET)?)
}

/// Load the record collection once per session.
///
/// Records are not validated beyond their JSON shape.
pub async fn load_dataset(source: &DatasetSource) -> Result<SalesDataset, DataLoadError> {
    match source {
        DatasetSource::Embedded => sample_dataset(),
        DatasetSource::File(path) => {
            let contents =
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| DataLoadError::Io {
                        path: path.display().to_string(),
                        source,
                    })?;
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

/// Load state of the session snapshot
#[derive(Debug, Clone)]
pub enum DatasetState {
    Loading,
    Ready {
        dataset: Arc<SalesDataset>,
        loaded_at: DateTime<Utc>,
    },
    /// Terminal for the session
    Failed(String),
}

pub struct DatasetStore {
    state: RwLock<DatasetState>,
    /// Chart responses memoized by filter equality for the current snapshot
    chart_cache: Mutex<HashMap<TrendFilters, Arc<TrendChartResponse>>>,
}

impl Default for DatasetStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DatasetStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(DatasetState::Loading),
            chart_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn state(&self) -> DatasetState {
        self.state
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Loading -> Ready. Ignored once the session has failed.
    pub fn set_ready(&self, dataset: SalesDataset) {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let DatasetState::Failed(error) = &*state {
            tracing::warn!("D402: Ignoring dataset after failed load: {}", error);
            return;
        }

        tracing::info!("D402: Dataset ready with {} records", dataset.monthly.len());
        *state = DatasetState::Ready {
            dataset: Arc::new(dataset),
            loaded_at: Utc::now(),
        };
        self.clear_cache();
    }

    /// Loading -> Failed
    pub fn set_failed(&self, description: impl Into<String>) {
        let description = description.into();
        tracing::error!("D402: Dataset load failed: {}", description);
        *self
            .state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = DatasetState::Failed(description);
        self.clear_cache();
    }

    pub fn status(&self) -> DataLoadStatus {
        match self.state() {
            DatasetState::Loading => DataLoadStatus {
                state: LoadState::Loading,
                error: None,
                record_count: 0,
                loaded_at: None,
            },
            DatasetState::Ready { dataset, loaded_at } => DataLoadStatus {
                state: LoadState::Ready,
                error: None,
                record_count: dataset.monthly.len(),
                loaded_at: Some(loaded_at),
            },
            DatasetState::Failed(error) => DataLoadStatus {
                state: LoadState::Error,
                error: Some(error),
                record_count: 0,
                loaded_at: None,
            },
        }
    }

    pub fn cached_chart(&self, filters: &TrendFilters) -> Option<Arc<TrendChartResponse>> {
        self.chart_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(filters)
            .cloned()
    }

    /// Memoize a response; new entries are dropped once the cache is full
    pub fn cache_chart(&self, filters: TrendFilters, response: Arc<TrendChartResponse>) {
        let mut cache = self
            .chart_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if cache.len() >= CHART_CACHE_CAPACITY && !cache.contains_key(&filters) {
            tracing::debug!("D402: Chart cache full, not caching {:?}", filters);
            return;
        }
        cache.insert(filters, response);
    }

    pub fn cached_chart_count(&self) -> usize {
        self.chart_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    fn clear_cache(&self) {
        self.chart_cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

/// Run the one-shot load and record the outcome in `store`
pub async fn initialize(store: &DatasetStore, source: DatasetSource) {
    tracing::info!("D402: Loading sales dataset from {:?}", source);
    match load_dataset(&source).await {
        Ok(dataset) => store.set_ready(dataset),
        Err(e) => store.set_failed(e.to_string()),
    }
}
