use thiserror::Error;

/// Errors of the sales trend dashboard
#[derive(Debug, Error)]
pub enum TrendError {
    #[error("Sales data is still loading")]
    NotReady,

    #[error("Sales data failed to load: {0}")]
    LoadFailed(String),

    #[error("Invalid value for {field}: {value:?}")]
    InvalidFilter { field: &'static str, value: String },
}
