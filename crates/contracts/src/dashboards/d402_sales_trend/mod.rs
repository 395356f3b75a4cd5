pub mod dto;
pub mod series_key;

pub use dto::*;
pub use series_key::*;
