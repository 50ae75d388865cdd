pub mod filter;
pub mod search;

pub use filter::{apply_filters, matches_filter, matches_filters};
pub use search::DatasetSearch;
