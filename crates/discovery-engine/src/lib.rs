//! discovery-engine
//!
//! End-to-end query processing on top of the query, search and wallet
//! capabilities, plus the HTML newsletter renderer.
pub mod newsletter;
pub mod orchestrator;

pub use newsletter::HtmlNewsletter;
pub use orchestrator::{load_catalog, load_datasets, Orchestrator, OrchestratorStatus, QueryOutcome};
