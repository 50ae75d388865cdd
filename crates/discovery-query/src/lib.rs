//! discovery-query
//!
//! Query understanding: normalization, keyword extraction, topic
//! classification and filter selection. All components are pure and hold
//! only an `Arc<Catalog>`, so they can be shared across threads freely.
pub mod classifier;
pub mod keywords;
pub mod normalizer;
pub mod pipeline;
pub mod selector;

pub use classifier::TopicClassifier;
pub use keywords::KeywordExtractor;
pub use normalizer::QueryNormalizer;
pub use pipeline::{QueryAnalysis, QueryPipeline};
pub use selector::FilterSelector;
