use serde::Serialize;
use std::sync::Arc;

use discovery_core::catalog::Catalog;
use discovery_core::config::Settings;
use discovery_core::error::Result;
use discovery_core::types::{FilterDescriptor, Topic};

use crate::classifier::TopicClassifier;
use crate::keywords::KeywordExtractor;
use crate::normalizer::QueryNormalizer;
use crate::selector::FilterSelector;

/// Everything derived from one raw query before touching a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryAnalysis {
    pub normalized: String,
    pub keywords: Vec<String>,
    pub topic: Topic,
    pub filters: Vec<FilterDescriptor>,
}

/// Normalizer → extractor → classifier → selector, wired from one catalog.
#[derive(Debug, Clone)]
pub struct QueryPipeline {
    normalizer: QueryNormalizer,
    extractor: KeywordExtractor,
    classifier: TopicClassifier,
    selector: FilterSelector,
}

impl QueryPipeline {
    pub fn new(catalog: Arc<Catalog>, settings: &Settings) -> Self {
        Self {
            normalizer: QueryNormalizer::new(settings.query.min_length),
            extractor: KeywordExtractor::from_catalog(&catalog),
            classifier: TopicClassifier::new(catalog.clone(), settings.classifier.strategy),
            selector: FilterSelector::from_settings(catalog, settings),
        }
    }

    pub fn normalizer(&self) -> &QueryNormalizer { &self.normalizer }

    pub fn extractor(&self) -> &KeywordExtractor { &self.extractor }

    pub fn classifier(&self) -> &TopicClassifier { &self.classifier }

    pub fn selector(&self) -> &FilterSelector { &self.selector }

    /// Fails only with `InvalidQuery`; topic and filter steps always yield a value.
    pub fn analyze(&self, raw: &str) -> Result<QueryAnalysis> {
        let normalized = self.normalizer.parse(raw)?;
        let keywords = self.extractor.extract(&normalized);
        let topic = self.classifier.detect_topic(&normalized);
        let filters = self.selector.select_filters(&normalized);
        Ok(QueryAnalysis { normalized, keywords, topic, filters })
    }
}
