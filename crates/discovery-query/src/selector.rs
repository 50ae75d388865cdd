use std::cmp::Reverse;
use std::sync::Arc;
use tracing::{debug, warn};

use discovery_core::catalog::Catalog;
use discovery_core::config::{ClassifierStrategy, Settings};
use discovery_core::error::{Error, Result};
use discovery_core::types::{FilterDescriptor, Topic};

use crate::classifier::TopicClassifier;
use crate::keywords::KeywordExtractor;
use crate::normalizer::QueryNormalizer;

/// Picks the filters to show for a query and orders them by relevance.
#[derive(Debug, Clone)]
pub struct FilterSelector {
    catalog: Arc<Catalog>,
    normalizer: QueryNormalizer,
    extractor: KeywordExtractor,
    classifier: TopicClassifier,
    max_filters: usize,
}

impl FilterSelector {
    pub fn new(catalog: Arc<Catalog>, normalizer: QueryNormalizer, strategy: ClassifierStrategy, max_filters: usize) -> Self {
        let extractor = KeywordExtractor::from_catalog(&catalog);
        let classifier = TopicClassifier::new(catalog.clone(), strategy);
        Self { catalog, normalizer, extractor, classifier, max_filters }
    }

    pub fn from_settings(catalog: Arc<Catalog>, settings: &Settings) -> Self {
        Self::new(
            catalog,
            QueryNormalizer::new(settings.query.min_length),
            settings.classifier.strategy,
            settings.filters.max_filters,
        )
    }

    /// Never fails: any error degrades to the topic-agnostic default list.
    pub fn select_filters(&self, query: &str) -> Vec<FilterDescriptor> {
        match self.try_select(query) {
            Ok(filters) => filters,
            Err(e) => {
                warn!("{}", Error::SelectionFailure(e.to_string()));
                self.default_filters()
            }
        }
    }

    pub fn default_filters(&self) -> Vec<FilterDescriptor> {
        self.catalog.default_filters().to_vec()
    }

    fn try_select(&self, query: &str) -> Result<Vec<FilterDescriptor>> {
        let normalized = self.normalizer.parse(query)?;
        let keywords = self.extractor.extract(&normalized);

        let topic = self.classifier.detect_topic(&normalized);
        if topic == Topic::Default {
            return Ok(self.default_filters());
        }

        let filters = self.catalog.filters_for_topic(topic);
        if filters.is_empty() {
            return Ok(self.default_filters());
        }
        Ok(self.prioritize(filters, &keywords))
    }

    /// Score = number of keywords found in the filter's synonym list. Stable
    /// descending sort, so catalog order breaks ties.
    pub fn prioritize(&self, filters: &[FilterDescriptor], keywords: &[String]) -> Vec<FilterDescriptor> {
        let mut scored: Vec<(usize, &FilterDescriptor)> = filters
            .iter()
            .map(|f| {
                let synonyms = self.catalog.filter_keywords(&f.id);
                (keywords.iter().filter(|k| synonyms.contains(k)).count(), f)
            })
            .collect();
        scored.sort_by_key(|(score, _)| Reverse(*score));
        debug!(
            ranking = ?scored.iter().map(|(s, f)| format!("{}={}", f.id, s)).collect::<Vec<_>>(),
            "prioritized filters"
        );
        scored.into_iter().take(self.max_filters).map(|(_, f)| f.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> FilterSelector {
        FilterSelector::from_settings(Arc::new(Catalog::default()), &Settings::default())
    }

    fn ids(filters: &[FilterDescriptor]) -> Vec<&str> {
        filters.iter().map(|f| f.id.as_str()).collect()
    }

    #[test]
    fn synonym_hits_move_filter_to_front() {
        let s = selector();
        let filters = s.select_filters("trailer showtime screening");
        assert_eq!(ids(&filters), vec!["showtimes", "trailers", "in_theaters"]);
    }

    #[test]
    fn catalog_order_is_kept_without_hits() {
        let s = selector();
        assert_eq!(ids(&s.select_filters("comedy movies")), vec!["showtimes", "trailers", "in_theaters"]);
    }

    #[test]
    fn later_filter_can_overtake_earlier_ones() {
        let s = selector();
        let filters = s.select_filters("cheap laptop price budget");
        assert_eq!(ids(&filters), vec!["prices", "specs", "reviews"]);
    }

    #[test]
    fn invalid_or_unmatched_queries_fall_back_to_default() {
        let s = selector();
        assert!(s.select_filters("ab").is_empty());
        assert!(s.select_filters("something unrelated").is_empty());
    }

    #[test]
    fn result_is_truncated_to_max_filters() {
        let mut settings = Settings::default();
        settings.filters.max_filters = 2;
        let s = FilterSelector::from_settings(Arc::new(Catalog::default()), &settings);
        assert_eq!(ids(&s.select_filters("vegan restaurant")), vec!["dietary", "reservations"]);
    }
}
