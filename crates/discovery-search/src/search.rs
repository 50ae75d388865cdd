use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

use discovery_core::dataset::Datasets;
use discovery_core::types::{ActiveFilters, DataItem, SearchResult, Topic};

use crate::filter::apply_filters;

/// Linear scan over the read-only topic datasets. Results keep dataset order;
/// nothing is ranked.
#[derive(Debug, Clone)]
pub struct DatasetSearch {
    datasets: Arc<Datasets>,
}

impl DatasetSearch {
    pub fn new(datasets: Arc<Datasets>) -> Self { Self { datasets } }

    pub fn datasets(&self) -> &Datasets { &self.datasets }

    /// Items with any top-level string field containing the whole query
    /// (case-insensitive), then narrowed by every active filter.
    pub fn search(&self, topic: Topic, query: &str, active: &ActiveFilters) -> SearchResult {
        let items = self.datasets.get(topic);
        let matched: Vec<DataItem> = if query.is_empty() {
            items.to_vec()
        } else {
            let needle = query.to_lowercase();
            items.iter().filter(|item| any_string_field(item, |s| s.contains(&needle))).cloned().collect()
        };
        let results = apply_filters(&matched, active);
        if results.is_empty() {
            info!("No results for topic {}, query: {}", topic, query);
        } else {
            debug!("{} of {} {} items matched '{}'", results.len(), items.len(), topic, query);
        }
        results
    }

    pub fn search_limited(&self, topic: Topic, query: &str, active: &ActiveFilters, limit: usize) -> SearchResult {
        let mut results = self.search(topic, query, active);
        results.truncate(limit);
        results
    }

    /// Looser match used for result previews: the query is split into words
    /// longer than two characters and an item is kept when any word occurs in
    /// any top-level string field.
    pub fn fetch(&self, topic: Topic, query: &str, limit: usize) -> SearchResult {
        let mut results = self.fetch_matching(topic, query);
        results.truncate(limit);
        debug!("fetched {} {} items for '{}'", results.len(), topic, query);
        results
    }

    /// `fetch` narrowed by the active filters. The limit applies to what is
    /// left after filtering.
    pub fn fetch_filtered(&self, topic: Topic, query: &str, active: &ActiveFilters, limit: usize) -> SearchResult {
        let mut results = apply_filters(&self.fetch_matching(topic, query), active);
        results.truncate(limit);
        debug!("fetched {} filtered {} items for '{}'", results.len(), topic, query);
        results
    }

    fn fetch_matching(&self, topic: Topic, query: &str) -> Vec<DataItem> {
        let items = self.datasets.get(topic);
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered.split(' ').filter(|w| w.chars().count() > 2).collect();
        if query.is_empty() {
            return items.to_vec();
        }
        items
            .iter()
            .filter(|item| words.iter().any(|w| any_string_field(item, |s| s.contains(w))))
            .cloned()
            .collect()
    }
}

fn any_string_field(item: &DataItem, pred: impl Fn(&str) -> bool) -> bool {
    item.values().any(|v| match v {
        Value::String(s) => pred(&s.to_lowercase()),
        _ => false,
    })
}
