//! Static filter templates and keyword tables.
//!
//! A `Catalog` is built once (built-in tables or a JSON override file),
//! validated, and then shared read-only by the classifier, the filter
//! selector and the newsletter renderer.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{FilterDescriptor, Topic};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Ordered filter templates per topic.
    pub filters: BTreeMap<Topic, Vec<FilterDescriptor>>,
    /// Words whose presence in a query votes for a topic.
    pub topic_keywords: BTreeMap<Topic, Vec<String>>,
    /// Synonyms that raise a filter's priority, keyed by filter id.
    pub filter_keywords: BTreeMap<String, Vec<String>>,
    pub stop_words: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for Catalog {
    fn default() -> Self {
        let mut filters = BTreeMap::new();
        filters.insert(
            Topic::Movies,
            vec![
                FilterDescriptor::checkbox("showtimes", "Showtimes Near Me", true),
                FilterDescriptor::checkbox("trailers", "Include Trailers", true),
                FilterDescriptor::checkbox("in_theaters", "Currently in Theaters", false),
            ],
        );
        filters.insert(
            Topic::Restaurants,
            vec![
                FilterDescriptor::checkbox("reservations", "Reservations Tonight", true),
                FilterDescriptor::multi_select("ambiance", "Ambiance", &["romantic", "casual", "formal"], false),
                FilterDescriptor::multi_select("dietary", "Dietary Options", &["vegan", "gluten-free", "halal"], true),
            ],
        );
        filters.insert(
            Topic::Travel,
            vec![
                FilterDescriptor::checkbox("hotels", "Hotel Deals", true),
                FilterDescriptor::checkbox("flights", "Flight Options", true),
                FilterDescriptor::checkbox("weather", "Local Weather", false),
            ],
        );
        filters.insert(
            Topic::Events,
            vec![
                FilterDescriptor::checkbox("tickets", "Ticket Availability", true),
                FilterDescriptor::checkbox("schedules", "Event Schedules", true),
                FilterDescriptor::checkbox("venues", "Venue Details", false),
            ],
        );
        filters.insert(
            Topic::Tech,
            vec![
                FilterDescriptor::checkbox("specs", "Product Specs", true),
                FilterDescriptor::checkbox("reviews", "User Reviews", true),
                FilterDescriptor::slider("prices", "Price Range", 0.0, 1000.0, false),
            ],
        );
        filters.insert(Topic::Default, Vec::new());

        let mut topic_keywords = BTreeMap::new();
        topic_keywords.insert(
            Topic::Movies,
            words(&[
                "movie", "movies", "film", "films", "cinema", "thriller", "comedy", "drama", "showtime", "showtimes",
                "trailer", "trailers",
            ]),
        );
        topic_keywords.insert(
            Topic::Restaurants,
            words(&[
                "restaurant", "restaurants", "food", "dinner", "lunch", "cuisine", "reservation", "reservations", "menu",
            ]),
        );
        topic_keywords.insert(
            Topic::Travel,
            words(&[
                "travel", "destination", "destinations", "hotel", "hotels", "flight", "flights", "vacation", "visa",
                "weather",
            ]),
        );
        topic_keywords.insert(
            Topic::Events,
            words(&[
                "event", "events", "festival", "festivals", "concert", "concerts", "conference", "show", "shows",
                "ticket", "tickets", "schedule",
            ]),
        );
        topic_keywords.insert(
            Topic::Tech,
            words(&[
                "tech", "gadget", "gadgets", "device", "devices", "laptop", "laptops", "phone", "phones", "vr", "drone",
                "drones",
            ]),
        );
        topic_keywords.insert(Topic::Default, Vec::new());

        let filter_keywords: BTreeMap<String, Vec<String>> = [
            ("showtimes", &["showtime", "showtimes", "screening", "times"][..]),
            ("trailers", &["trailer", "trailers", "preview"][..]),
            ("in_theaters", &["theater", "theaters", "theatre", "cinema"][..]),
            ("reservations", &["reservation", "reservations", "booking", "table"][..]),
            ("ambiance", &["ambiance", "romantic", "casual", "formal"][..]),
            ("dietary", &["vegan", "vegetarian", "gluten-free", "halal"][..]),
            ("hotels", &["hotel", "hotels", "stay", "resort"][..]),
            ("flights", &["flight", "flights", "airfare", "fly"][..]),
            ("weather", &["weather", "forecast", "climate"][..]),
            ("tickets", &["ticket", "tickets", "admission"][..]),
            ("schedules", &["schedule", "date", "when", "lineup"][..]),
            ("venues", &["venue", "venues", "location", "where"][..]),
            ("specs", &["spec", "specs", "specifications", "hardware"][..]),
            ("reviews", &["review", "reviews", "rating", "ratings"][..]),
            ("prices", &["price", "prices", "cost", "budget", "cheap"][..]),
        ]
        .into_iter()
        .map(|(id, syn)| (id.to_string(), words(syn)))
        .collect();

        Self {
            filters,
            topic_keywords,
            filter_keywords,
            stop_words: words(&["in", "near", "at", "for", "on", "the", "a", "an", "and"]),
        }
    }
}

impl Catalog {
    /// Load and validate a catalog from a JSON file with the same shape as
    /// the serialized `Catalog`.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|e| Error::InvalidConfig(format!("cannot read catalog {}: {}", path.display(), e)))?;
        let catalog: Catalog = serde_json::from_str(&raw)
            .map_err(|e| Error::InvalidConfig(format!("cannot parse catalog {}: {}", path.display(), e)))?;
        catalog.validate()?;
        info!(path = %path.display(), topics = catalog.filters.len(), "loaded filter catalog");
        Ok(catalog)
    }

    /// Filter ids must be unique within a topic, and every synonym entry must
    /// name a filter that exists somewhere in the catalog.
    pub fn validate(&self) -> Result<()> {
        let mut known = HashSet::new();
        for (topic, list) in &self.filters {
            let mut seen = HashSet::new();
            for f in list {
                if !seen.insert(f.id.as_str()) {
                    return Err(Error::InvalidConfig(format!("duplicate filter id '{}' in topic {}", f.id, topic)));
                }
                known.insert(f.id.as_str());
            }
        }
        for id in self.filter_keywords.keys() {
            if !known.contains(id.as_str()) {
                return Err(Error::InvalidConfig(format!("filter keyword map references unknown filter '{}'", id)));
            }
        }
        Ok(())
    }

    pub fn filters_for_topic(&self, topic: Topic) -> &[FilterDescriptor] {
        self.filters.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Topic-agnostic fallback list.
    pub fn default_filters(&self) -> &[FilterDescriptor] {
        self.filters_for_topic(Topic::Default)
    }

    pub fn validate_filter(&self, filter_id: &str, topic: Topic) -> bool {
        self.filters_for_topic(topic).iter().any(|f| f.id == filter_id)
    }

    pub fn topic_keywords(&self, topic: Topic) -> &[String] {
        self.topic_keywords.get(&topic).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn filter_keywords(&self, filter_id: &str) -> &[String] {
        self.filter_keywords.get(filter_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn stop_words(&self) -> &[String] {
        &self.stop_words
    }

    pub fn descriptor(&self, topic: Topic, filter_id: &str) -> Option<&FilterDescriptor> {
        self.filters_for_topic(topic).iter().find(|f| f.id == filter_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = Catalog::default();
        assert!(catalog.validate().is_ok());
        assert!(catalog.default_filters().is_empty());
        assert_eq!(catalog.filters_for_topic(Topic::Movies)[0].id, "showtimes");
    }

    #[test]
    fn dangling_synonym_entry_is_rejected() {
        let mut catalog = Catalog::default();
        catalog.filter_keywords.insert("genres".to_string(), vec!["genre".to_string()]);
        let err = catalog.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn duplicate_ids_within_topic_are_rejected() {
        let mut catalog = Catalog::default();
        catalog
            .filters
            .entry(Topic::Tech)
            .or_default()
            .push(FilterDescriptor::checkbox("specs", "Specs again", false));
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn validate_filter_checks_topic_membership() {
        let catalog = Catalog::default();
        assert!(catalog.validate_filter("dietary", Topic::Restaurants));
        assert!(!catalog.validate_filter("dietary", Topic::Movies));
    }
}
