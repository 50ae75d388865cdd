use std::sync::Arc;
use tracing::debug;

use discovery_core::catalog::Catalog;
use discovery_core::config::ClassifierStrategy;
use discovery_core::types::Topic;

use crate::keywords::KeywordExtractor;

/// Maps a normalized query to a `Topic` using the catalog's keyword lists.
#[derive(Debug, Clone)]
pub struct TopicClassifier {
    catalog: Arc<Catalog>,
    extractor: KeywordExtractor,
    strategy: ClassifierStrategy,
}

impl TopicClassifier {
    pub fn new(catalog: Arc<Catalog>, strategy: ClassifierStrategy) -> Self {
        let extractor = KeywordExtractor::from_catalog(&catalog);
        Self { catalog, extractor, strategy }
    }

    pub fn strategy(&self) -> ClassifierStrategy { self.strategy }

    pub fn detect_topic(&self, normalized: &str) -> Topic {
        if normalized.trim().is_empty() {
            return Topic::Default;
        }
        let topic = match self.strategy {
            ClassifierStrategy::Overlap => self.match_topic(&self.extractor.extract(normalized)),
            ClassifierStrategy::Substring => self.first_substring_match(normalized),
        };
        debug!(query = normalized, %topic, strategy = ?self.strategy, "classified query");
        topic
    }

    /// Per-topic count of keywords equal to a member of that topic's list.
    pub fn scores(&self, keywords: &[String]) -> Vec<(Topic, usize)> {
        Topic::ALL
            .into_iter()
            .map(|topic| {
                let list = self.catalog.topic_keywords(topic);
                (topic, keywords.iter().filter(|k| list.contains(k)).count())
            })
            .collect()
    }

    /// Topic with the strictly highest overlap count; the earlier topic keeps
    /// a tie, and no overlap at all means `Topic::Default`.
    pub fn match_topic(&self, keywords: &[String]) -> Topic {
        let mut best = Topic::Default;
        let mut max_matches = 0;
        for (topic, matches) in self.scores(keywords) {
            if matches > max_matches {
                max_matches = matches;
                best = topic;
            }
        }
        best
    }

    /// First topic, in declaration order, with any keyword contained in the
    /// query text. Order-sensitive: an early substring hit wins.
    pub fn first_substring_match(&self, normalized: &str) -> Topic {
        let query = normalized.to_lowercase();
        Topic::ALL
            .into_iter()
            .find(|topic| self.catalog.topic_keywords(*topic).iter().any(|k| query.contains(k.as_str())))
            .unwrap_or(Topic::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlap() -> TopicClassifier {
        TopicClassifier::new(Arc::new(Catalog::default()), ClassifierStrategy::Overlap)
    }

    #[test]
    fn thriller_movies_is_movies() {
        let c = overlap();
        assert_eq!(c.detect_topic("thriller movies 2024"), Topic::Movies);
        let scores = c.scores(&["thriller".to_string(), "movies".to_string()]);
        assert_eq!(scores[0], (Topic::Movies, 2));
        assert!(scores[1..].iter().all(|(_, n)| *n == 0));
    }

    #[test]
    fn unknown_or_empty_is_default() {
        let c = overlap();
        assert_eq!(c.detect_topic(""), Topic::Default);
        assert_eq!(c.detect_topic("xyz"), Topic::Default);
    }

    #[test]
    fn strict_maximum_wins_and_ties_keep_earlier_topic() {
        let c = overlap();
        // one travel word, two events words
        assert_eq!(c.detect_topic("hotel concert tickets"), Topic::Events);
        // one movies word, one restaurants word
        assert_eq!(c.detect_topic("dinner movie"), Topic::Movies);
    }

    #[test]
    fn repeated_keywords_count_each_time() {
        let c = overlap();
        assert_eq!(c.detect_topic("film food food"), Topic::Restaurants);
    }

    #[test]
    fn substring_strategy_takes_first_hit_in_order() {
        let c = TopicClassifier::new(Arc::new(Catalog::default()), ClassifierStrategy::Substring);
        // "showtime" is a movies keyword even though the query is about a concert
        assert_eq!(c.detect_topic("concert showtime"), Topic::Movies);
        // "restaurants" contains no movie keyword but does contain "restaurant"
        assert_eq!(c.detect_topic("restaurants downtown"), Topic::Restaurants);
        assert_eq!(c.detect_topic("qqq"), Topic::Default);
        assert_eq!(c.detect_topic(""), Topic::Default);
        assert_eq!(c.first_substring_match(""), Topic::Default, "no keyword is a substring of empty text");
    }
}
