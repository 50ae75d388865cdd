use std::collections::HashSet;

use discovery_core::catalog::Catalog;

/// Splits a normalized query into content words.
///
/// Tokens of two characters or fewer and stop words are dropped. Order and
/// duplicates are kept, so a repeated word counts twice when scoring.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    stop_words: HashSet<String>,
}

impl Default for KeywordExtractor {
    fn default() -> Self { Self::from_catalog(&Catalog::default()) }
}

impl KeywordExtractor {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self { stop_words: catalog.stop_words().iter().cloned().collect() }
    }

    pub fn extract(&self, normalized: &str) -> Vec<String> {
        normalized
            .trim()
            .to_lowercase()
            .split(' ')
            .filter(|w| w.chars().count() > 2 && !self.stop_words.contains(*w))
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_stop_words_and_short_tokens() {
        let e = KeywordExtractor::default();
        assert_eq!(e.extract("thriller movies near me"), vec!["thriller", "movies"]);
        assert_eq!(e.extract("dinner and the show"), vec!["dinner", "show"]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let e = KeywordExtractor::default();
        assert_eq!(e.extract("vegan vegan food"), vec!["vegan", "vegan", "food"]);
    }

    #[test]
    fn empty_input_yields_nothing() {
        let e = KeywordExtractor::default();
        assert!(e.extract("").is_empty());
        assert!(e.extract("a an at").is_empty());
    }
}
