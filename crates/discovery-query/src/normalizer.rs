use discovery_core::error::{Error, Result};

/// Trims, lowercases and collapses whitespace; rejects queries that are too short.
#[derive(Debug, Clone)]
pub struct QueryNormalizer {
    min_length: usize,
}

impl Default for QueryNormalizer {
    fn default() -> Self { Self { min_length: 3 } }
}

impl QueryNormalizer {
    pub fn new(min_length: usize) -> Self { Self { min_length } }

    pub fn min_length(&self) -> usize { self.min_length }

    pub fn normalize(&self, raw: &str) -> String {
        raw.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
    }

    pub fn validate(&self, raw: &str) -> bool {
        self.normalize(raw).chars().count() >= self.min_length
    }

    pub fn parse(&self, raw: &str) -> Result<String> {
        let normalized = self.normalize(raw);
        if normalized.chars().count() < self.min_length {
            return Err(Error::InvalidQuery(format!(
                "too short or empty (need at least {} characters, got '{}')",
                self.min_length, normalized
            )));
        }
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_lowercases_and_collapses() {
        let n = QueryNormalizer::default();
        assert_eq!(n.normalize("  Thriller   Movies  "), "thriller movies");
        assert_eq!(n.normalize("Vegan\t\tfood\nnear me"), "vegan food near me");
        assert_eq!(n.normalize("   "), "");
    }

    #[test]
    fn validate_uses_minimum_length() {
        let n = QueryNormalizer::default();
        assert!(!n.validate("ab"));
        assert!(n.validate("abc"));
        assert!(n.validate("  a   b "), "the collapsed inner space counts");
        assert!(!n.validate("   ab   "));
    }

    #[test]
    fn parse_rejects_short_queries() {
        let n = QueryNormalizer::default();
        assert!(matches!(n.parse(""), Err(Error::InvalidQuery(_))));
        assert!(matches!(n.parse(" x "), Err(Error::InvalidQuery(_))));
        assert_eq!(n.parse("  Jazz  Concert ").unwrap(), "jazz concert");
    }
}
