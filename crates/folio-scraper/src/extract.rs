//! Pattern-based count extraction from profile page markup.

use regex::Regex;

use crate::error::ScraperError;
use crate::parse::parse_count;

/// Ordered list of candidate patterns; the first one that matches wins.
///
/// Each pattern must have at least one capture group. Group 1 holds the raw
/// count text handed to [`parse_count`].
#[derive(Debug, Clone)]
pub struct ExtractionStrategy {
    patterns: Vec<Regex>,
}

impl ExtractionStrategy {
    /// Compile a strategy from pattern sources, in priority order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn new<I, S>(patterns: I) -> Result<Self, ScraperError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                let p = p.as_ref();
                Regex::new(p).map_err(|source| ScraperError::InvalidPattern {
                    pattern: p.to_owned(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Compile patterns that are known to be valid at build time.
    pub(crate) fn builtin(patterns: &[&str]) -> Self {
        Self {
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("valid built-in extraction pattern"))
                .collect(),
        }
    }

    /// Raw capture from the first matching pattern.
    #[must_use]
    pub fn extract<'a>(&self, body: &'a str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find_map(|re| re.captures(body).and_then(|cap| cap.get(1)))
            .map(|m| m.as_str())
    }

    /// Parsed count from the first matching pattern, `None` if nothing matched.
    #[must_use]
    pub fn extract_count(&self, body: &str) -> Option<u64> {
        self.extract(body).map(parse_count)
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_pattern_wins() {
        let strategy =
            ExtractionStrategy::new([r#""primary":(\d+)"#, r#""fallback":(\d+)"#]).unwrap();
        assert_eq!(
            strategy.extract(r#"{"fallback":2,"primary":1}"#),
            Some("1")
        );
    }

    #[test]
    fn falls_back_when_primary_misses() {
        let strategy =
            ExtractionStrategy::new([r#""primary":(\d+)"#, r#""fallback":(\d+)"#]).unwrap();
        assert_eq!(strategy.extract_count(r#"{"fallback":2500}"#), Some(2500));
    }

    #[test]
    fn no_match_is_none() {
        let strategy = ExtractionStrategy::new([r#""primary":(\d+)"#]).unwrap();
        assert_eq!(strategy.extract_count("<html></html>"), None);
    }

    #[test]
    fn captured_text_goes_through_count_parsing() {
        let strategy = ExtractionStrategy::new([r#""label":"([^"]+)""#]).unwrap();
        assert_eq!(strategy.extract_count(r#"{"label":"1.5M"}"#), Some(1_500_000));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = ExtractionStrategy::new(["(unclosed"]).unwrap_err();
        assert!(matches!(err, ScraperError::InvalidPattern { ref pattern, .. } if pattern == "(unclosed"));
    }

    #[test]
    fn patterns_keep_priority_order() {
        let strategy = ExtractionStrategy::new(["a(b)", "c(d)"]).unwrap();
        assert_eq!(strategy.patterns().collect::<Vec<_>>(), vec!["a(b)", "c(d)"]);
    }
}
