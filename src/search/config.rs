//! Configuration types for the difference-set search

use crate::error::ConfigError;
use crate::search::candidate::{MAX_K, MIN_K, candidate_sizes};
use crate::search::provisional::{CANONICAL_PREFIX, ProvisionalSet};

/// What to search: the range of set sizes and where each search starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Smallest set size (k) to search
    pub start: usize,
    /// Largest set size (k) to search
    pub end: usize,
    /// Elements every searched set begins with
    pub prefix: Vec<u32>,
    /// Keep searching past the prefix instead of staying inside it
    pub continue_past_prefix: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: MIN_K,
            end: MAX_K,
            prefix: CANONICAL_PREFIX.to_vec(),
            continue_past_prefix: false,
        }
    }
}

impl SearchConfig {
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_size(self, k: usize) -> Self {
        self.with_range(k, k)
    }

    pub fn with_prefix(mut self, prefix: Vec<u32>) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn with_continue(mut self, continue_past_prefix: bool) -> Self {
        self.continue_past_prefix = continue_past_prefix;
        self
    }

    /// Shortest prefix backtracking may return to.
    ///
    /// Continuing past a custom prefix still keeps the canonical 0, 1.
    pub fn floor(&self) -> usize {
        if self.continue_past_prefix {
            CANONICAL_PREFIX.len()
        } else {
            self.prefix.len()
        }
    }

    /// Check the configuration and return the set sizes it covers.
    ///
    /// The prefix is checked against every size in the range so a bad prefix
    /// fails at startup rather than partway through a run.
    pub fn validate(&self) -> Result<Vec<usize>, ConfigError> {
        for k in [self.start, self.end] {
            if !(MIN_K..=MAX_K).contains(&k) {
                return Err(ConfigError::SizeOutOfRange {
                    k,
                    min: MIN_K,
                    max: MAX_K,
                });
            }
        }
        if self.end < self.start {
            return Err(ConfigError::EmptyRange {
                start: self.start,
                end: self.end,
            });
        }

        let sizes = candidate_sizes(self.start, self.end);
        for &k in &sizes {
            ProvisionalSet::with_prefix(k, &self.prefix)?;
        }
        if sizes.is_empty() {
            // The prefix shape is still worth reporting on its own.
            ProvisionalSet::with_prefix(MAX_K, &self.prefix)?;
        }
        Ok(sizes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.start, 2);
        assert_eq!(config.end, 103);
        assert_eq!(config.prefix, vec![0, 1]);
        assert!(!config.continue_past_prefix);
        assert_eq!(config.floor(), 2);
    }

    #[test]
    fn test_config_builder() {
        let config = SearchConfig::default()
            .with_size(5)
            .with_prefix(vec![0, 1, 3])
            .with_continue(true);

        assert_eq!(config.start, 5);
        assert_eq!(config.end, 5);
        assert_eq!(config.prefix, vec![0, 1, 3]);
        assert_eq!(config.floor(), 2);
        assert_eq!(config.clone().with_continue(false).floor(), 3);
    }

    #[test]
    fn test_validate_sizes() {
        let sizes = SearchConfig::default().with_range(2, 10).validate().unwrap();
        assert_eq!(sizes, vec![2, 3, 4, 5, 6, 8, 9, 10]);

        let sizes = SearchConfig::default().with_size(7).validate().unwrap();
        assert!(sizes.is_empty());
    }

    #[test]
    fn test_validate_range_errors() {
        assert_eq!(
            SearchConfig::default().with_range(1, 5).validate(),
            Err(ConfigError::SizeOutOfRange {
                k: 1,
                min: 2,
                max: 103
            })
        );
        assert!(matches!(
            SearchConfig::default().with_range(5, 104).validate(),
            Err(ConfigError::SizeOutOfRange { k: 104, .. })
        ));
        assert_eq!(
            SearchConfig::default().with_range(9, 5).validate(),
            Err(ConfigError::EmptyRange { start: 9, end: 5 })
        );
    }

    #[test]
    fn test_validate_prefix_errors() {
        assert!(matches!(
            SearchConfig::default()
                .with_size(5)
                .with_prefix(vec![0, 2])
                .validate(),
            Err(ConfigError::NonCanonicalPrefix { .. })
        ));
        // Valid for k = 5 but too long for k = 3
        assert!(matches!(
            SearchConfig::default()
                .with_range(3, 5)
                .with_prefix(vec![0, 1, 4, 14])
                .validate(),
            Err(ConfigError::PrefixTooLong { k: 3, .. })
        ));
        // 20 is out of range modulo 13
        assert!(matches!(
            SearchConfig::default()
                .with_range(4, 5)
                .with_prefix(vec![0, 1, 20])
                .validate(),
            Err(ConfigError::InvalidPrefix { value: 20, k: 4, .. })
        ));
        assert!(matches!(
            SearchConfig::default()
                .with_size(7)
                .with_prefix(vec![1, 0])
                .validate(),
            Err(ConfigError::NonCanonicalPrefix { .. })
        ));
    }
}
