use strsim::jaro_winkler;

use super::config::NumberConfig;
use crate::shared::errors::{AppError, AppResult};

/// Scorer described by `config`
///
/// The weighted Levenshtein metric alone unless `jaro_winkler_weight` is
/// set, in which case Jaro-Winkler takes that share of a hybrid score.
/// Collaborators ranking provider candidates build their scorer here.
pub fn build_strategy(config: &NumberConfig) -> AppResult<Box<dyn SimilarityStrategy>> {
    let weighted = WeightedLevenshteinStrategy::from_config(config)?;
    if config.jaro_winkler_weight == 0.0 {
        return Ok(Box::new(weighted));
    }

    let strategy = HybridStrategy::new(vec![
        (Box::new(weighted), 1.0 - config.jaro_winkler_weight),
        (Box::new(JaroWinklerStrategy), config.jaro_winkler_weight),
    ])?;
    log::debug!(
        "Using hybrid similarity with Jaro-Winkler weight {}",
        config.jaro_winkler_weight
    );
    Ok(Box::new(strategy))
}

/// Strategy for calculating similarity between two identifiers
///
/// This trait enables different similarity algorithms to be used interchangeably,
/// making the system testable and extensible.
pub trait SimilarityStrategy: Send + Sync {
    /// Calculate similarity between query and target
    ///
    /// Returns a value between 0.0 (completely different) and 1.0 (identical)
    fn calculate(&self, query: &str, target: &str) -> f64;

    /// Get the name of this strategy for logging/debugging
    fn name(&self) -> &'static str;
}

/// Levenshtein distance with per-operation costs, normalized by the longer
/// input's length in chars
///
/// The default costs (insert 1, delete 1, replace 2) make a replacement
/// exactly as expensive as a delete plus an insert. Acceptance thresholds of
/// callers depend on these exact weights.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLevenshteinStrategy {
    pub insert_cost: usize,
    pub delete_cost: usize,
    pub replace_cost: usize,
    pub case_sensitive: bool,
}

impl WeightedLevenshteinStrategy {
    pub fn new(insert_cost: usize, delete_cost: usize, replace_cost: usize) -> Self {
        Self {
            insert_cost,
            delete_cost,
            replace_cost,
            case_sensitive: false,
        }
    }

    pub fn from_config(config: &NumberConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self {
            insert_cost: config.insert_cost,
            delete_cost: config.delete_cost,
            replace_cost: config.replace_cost,
            case_sensitive: config.case_sensitive,
        })
    }

    /// Weighted edit distance turning `query` into `target`
    pub fn distance(&self, query: &str, target: &str) -> usize {
        let (a, b) = self.prepare(query, target);
        self.distance_chars(&a, &b)
    }

    fn prepare(&self, query: &str, target: &str) -> (Vec<char>, Vec<char>) {
        if self.case_sensitive {
            (query.chars().collect(), target.chars().collect())
        } else {
            (
                query.to_lowercase().chars().collect(),
                target.to_lowercase().chars().collect(),
            )
        }
    }

    // Saturates instead of overflowing on oversized costs
    fn distance_chars(&self, a: &[char], b: &[char]) -> usize {
        if a.is_empty() {
            return self.insert_cost.saturating_mul(b.len());
        }
        if b.is_empty() {
            return self.delete_cost.saturating_mul(a.len());
        }

        // Two rolling columns over `b`
        let mut prev: Vec<usize> = (0..=b.len())
            .map(|j| self.insert_cost.saturating_mul(j))
            .collect();
        let mut col = vec![0; b.len() + 1];

        for (i, ca) in a.iter().enumerate() {
            col[0] = self.delete_cost.saturating_mul(i + 1);
            for (j, cb) in b.iter().enumerate() {
                let delete = prev[j + 1].saturating_add(self.delete_cost);
                let insert = col[j].saturating_add(self.insert_cost);
                let replace = if ca == cb {
                    prev[j]
                } else {
                    prev[j].saturating_add(self.replace_cost)
                };
                col[j + 1] = delete.min(insert).min(replace);
            }
            std::mem::swap(&mut prev, &mut col);
        }

        prev[b.len()]
    }
}

impl Default for WeightedLevenshteinStrategy {
    fn default() -> Self {
        Self::new(1, 1, 2)
    }
}

impl SimilarityStrategy for WeightedLevenshteinStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        let (a, b) = self.prepare(query, target);
        let max_len = a.len().max(b.len());
        if max_len == 0 {
            return 1.0;
        }

        let distance = self.distance_chars(&a, &b);
        (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "WeightedLevenshtein"
    }
}

/// Jaro-Winkler similarity, case-insensitive
///
/// Gives more weight to matching prefixes, which suits studio codes.
#[derive(Debug, Clone)]
pub struct JaroWinklerStrategy;

impl SimilarityStrategy for JaroWinklerStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        jaro_winkler(&query.to_lowercase(), &target.to_lowercase())
    }

    fn name(&self) -> &'static str {
        "JaroWinkler"
    }
}

/// Hybrid strategy that combines multiple strategies with weighted average
pub struct HybridStrategy {
    strategies: Vec<(Box<dyn SimilarityStrategy>, f64)>,
}

impl HybridStrategy {
    /// Create a new hybrid strategy
    ///
    /// Weights must be non-negative and sum to 1.0 (within 0.01).
    pub fn new(strategies: Vec<(Box<dyn SimilarityStrategy>, f64)>) -> AppResult<Self> {
        if strategies.iter().any(|(_, weight)| *weight < 0.0) {
            return Err(AppError::ValidationError(
                "Strategy weights must be non-negative".to_string(),
            ));
        }

        let weight_sum: f64 = strategies.iter().map(|(_, w)| w).sum();
        if (weight_sum - 1.0).abs() >= 0.01 {
            return Err(AppError::ValidationError(format!(
                "Strategy weights must sum to 1.0, got {}",
                weight_sum
            )));
        }

        Ok(Self { strategies })
    }
}

impl SimilarityStrategy for HybridStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        let score: f64 = self
            .strategies
            .iter()
            .map(|(strategy, weight)| strategy.calculate(query, target) * weight)
            .sum();
        score.clamp(0.0, 1.0)
    }

    fn name(&self) -> &'static str {
        "Hybrid"
    }
}
