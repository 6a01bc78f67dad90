//! Canonicalization, classification and similarity scoring for product
//! identifiers ("numbers") recovered from filenames and titles.
//!
//! The free functions below use shared, lazily built instances with the
//! built-in tables. Build a [`Canonicalizer`], [`Classifier`] or scorer
//! ([`build_strategy`]) from a [`NumberConfig`] for anything else.
//!
//! ```rust
//! assert_eq!(number_core::trim("fc2ppv-1234567"), "FC2-1234567");
//! assert!(number_core::is_special("FC2-1234567"));
//! assert_eq!(number_core::similarity("ABC-123", "abc-123"), 1.0);
//! ```

pub mod modules;
pub mod shared;

use once_cell::sync::Lazy;

pub use modules::number::{
    build_strategy, Canonicalizer, Classification, Classifier, HybridStrategy,
    JaroWinklerStrategy, NumberConfig, NumberConfigBuilder, RewriteRule, RuleStep,
    SimilarityStrategy, WeightedLevenshteinStrategy,
};
pub use shared::{init_logger, AppError, AppResult};

static SIMILARITY: Lazy<WeightedLevenshteinStrategy> =
    Lazy::new(WeightedLevenshteinStrategy::default);

/// Strips filename noise and returns the canonical identifier.
///
/// Never fails; the result may be empty.
pub fn trim(input: &str) -> String {
    Canonicalizer::shared().canonicalize(input)
}

pub fn is_uncensored(number: &str) -> bool {
    Classifier::shared().is_uncensored(number)
}

pub fn is_special(number: &str) -> bool {
    Classifier::shared().is_special(number)
}

pub fn require_face_detection(number: &str) -> bool {
    Classifier::shared().require_face_detection(number)
}

pub fn classify(number: &str) -> Classification {
    Classifier::shared().classify(number)
}

/// Case-insensitive weighted edit-distance similarity in `[0, 1]`
/// (insert 1, delete 1, replace 2).
pub fn similarity(a: &str, b: &str) -> f64 {
    SIMILARITY.calculate(a, b)
}
