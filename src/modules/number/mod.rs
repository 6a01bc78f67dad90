//! Number module: canonicalization, classification and fuzzy matching of
//! product identifiers ("numbers") taken from filenames and titles.
//!
//! # Architecture
//!
//! - **Chain of rules**: `Canonicalizer` applies `RewriteRule`s in a fixed
//!   order; the order is part of the contract
//! - **Knowledge tables**: studio and tag lists live in `tables` and are
//!   compiled into patterns by the rules and the `Classifier`
//! - **Strategy Pattern**: `SimilarityStrategy` for pluggable matching
//!   algorithms, `WeightedLevenshteinStrategy` being the reference metric;
//!   `build_strategy` blends in Jaro-Winkler when configured
//! - **Configuration Pattern**: `NumberConfig` for non-default tables/limits
//!
//! # Usage
//!
//! ```rust
//! use number_core::modules::number::*;
//!
//! let canonicalizer = Canonicalizer::standard();
//! let number = canonicalizer.canonicalize("ABC-123 - Title [1080p]-cd1.mkv");
//! assert_eq!(number, "ABC-123");
//!
//! let classifier = Classifier::standard();
//! assert!(!classifier.require_face_detection(&number));
//!
//! let strategy = WeightedLevenshteinStrategy::default();
//! assert_eq!(strategy.calculate(&number, "abc-123"), 1.0);
//! ```

pub mod canonicalizer;
pub mod classifier;
pub mod config;
pub mod rewrite_rules;
pub mod similarity_strategy;
pub mod tables;

// Re-export main types
pub use canonicalizer::{Canonicalizer, RuleStep};
pub use classifier::{Classification, Classifier};
pub use config::{NumberConfig, NumberConfigBuilder};
pub use rewrite_rules::{
    DashSpacingRule, ExtensionStripRule, Fc2NormalizeRule, FirstTokenRule, NonAsciiCutRule,
    PartSuffixStripRule, QualityTagStripRule, RewriteRule, SourceTagStripRule,
    StudioPrefixStripRule, WhitespaceTrimRule,
};
pub use similarity_strategy::{
    build_strategy, HybridStrategy, JaroWinklerStrategy, SimilarityStrategy,
    WeightedLevenshteinStrategy,
};
