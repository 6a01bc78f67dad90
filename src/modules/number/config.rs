use serde::{Deserialize, Serialize};
use std::path::Path;

use super::tables::MAX_EXTENSION_LENGTH;
use crate::shared::errors::{AppError, AppResult};

/// Largest accepted edit cost; keeps weighted distances far from overflow
pub const MAX_EDIT_COST: usize = 1_000;

/// Configuration for the number pipeline
///
/// Externalizes limits, table extensions and scoring weights so the
/// canonicalizer, classifier and scorer can be built and tested with
/// non-default settings. Unknown JSON fields are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberConfig {
    // Canonicalization
    /// Extensions (dot included) must be shorter than this to be stripped
    pub max_extension_length: usize,

    /// Literal studio names removed in addition to the built-in table
    pub extra_studio_prefixes: Vec<String>,

    // Classification
    /// Literal tags treated as special in addition to the built-in table
    pub extra_special_tags: Vec<String>,

    /// Literal tags treated as uncensored in addition to the built-in table
    pub extra_uncensored_tags: Vec<String>,

    /// Literal prefixes that always require face detection
    pub extra_face_detection_tags: Vec<String>,

    // Similarity
    pub insert_cost: usize,
    pub delete_cost: usize,
    pub replace_cost: usize,

    /// Compare identifiers without folding case
    pub case_sensitive: bool,

    /// Share of Jaro-Winkler in a hybrid score (0.0 disables it)
    pub jaro_winkler_weight: f64,
}

impl NumberConfig {
    /// Creates a configuration matching the built-in behavior
    pub fn new() -> Self {
        Self {
            max_extension_length: MAX_EXTENSION_LENGTH,
            extra_studio_prefixes: Vec::new(),
            extra_special_tags: Vec::new(),
            extra_uncensored_tags: Vec::new(),
            extra_face_detection_tags: Vec::new(),
            // Fuzzy-match thresholds downstream are tuned to 1/1/2
            insert_cost: 1,
            delete_cost: 1,
            replace_cost: 2,
            case_sensitive: false,
            jaro_winkler_weight: 0.0,
        }
    }

    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|err| {
            AppError::IoError(format!("Cannot read {}: {}", path.display(), err))
        })?;
        log::debug!("Loaded number config from {}", path.display());
        Self::from_json_str(&contents)
    }

    /// Validates the configuration
    pub fn validate(&self) -> AppResult<()> {
        if self.max_extension_length == 0 {
            return Err(AppError::ValidationError(
                "max_extension_length must be > 0".to_string(),
            ));
        }

        for (name, cost) in [
            ("insert_cost", self.insert_cost),
            ("delete_cost", self.delete_cost),
            ("replace_cost", self.replace_cost),
        ] {
            if cost == 0 || cost > MAX_EDIT_COST {
                return Err(AppError::ValidationError(format!(
                    "{} must be between 1 and {}, got {}",
                    name, MAX_EDIT_COST, cost
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.jaro_winkler_weight) {
            return Err(AppError::ValidationError(format!(
                "jaro_winkler_weight must be between 0.0 and 1.0, got {}",
                self.jaro_winkler_weight
            )));
        }

        let tag_lists = [
            ("extra_studio_prefixes", &self.extra_studio_prefixes),
            ("extra_special_tags", &self.extra_special_tags),
            ("extra_uncensored_tags", &self.extra_uncensored_tags),
            ("extra_face_detection_tags", &self.extra_face_detection_tags),
        ];
        for (name, tags) in tag_lists {
            if tags.iter().any(|tag| tag.trim().is_empty()) {
                return Err(AppError::ValidationError(format!(
                    "{} cannot contain empty entries",
                    name
                )));
            }
        }

        Ok(())
    }
}

impl Default for NumberConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for NumberConfig to make test setup easier
#[derive(Default)]
pub struct NumberConfigBuilder {
    config: NumberConfig,
}

impl NumberConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: NumberConfig::new(),
        }
    }

    pub fn max_extension_length(mut self, length: usize) -> Self {
        self.config.max_extension_length = length;
        self
    }

    pub fn studio_prefix(mut self, name: impl Into<String>) -> Self {
        self.config.extra_studio_prefixes.push(name.into());
        self
    }

    pub fn special_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.extra_special_tags.push(tag.into());
        self
    }

    pub fn uncensored_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.extra_uncensored_tags.push(tag.into());
        self
    }

    pub fn face_detection_tag(mut self, tag: impl Into<String>) -> Self {
        self.config.extra_face_detection_tags.push(tag.into());
        self
    }

    pub fn costs(mut self, insert: usize, delete: usize, replace: usize) -> Self {
        self.config.insert_cost = insert;
        self.config.delete_cost = delete;
        self.config.replace_cost = replace;
        self
    }

    pub fn case_sensitive(mut self, enable: bool) -> Self {
        self.config.case_sensitive = enable;
        self
    }

    pub fn jaro_winkler_weight(mut self, weight: f64) -> Self {
        self.config.jaro_winkler_weight = weight;
        self
    }

    pub fn build(self) -> AppResult<NumberConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
