use once_cell::sync::Lazy;
use serde::Serialize;

use super::config::NumberConfig;
use super::rewrite_rules::{
    DashSpacingRule, ExtensionStripRule, Fc2NormalizeRule, FirstTokenRule, NonAsciiCutRule,
    PartSuffixStripRule, QualityTagStripRule, RewriteRule, SourceTagStripRule,
    StudioPrefixStripRule, WhitespaceTrimRule,
};
use super::tables::MAX_EXTENSION_LENGTH;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::LogContext;

static STANDARD: Lazy<Canonicalizer> = Lazy::new(Canonicalizer::standard);

/// Output of one rule during a traced pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleStep {
    pub rule: &'static str,
    pub output: String,
}

/// Recovers a canonical identifier from a filename or title
///
/// Rules run in insertion order; a full run is one pass. Passes repeat until
/// the output stops changing, so `canonicalize` is idempotent.
pub struct Canonicalizer {
    rules: Vec<Box<dyn RewriteRule>>,
}

impl Canonicalizer {
    /// Create a new empty canonicalizer
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The ten-step chain with built-in tables and limits
    pub fn standard() -> Self {
        Self::new()
            .with_extension_strip(MAX_EXTENSION_LENGTH)
            .with_source_tag_strip()
            .with_dash_spacing()
            .with_quality_tag_strip()
            .with_rule(StudioPrefixStripRule::default())
            .with_fc2_normalize()
            .with_non_ascii_cut()
            .with_first_token()
            .with_part_suffix_strip()
            .with_whitespace_trim()
    }

    /// The ten-step chain configured from `config`
    pub fn default_pipeline(config: &NumberConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self::new()
            .with_extension_strip(config.max_extension_length)
            .with_source_tag_strip()
            .with_dash_spacing()
            .with_quality_tag_strip()
            .with_studio_prefix_strip(&config.extra_studio_prefixes)?
            .with_fc2_normalize()
            .with_non_ascii_cut()
            .with_first_token()
            .with_part_suffix_strip()
            .with_whitespace_trim())
    }

    /// Shared instance of [`Canonicalizer::standard`]
    pub fn shared() -> &'static Canonicalizer {
        &STANDARD
    }

    /// Append any rule
    pub fn with_rule<R: RewriteRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn with_extension_strip(self, max_length: usize) -> Self {
        self.with_rule(ExtensionStripRule::new(max_length))
    }

    pub fn with_source_tag_strip(self) -> Self {
        self.with_rule(SourceTagStripRule)
    }

    pub fn with_dash_spacing(self) -> Self {
        self.with_rule(DashSpacingRule)
    }

    pub fn with_quality_tag_strip(self) -> Self {
        self.with_rule(QualityTagStripRule)
    }

    /// Add studio prefix removal, extending the built-in table
    pub fn with_studio_prefix_strip(self, extra: &[String]) -> AppResult<Self> {
        Ok(self.with_rule(StudioPrefixStripRule::with_extra(extra)?))
    }

    pub fn with_fc2_normalize(self) -> Self {
        self.with_rule(Fc2NormalizeRule)
    }

    pub fn with_non_ascii_cut(self) -> Self {
        self.with_rule(NonAsciiCutRule)
    }

    pub fn with_first_token(self) -> Self {
        self.with_rule(FirstTokenRule)
    }

    pub fn with_part_suffix_strip(self) -> Self {
        self.with_rule(PartSuffixStripRule)
    }

    pub fn with_whitespace_trim(self) -> Self {
        self.with_rule(WhitespaceTrimRule)
    }

    /// Apply one pass of every rule in order
    pub fn apply_once(&self, input: &str) -> String {
        let mut result = input.to_string();

        for rule in &self.rules {
            let next = rule.apply(&result);
            LogContext::rule_applied(rule.name(), &result, &next);
            result = next;
        }

        result
    }

    /// Apply passes until the output is stable
    pub fn canonicalize(&self, input: &str) -> String {
        self.settle(input).0
    }

    /// Stable output and the number of passes it took
    fn settle(&self, input: &str) -> (String, usize) {
        // Each changing pass shortens the string, except a single FC2 rewrite
        let max_passes = input.len() + 2;
        let mut current = self.apply_once(input);

        for pass in 2..=max_passes {
            let next = self.apply_once(&current);
            if next == current {
                if pass > 2 {
                    LogContext::extra_passes(input, &current, pass - 1);
                }
                return (current, pass);
            }
            current = next;
        }

        log::warn!(
            "Canonicalization of '{}' did not settle after {} passes",
            input,
            max_passes
        );
        (current, max_passes)
    }

    /// Per-rule outputs of a single pass, for debugging rule interactions
    pub fn trace(&self, input: &str) -> Vec<RuleStep> {
        let mut current = input.to_string();

        self.rules
            .iter()
            .map(|rule| {
                current = rule.apply(&current);
                RuleStep {
                    rule: rule.name(),
                    output: current.clone(),
                }
            })
            .collect()
    }

    /// Names of the rules in application order
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Get the number of rules in the pipeline
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }
}

impl Default for Canonicalizer {
    fn default() -> Self {
        Self::standard()
    }
}
