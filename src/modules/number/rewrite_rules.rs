use once_cell::sync::Lazy;
use regex::Regex;

use super::tables::{alternation, extended, QUALITY_TAGS, SPACE, STUDIO_PREFIXES};
use crate::shared::errors::AppResult;

/// A single rewrite step of the canonicalization chain
///
/// Each rule is total over any input and never makes its input longer,
/// which is what lets the canonicalizer iterate the chain to a fixpoint.
/// Rules that peel repeated noise (extensions, source tags, part suffixes)
/// peel all of it in one application and in linear time.
pub trait RewriteRule: Send + Sync {
    fn apply(&self, input: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Longest part suffix without trailing whitespace (`-cd12`)
const PART_SUFFIX_WINDOW: usize = 5;

static DASH_SPACING_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i){}+-{}+", SPACE, SPACE);
    Regex::new(&pattern).expect("valid dash spacing pattern")
});

static QUALITY_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(
        r"(?i)[-_]{}+|\[.*]",
        alternation(QUALITY_TAGS.iter().copied())
    );
    Regex::new(&pattern).expect("valid quality tag table")
});

static STUDIO_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    studio_prefix_regex(&extended(STUDIO_PREFIXES, &[])).expect("valid studio prefix table")
});

static FC2_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)^{}*FC2(?:[-_]?PPV)?[-_]", SPACE);
    Regex::new(&pattern).expect("valid fc2 pattern")
});

static PART_SUFFIX_RE: Lazy<Regex> = Lazy::new(|| {
    let pattern = format!(r"(?i)(?:[-_](?:c|ch|cd[0-9]{{1,2}})|ch){}*$", SPACE);
    Regex::new(&pattern).expect("valid part suffix pattern")
});

fn studio_prefix_regex(prefixes: &[String]) -> AppResult<Regex> {
    let pattern = format!(
        r"(?i)[-_\t\n\f\r ]*{}(?:[-_\t\n\f\r ]*|$)",
        alternation(prefixes.iter().map(String::as_str))
    );
    Ok(Regex::new(&pattern)?)
}

fn is_ascii_space(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
}

/// Removes short trailing file extensions (`.mp4`, `.part.mkv`, ...)
///
/// An extension starts at the last `.` of the final `/`-separated element.
/// Extensions whose length (dot included) reaches `max_length` are kept,
/// since they are more likely part of the identifier than a file type.
/// Stacked short extensions are removed one after another.
#[derive(Debug, Clone)]
pub struct ExtensionStripRule {
    max_length: usize,
}

impl ExtensionStripRule {
    pub fn new(max_length: usize) -> Self {
        Self { max_length }
    }

    /// End of `input` once every short extension is gone
    fn stripped_end(&self, input: &str) -> usize {
        let element_start = input.rfind('/').map_or(0, |slash| slash + 1);
        let mut end = input.len();

        // Each search only scans the extension it removes
        while let Some(dot) = input[element_start..end].rfind('.') {
            let dot = element_start + dot;
            if end - dot >= self.max_length {
                break;
            }
            end = dot;
        }

        end
    }
}

impl RewriteRule for ExtensionStripRule {
    fn apply(&self, input: &str) -> String {
        input[..self.stripped_end(input)].to_string()
    }

    fn name(&self) -> &'static str {
        "ExtensionStrip"
    }
}

/// Keeps only what follows the first `@` (`site@NUMBER` uploads)
///
/// Tags stacked on the identifier (`mirror@site@NUMBER`) are dropped in the
/// same application; an `@` in a later whitespace-delimited token is left
/// for the first-token rule to discard.
#[derive(Debug, Clone)]
pub struct SourceTagStripRule;

impl RewriteRule for SourceTagStripRule {
    fn apply(&self, input: &str) -> String {
        let rest = match input.split_once('@') {
            Some((_, rest)) => rest,
            None => return input.to_string(),
        };

        let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        match rest[..token_end].rfind('@') {
            Some(at) => rest[at + 1..].to_string(),
            None => rest.to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "SourceTagStrip"
    }
}

/// Collapses `NUMBER - Title` separators into a single space
#[derive(Debug, Clone)]
pub struct DashSpacingRule;

impl RewriteRule for DashSpacingRule {
    fn apply(&self, input: &str) -> String {
        DASH_SPACING_RE.replace_all(input, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "DashSpacing"
    }
}

/// Removes resolution, codec and release tags plus bracketed groups
///
/// Tags only count when glued to the identifier with `-` or `_`, and any
/// number of them may follow one separator (`-1080px264`).
#[derive(Debug, Clone)]
pub struct QualityTagStripRule;

impl RewriteRule for QualityTagStripRule {
    fn apply(&self, input: &str) -> String {
        QUALITY_TAG_RE.replace_all(input, "").into_owned()
    }

    fn name(&self) -> &'static str {
        "QualityTagStrip"
    }
}

/// Removes known studio/label names together with surrounding separators
#[derive(Debug, Clone)]
pub struct StudioPrefixStripRule {
    pattern: Regex,
}

impl StudioPrefixStripRule {
    /// Built-in studio table extended with literal names
    pub fn with_extra(extra: &[String]) -> AppResult<Self> {
        if extra.is_empty() {
            return Ok(Self::default());
        }
        Ok(Self {
            pattern: studio_prefix_regex(&extended(STUDIO_PREFIXES, extra))?,
        })
    }
}

impl Default for StudioPrefixStripRule {
    fn default() -> Self {
        Self {
            pattern: STUDIO_PREFIX_RE.clone(),
        }
    }
}

impl RewriteRule for StudioPrefixStripRule {
    fn apply(&self, input: &str) -> String {
        self.pattern.replace_all(input, "").into_owned()
    }

    fn name(&self) -> &'static str {
        "StudioPrefixStrip"
    }
}

/// Rewrites a leading `FC2`/`FC2PPV` token to `FC2-`
#[derive(Debug, Clone)]
pub struct Fc2NormalizeRule;

impl RewriteRule for Fc2NormalizeRule {
    fn apply(&self, input: &str) -> String {
        FC2_RE.replace(input, "FC2-").into_owned()
    }

    fn name(&self) -> &'static str {
        "Fc2Normalize"
    }
}

/// Truncates at the first non-ASCII character
#[derive(Debug, Clone)]
pub struct NonAsciiCutRule;

impl RewriteRule for NonAsciiCutRule {
    fn apply(&self, input: &str) -> String {
        match input.find(|c: char| !c.is_ascii()) {
            Some(index) => input[..index].to_string(),
            None => input.to_string(),
        }
    }

    fn name(&self) -> &'static str {
        "NonAsciiCut"
    }
}

/// Keeps only the first whitespace-delimited token
///
/// Whitespace-only input is passed through untouched; the final trim
/// empties it.
#[derive(Debug, Clone)]
pub struct FirstTokenRule;

impl RewriteRule for FirstTokenRule {
    fn apply(&self, input: &str) -> String {
        input
            .split_whitespace()
            .next()
            .unwrap_or(input)
            .to_string()
    }

    fn name(&self) -> &'static str {
        "FirstToken"
    }
}

/// Repeatedly strips multi-part suffixes (`-C`, `_ch`, `-cd2`, `ch`)
///
/// Every suffix is at least two bytes long, so the loop is bounded by half
/// the input length.
#[derive(Debug, Clone, Default)]
pub struct PartSuffixStripRule;

impl PartSuffixStripRule {
    /// Start of the trailing part suffix, if any
    ///
    /// A suffix is at most `PART_SUFFIX_WINDOW` ASCII bytes plus trailing
    /// spaces, so only that tail is searched.
    fn suffix_start(input: &str) -> Option<usize> {
        let body_end = input.trim_end_matches(is_ascii_space).len();
        let mut window_start = body_end.saturating_sub(PART_SUFFIX_WINDOW);
        while !input.is_char_boundary(window_start) {
            window_start -= 1;
        }

        PART_SUFFIX_RE
            .find(&input[window_start..])
            .map(|found| window_start + found.start())
    }
}

impl RewriteRule for PartSuffixStripRule {
    fn apply(&self, input: &str) -> String {
        let max_iterations = input.len() / 2 + 1;
        let mut result = input.to_string();

        for _ in 0..max_iterations {
            match Self::suffix_start(&result) {
                Some(start) => result.truncate(start),
                None => return result,
            }
        }

        log::warn!(
            "Part suffix guard hit after {} iterations for '{}'",
            max_iterations,
            input
        );
        result
    }

    fn name(&self) -> &'static str {
        "PartSuffixStrip"
    }
}

/// Trims leading and trailing whitespace
#[derive(Debug, Clone)]
pub struct WhitespaceTrimRule;

impl RewriteRule for WhitespaceTrimRule {
    fn apply(&self, input: &str) -> String {
        input.trim().to_string()
    }

    fn name(&self) -> &'static str {
        "WhitespaceTrim"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Extension

    #[test]
    fn test_extension_strip_common_video_types() {
        let rule = ExtensionStripRule::new(7);
        assert_eq!(rule.apply("ABC-123.mp4"), "ABC-123");
        assert_eq!(rule.apply("ABC-123.mkv"), "ABC-123");
        assert_eq!(rule.apply("ABC-123.strm"), "ABC-123");
    }

    #[test]
    fn test_extension_strip_keeps_long_suffix() {
        let rule = ExtensionStripRule::new(7);
        // ".123456" is 7 bytes, not shorter than the limit
        assert_eq!(rule.apply("ABC.123456"), "ABC.123456");
        assert_eq!(rule.apply("ABC.12345"), "ABC");
    }

    #[test]
    fn test_extension_strip_only_last_path_element() {
        let rule = ExtensionStripRule::new(7);
        assert_eq!(rule.apply("dir.v2/ABC-123"), "dir.v2/ABC-123");
        assert_eq!(rule.apply("dir.v2/ABC-123.avi"), "dir.v2/ABC-123");
    }

    #[test]
    fn test_extension_strip_edge_cases() {
        let rule = ExtensionStripRule::new(7);
        assert_eq!(rule.apply(""), "");
        assert_eq!(rule.apply("."), "");
        assert_eq!(rule.apply("ABC-123"), "ABC-123");
        assert_eq!(rule.apply("ABC-123."), "ABC-123");
    }

    #[test]
    fn test_extension_strip_multibyte_extension() {
        let rule = ExtensionStripRule::new(7);
        // ".日本" is 7 bytes
        assert_eq!(rule.apply("ABC.日本"), "ABC.日本");
        assert_eq!(rule.apply("ABC.日"), "ABC");
    }

    #[test]
    fn test_extension_strip_stacked_extensions() {
        let rule = ExtensionStripRule::new(7);
        assert_eq!(rule.apply("ABC.12345.mp4"), "ABC");
        assert_eq!(rule.apply("ABC-123.part.mkv"), "ABC-123");
        assert_eq!(rule.apply("ABC.123456.mp4"), "ABC.123456");
        assert_eq!(rule.apply("dir/ABC.1.2"), "dir/ABC");
    }

    #[test]
    fn test_extension_strip_long_stack() {
        let rule = ExtensionStripRule::new(7);
        let input = format!("ABC{}", ".1".repeat(50_000));
        assert_eq!(rule.apply(&input), "ABC");
    }

    // Source tag

    #[test]
    fn test_source_tag_strip() {
        let rule = SourceTagStripRule;
        assert_eq!(rule.apply("studio@ABC-123"), "ABC-123");
        assert_eq!(rule.apply("ABC-123"), "ABC-123");
        assert_eq!(rule.apply("@"), "");
    }

    #[test]
    fn test_source_tag_strip_stacked_tags() {
        let rule = SourceTagStripRule;
        assert_eq!(rule.apply("a@b@c"), "c");
        assert_eq!(rule.apply("site@mirror@ABC-123 Title"), "ABC-123 Title");
        assert_eq!(rule.apply(&format!("{}ABC-123", "a@".repeat(50_000))), "ABC-123");
    }

    #[test]
    fn test_source_tag_strip_ignores_tags_after_first_token() {
        let rule = SourceTagStripRule;
        assert_eq!(rule.apply("site@ABC-123 extra@foo"), "ABC-123 extra@foo");
        assert_eq!(rule.apply("Title site@ABC-123"), "ABC-123");
    }

    // Dash spacing

    #[test]
    fn test_dash_spacing_collapses_separator() {
        let rule = DashSpacingRule;
        assert_eq!(rule.apply("ABC-123 - Title"), "ABC-123 Title");
        assert_eq!(rule.apply("ABC-123  -\tTitle - More"), "ABC-123 Title More");
    }

    #[test]
    fn test_dash_spacing_ignores_glued_dashes() {
        let rule = DashSpacingRule;
        assert_eq!(rule.apply("ABC-123"), "ABC-123");
        assert_eq!(rule.apply("ABC -123"), "ABC -123");
    }

    #[test]
    fn test_dash_spacing_ascii_spaces_only() {
        let rule = DashSpacingRule;
        assert_eq!(
            rule.apply("ABC-123\u{3000}-\u{3000}Title"),
            "ABC-123\u{3000}-\u{3000}Title"
        );
    }

    // Quality tags

    #[test]
    fn test_quality_tags_removed() {
        let rule = QualityTagStripRule;
        assert_eq!(rule.apply("ABC-123-1080p"), "ABC-123");
        assert_eq!(rule.apply("ABC-123_FHD"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-HD720"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-60fps"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-uncensored-leak"), "ABC-123");
        assert_eq!(rule.apply("ABC-123_4K"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-whole"), "ABC-123");
    }

    #[test]
    fn test_quality_tags_consecutive_after_one_separator() {
        let rule = QualityTagStripRule;
        assert_eq!(rule.apply("ABC-123-1080px264"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-h265-2160p"), "ABC-123");
    }

    #[test]
    fn test_quality_tags_need_separator() {
        let rule = QualityTagStripRule;
        assert_eq!(rule.apply("ABC-123 1080p"), "ABC-123 1080p");
    }

    #[test]
    fn test_quality_tags_ascii_digits_only() {
        let rule = QualityTagStripRule;
        // Arabic-Indic six
        assert_eq!(rule.apply("ABC-123-\u{666}0fps"), "ABC-123-\u{666}0fps");
        assert_eq!(rule.apply("ABC-123-60fps"), "ABC-123");
    }

    #[test]
    fn test_bracket_group_is_greedy() {
        let rule = QualityTagStripRule;
        assert_eq!(rule.apply("ABC-123 [1080p][x264]"), "ABC-123 ");
        assert_eq!(rule.apply("[Group] ABC-123 [HD]"), "");
    }

    // Studio prefixes

    #[test]
    fn test_studio_prefix_removed() {
        let rule = StudioPrefixStripRule::default();
        assert_eq!(rule.apply("Caribbean-123456-789"), "123456-789");
        assert_eq!(rule.apply("carib_123456-789"), "123456-789");
        assert_eq!(rule.apply("1Pondo_123456_789"), "123456_789");
        assert_eq!(rule.apply("Tokyo-Hot n1234"), "n1234");
        assert_eq!(rule.apply("123456-789-10musume"), "123456-789");
    }

    #[test]
    fn test_studio_prefix_extra_names() {
        let rule = StudioPrefixStripRule::with_extra(&["Heyzo Premium".to_string()]).unwrap();
        assert_eq!(rule.apply("Heyzo Premium 1234"), "1234");
        assert_eq!(rule.apply("Pacopacomama-123456_789"), "123456_789");
    }

    #[test]
    fn test_studio_prefix_extra_names_are_literals() {
        let rule = StudioPrefixStripRule::with_extra(&["a.c".to_string()]).unwrap();
        assert_eq!(rule.apply("abc-123"), "abc-123");
        assert_eq!(rule.apply("a.c-123"), "123");
    }

    // FC2

    #[test]
    fn test_fc2_variants_normalized() {
        let rule = Fc2NormalizeRule;
        assert_eq!(rule.apply("fc2ppv-1234567"), "FC2-1234567");
        assert_eq!(rule.apply("FC2-PPV-1234567"), "FC2-1234567");
        assert_eq!(rule.apply("FC2_PPV_1234567"), "FC2-1234567");
        assert_eq!(rule.apply("  fc2_1234567"), "FC2-1234567");
        assert_eq!(rule.apply("FC2-1234567"), "FC2-1234567");
    }

    #[test]
    fn test_fc2_only_at_start() {
        let rule = Fc2NormalizeRule;
        assert_eq!(rule.apply("ABC-FC2-1"), "ABC-FC2-1");
        assert_eq!(rule.apply("FC21234567"), "FC21234567");
        assert_eq!(rule.apply("\u{3000}fc2_1234567"), "\u{3000}fc2_1234567");
    }

    // Non-ASCII

    #[test]
    fn test_non_ascii_cut() {
        let rule = NonAsciiCutRule;
        assert_eq!(rule.apply("ABC-123日本語タイトル"), "ABC-123");
        assert_eq!(rule.apply("日本語"), "");
        assert_eq!(rule.apply("ABC-123"), "ABC-123");
        assert_eq!(rule.apply("ABC-123 café"), "ABC-123 caf");
    }

    // First token

    #[test]
    fn test_first_token() {
        let rule = FirstTokenRule;
        assert_eq!(rule.apply("ABC-123 Some Title"), "ABC-123");
        assert_eq!(rule.apply("  ABC-123"), "ABC-123");
        assert_eq!(rule.apply("   "), "   ");
        assert_eq!(rule.apply(""), "");
    }

    // Part suffix

    #[test]
    fn test_part_suffix_single() {
        let rule = PartSuffixStripRule;
        assert_eq!(rule.apply("ABC-123-C"), "ABC-123");
        assert_eq!(rule.apply("ABC-123_ch"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-cd1"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-CD12"), "ABC-123");
        assert_eq!(rule.apply("ABC-123ch"), "ABC-123");
    }

    #[test]
    fn test_part_suffix_repeated() {
        let rule = PartSuffixStripRule;
        assert_eq!(rule.apply("ABC-123-C-cd2"), "ABC-123");
        assert_eq!(rule.apply("ABC-123chch"), "ABC-123");
    }

    #[test]
    fn test_part_suffix_leaves_plain_numbers() {
        let rule = PartSuffixStripRule;
        assert_eq!(rule.apply("ABC-123"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-cd123"), "ABC-123-cd123");
        assert_eq!(rule.apply(""), "");
    }

    #[test]
    fn test_part_suffix_trailing_whitespace() {
        let rule = PartSuffixStripRule;
        assert_eq!(rule.apply("ABC-123-cd1 \t"), "ABC-123");
        assert_eq!(rule.apply("ABC-123-c \u{3000}"), "ABC-123-c \u{3000}");
    }

    #[test]
    fn test_part_suffix_non_ascii_content() {
        let rule = PartSuffixStripRule;
        assert_eq!(rule.apply("日本-c"), "日本");
        assert_eq!(rule.apply("日本ch"), "日本");
        assert_eq!(rule.apply("ABC-123-cd\u{666}"), "ABC-123-cd\u{666}");
    }

    #[test]
    fn test_part_suffix_long_run() {
        let rule = PartSuffixStripRule;
        let input = format!("ABC-123{}", "-c".repeat(50_000));
        assert_eq!(rule.apply(&input), "ABC-123");
    }

    // Trim

    #[test]
    fn test_whitespace_trim() {
        assert_eq!(WhitespaceTrimRule.apply("  ABC-123\t\n"), "ABC-123");
        assert_eq!(WhitespaceTrimRule.apply(""), "");
    }

    #[test]
    fn test_rule_names_are_unique() {
        let rules: Vec<Box<dyn RewriteRule>> = vec![
            Box::new(ExtensionStripRule::new(7)),
            Box::new(SourceTagStripRule),
            Box::new(DashSpacingRule),
            Box::new(QualityTagStripRule),
            Box::new(StudioPrefixStripRule::default()),
            Box::new(Fc2NormalizeRule),
            Box::new(NonAsciiCutRule),
            Box::new(FirstTokenRule),
            Box::new(PartSuffixStripRule),
            Box::new(WhitespaceTrimRule),
        ];
        let names: std::collections::HashSet<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn test_rules_never_grow_input() {
        let rules: Vec<Box<dyn RewriteRule>> = vec![
            Box::new(ExtensionStripRule::new(7)),
            Box::new(SourceTagStripRule),
            Box::new(DashSpacingRule),
            Box::new(QualityTagStripRule),
            Box::new(StudioPrefixStripRule::default()),
            Box::new(Fc2NormalizeRule),
            Box::new(NonAsciiCutRule),
            Box::new(FirstTokenRule),
            Box::new(PartSuffixStripRule),
            Box::new(WhitespaceTrimRule),
        ];
        let inputs = [
            "fc2_1",
            "fc2ppv-1234567",
            "ABC-123 - Title [1080p]",
            "Tokyo Hot n1234",
            "a@b.mp4",
        ];
        for rule in &rules {
            for input in inputs {
                assert!(
                    rule.apply(input).len() <= input.len(),
                    "{} grew '{}'",
                    rule.name(),
                    input
                );
            }
        }
    }
}
