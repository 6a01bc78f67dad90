//! Studio-specific knowledge used by the canonicalizer and the classifier.
//!
//! Entries are regex fragments, not literals: they are joined with `|` and
//! compiled case-insensitively. Extend them through [`NumberConfig`] rather
//! than editing the matching code.
//!
//! Digit and space classes are spelled out as ASCII sets; `\d` and `\s`
//! would also accept Unicode digits and spaces.
//!
//! [`NumberConfig`]: super::config::NumberConfig

/// Default maximum extension length (dot included). Extensions at or above
/// this length are treated as part of the identifier.
pub const MAX_EXTENSION_LENGTH: usize = 7;

/// ASCII whitespace: tab, line feed, form feed, carriage return, space.
pub const SPACE: &str = r"[\t\n\f\r ]";

/// Release tags stripped when they follow a `-` or `_`.
pub const QUALITY_TAGS: &[&str] = &[
    "[0-9]*fps",
    "whole",
    "f?hd[0-9]*",
    "sd[0-9]*",
    "(?:360|480|720|1080|2160)p",
    "uncensored",
    "leak",
    "[2468]k",
    "[xh]26[45]",
];

/// Studio and label names removed wherever they appear.
pub const STUDIO_PREFIXES: &[&str] = &[
    "carib(?:b?ean)?",
    "1?Pondo?",
    "10musume",
    "pacopacomama",
    "muramura",
    r"Tokyo[-_\t\n\f\r ]?Hot",
];

/// Short studio codes that precede a 2-4 digit uncensored number.
pub const UNCENSORED_CODES: &[&str] = &["cz", "gedo", "k", "n", "kb", "red-", "se"];

/// Studio tags that are both uncensored and special when followed by a
/// separator.
pub const UNCENSORED_TAGS: &[&str] = &["heyzo", "xxx-av", "heydouga"];

/// Special-release tags.
pub const SPECIAL_TAGS: &[&str] = &[
    "fc2(?:ppv)?",
    "gcolle",
    "getchu",
    "gyutto",
    "pcolle",
    "heyzo",
    "xxx-av",
    "heydouga",
];

/// Prefixes whose covers always need face detection.
pub const FACE_DETECTION_TAGS: &[&str] = &["fcp", "siro", "msfh", "mium", "gana"];

/// Joins fragments into a single non-capturing alternation.
pub(crate) fn alternation<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = fragments.into_iter().collect::<Vec<&str>>().join("|");
    format!("(?:{})", joined)
}

/// Table entries followed by regex-escaped user additions.
pub(crate) fn extended(table: &[&str], extra: &[String]) -> Vec<String> {
    table
        .iter()
        .map(|fragment| fragment.to_string())
        .chain(extra.iter().map(|literal| regex::escape(literal)))
        .collect()
}
