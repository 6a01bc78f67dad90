use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::config::NumberConfig;
use super::tables::{
    alternation, extended, FACE_DETECTION_TAGS, SPECIAL_TAGS, UNCENSORED_CODES, UNCENSORED_TAGS,
};
use crate::shared::errors::AppResult;

static STANDARD: Lazy<Classifier> = Lazy::new(|| {
    Classifier::build(&[], &[], &[]).expect("built-in classifier tables compile")
});

static DIGITS_THEN_LETTERS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[0-9]+[a-z]+").expect("valid digits-letters pattern"));

/// Facts derived from a canonical identifier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub uncensored: bool,
    pub special: bool,
    pub requires_face_detection: bool,
}

/// Heuristic, studio-specific predicates over canonical identifiers
///
/// Input is expected to be canonicalized already; nothing here trims it.
/// Unlisted studios are simply not recognized.
#[derive(Debug, Clone)]
pub struct Classifier {
    uncensored: Regex,
    special: Regex,
    face_detection: Regex,
}

impl Classifier {
    /// Classifier over the built-in tables
    pub fn standard() -> Self {
        STANDARD.clone()
    }

    /// Shared instance of [`Classifier::standard`]
    pub fn shared() -> &'static Classifier {
        &STANDARD
    }

    /// Classifier over the built-in tables extended by `config`
    pub fn from_config(config: &NumberConfig) -> AppResult<Self> {
        config.validate()?;
        Self::build(
            &config.extra_uncensored_tags,
            &config.extra_special_tags,
            &config.extra_face_detection_tags,
        )
    }

    fn build(
        extra_uncensored: &[String],
        extra_special: &[String],
        extra_face_detection: &[String],
    ) -> AppResult<Self> {
        let uncensored_tags = extended(UNCENSORED_TAGS, extra_uncensored);
        let special_tags = extended(SPECIAL_TAGS, extra_special);
        let face_tags = extended(FACE_DETECTION_TAGS, extra_face_detection);

        // Only the first alternative is anchored at the start and only the
        // last at the end; the codes in between may appear anywhere.
        // Digits are ASCII only.
        let uncensored = format!(
            r"(?i)^[0-9-]{{4,}}|[0-9]{{6}}_[0-9]{{2,3}}|{}[0-9]{{2,4}}|{}[-_].+$",
            alternation(UNCENSORED_CODES.iter().copied()),
            alternation(uncensored_tags.iter().map(String::as_str)),
        );
        let special = format!(
            r"(?i)^{}[-_].+$",
            alternation(special_tags.iter().map(String::as_str))
        );
        let face_detection = format!(
            r"(?i)^{}",
            alternation(face_tags.iter().map(String::as_str))
        );

        Ok(Self {
            uncensored: Regex::new(&uncensored)?,
            special: Regex::new(&special)?,
            face_detection: Regex::new(&face_detection)?,
        })
    }

    /// Numbering conventions of studios known to release uncensored titles
    pub fn is_uncensored(&self, number: &str) -> bool {
        self.uncensored.is_match(number)
    }

    /// Tag-prefixed numbers from special release platforms
    pub fn is_special(&self, number: &str) -> bool {
        self.special.is_match(number)
    }

    /// Whether cover art must go through face detection before cropping
    pub fn require_face_detection(&self, number: &str) -> bool {
        self.is_uncensored(number)
            || self.is_special(number)
            || DIGITS_THEN_LETTERS_RE.is_match(number)
            || self.face_detection.is_match(number)
    }

    pub fn classify(&self, number: &str) -> Classification {
        let uncensored = self.is_uncensored(number);
        let special = self.is_special(number);
        let requires_face_detection = uncensored
            || special
            || DIGITS_THEN_LETTERS_RE.is_match(number)
            || self.face_detection.is_match(number);

        Classification {
            uncensored,
            special,
            requires_face_detection,
        }
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}
