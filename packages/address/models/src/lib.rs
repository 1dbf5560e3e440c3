#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for Japanese address decomposition and candidate matching.
//!
//! This crate contains only data types, configuration structs, and simple
//! conversions. It has no regex or I/O dependencies; the parsing and
//! scoring logic lives in `flets_area_address`.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A Japanese postal address split into its structured components.
///
/// Produced fresh by every decomposition call and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressComponents {
    /// One of the 47 prefecture names, e.g. `"三重県"`.
    pub prefecture: Option<String>,
    /// Municipality, including a `郡` qualifier when present
    /// (e.g. `"北佐久郡軽井沢町"`).
    pub city: Option<String>,
    /// Remaining locality name. Empty string means "no further locality".
    pub town: String,
    /// Chōme (`丁目`) number as a digit string.
    pub block: Option<String>,
    /// Banchi and gō joined by `-` (e.g. `"19-10"`).
    pub number: Option<String>,
    /// Reserved for downstream enrichment; never populated by the parser.
    pub building_id: Option<String>,
}

impl AddressComponents {
    /// The all-null sentinel returned for input that yields nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether every component is absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prefecture.is_none()
            && self.city.is_none()
            && self.town.is_empty()
            && self.block.is_none()
            && self.number.is_none()
    }

    /// Prefecture + city + town, followed by `<block>丁目` when a chōme is
    /// set. House number and gō are left out.
    ///
    /// Missing parts render as empty strings.
    #[must_use]
    pub fn base_address(&self) -> String {
        let mut base = String::new();
        base.push_str(self.prefecture.as_deref().unwrap_or_default());
        base.push_str(self.city.as_deref().unwrap_or_default());
        base.push_str(&self.town);
        if let Some(block) = &self.block {
            base.push_str(block);
            base.push_str("丁目");
        }
        base
    }

    /// Splits [`Self::number`] into `(banchi, gō)` for the separate form
    /// fields on the carrier sites.
    #[must_use]
    pub fn house_number_parts(&self) -> (Option<&str>, Option<&str>) {
        let Some(number) = self.number.as_deref() else {
            return (None, None);
        };
        let mut parts = number.split('-').filter(|p| !p.is_empty());
        (parts.next(), parts.next())
    }
}

/// One entry of the caller-supplied candidate list.
///
/// A plain projection of the text shown by a site's address-autocomplete
/// widget, taken once before matching starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    /// Position in the caller's list (the site's own ranking).
    pub index: usize,
    /// Display text of the candidate.
    pub text: String,
}

impl MatchCandidate {
    /// Creates a candidate at `index`.
    #[must_use]
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Builds an indexed candidate list from display texts, preserving order.
    #[must_use]
    pub fn from_texts<I, S>(texts: I) -> Vec<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Self::new(index, text))
            .collect()
    }

    /// The text actually compared: the first line, trimmed.
    #[must_use]
    pub fn display_text(&self) -> &str {
        self.text.trim().lines().next().unwrap_or_default().trim()
    }
}

/// Score breakdown for a single candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateScore {
    /// Index of the candidate in the input list.
    pub index: usize,
    /// The compared text.
    pub text: String,
    /// Base address derived from the candidate's decomposition.
    pub base_address: String,
    /// Baseline similarity between base addresses (0.0–1.0).
    pub similarity: f64,
    /// Bonus for a matching `字` name.
    pub aza_bonus: f64,
    /// Bonus for shared runs of two or more ideographs.
    pub keyword_bonus: f64,
    /// Bonus for a long common substring.
    pub lcs_bonus: f64,
    /// Tiny tie-breaker favoring earlier candidates.
    pub position_bonus: f64,
    /// Baseline plus every bonus; used for ranking.
    pub final_score: f64,
}

/// Outcome of selecting the best candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Index of the accepted candidate, or `None` when nothing cleared the
    /// acceptance threshold.
    pub best_index: Option<usize>,
    /// Baseline similarity of the top-ranked candidate (0.0–1.0).
    pub score: f64,
    /// Bonus-inflated score of the top-ranked candidate.
    pub final_score: f64,
    /// Whether the top two final scores were within the near-tie margin.
    pub near_tie: bool,
}

impl MatchResult {
    /// A result that selects nothing.
    #[must_use]
    pub const fn no_match(score: f64, final_score: f64) -> Self {
        Self {
            best_index: None,
            score,
            final_score,
            near_tie: false,
        }
    }

    /// Whether a candidate was accepted.
    #[must_use]
    pub const fn is_match(&self) -> bool {
        self.best_index.is_some()
    }
}

/// How whitespace is treated by the normalizer.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WhitespaceMode {
    /// Remove half-width and full-width spaces entirely.
    #[default]
    Remove,
    /// Unify runs of spaces into one ASCII space and trim.
    Collapse,
}

/// Options for a normalization call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Drop the literal substrings `大字` and `字`.
    #[serde(default)]
    pub strip_aza: bool,
    /// Replace every kanji numeral with its digit string, one-to-one.
    #[serde(default)]
    pub convert_kansuji: bool,
    /// Whitespace handling.
    #[serde(default)]
    pub whitespace: WhitespaceMode,
}

impl NormalizeOptions {
    /// Options used when comparing two addresses.
    #[must_use]
    pub const fn comparison() -> Self {
        Self {
            strip_aza: true,
            convert_kansuji: true,
            whitespace: WhitespaceMode::Remove,
        }
    }

    /// Options used before decomposition. `字` markers are kept because the
    /// Aza rule keys on them, and kanji numerals are only converted in
    /// address-number positions.
    #[must_use]
    pub const fn decomposition() -> Self {
        Self {
            strip_aza: false,
            convert_kansuji: false,
            whitespace: WhitespaceMode::Remove,
        }
    }

    /// Options for human-facing text: spaces collapsed, nothing stripped.
    #[must_use]
    pub const fn display() -> Self {
        Self {
            strip_aza: false,
            convert_kansuji: false,
            whitespace: WhitespaceMode::Collapse,
        }
    }
}

/// NTT service region that handles a prefecture.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Region {
    /// NTT East (Hokkaido, Tohoku, Kanto, Niigata, Yamanashi, Nagano).
    East,
    /// NTT West (everything else).
    West,
}

/// The town/block/number rules of the decomposition cascade, in priority
/// order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DecomposeRule {
    /// `...字<name><digits>`.
    Aza,
    /// `<town><digits>丁目<number>`.
    Chome,
    /// `<town>町<1-2 digits>-<3+ digits>`.
    TownBlockNumber,
    /// `<town><3+ digits>-<digits>`.
    TownNumberGo,
    /// `<town><digits>-<digits>`, block decided by digit count.
    Generic,
    /// `<town><d1>-<d2>-<d3>` anywhere in the text.
    DoubleHyphen,
    /// `<town><digits>(-<digits>)?`.
    SingleNumber,
    /// No digits at all.
    NoDigits,
}

impl DecomposeRule {
    /// All rules in the order they are tried.
    pub const ALL: &[Self] = &[
        Self::Aza,
        Self::Chome,
        Self::TownBlockNumber,
        Self::TownNumberGo,
        Self::Generic,
        Self::DoubleHyphen,
        Self::SingleNumber,
        Self::NoDigits,
    ];
}

/// Tuning for candidate selection.
///
/// Every field defaults to the reference value so a partial TOML file only
/// overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Minimum baseline similarity (0.0–1.0) the winner needs to be accepted.
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
    /// Bonus when both `字` names are equal.
    #[serde(default = "default_aza_exact_bonus")]
    pub aza_exact_bonus: f64,
    /// Bonus when one `字` name contains the other.
    #[serde(default = "default_aza_partial_bonus")]
    pub aza_partial_bonus: f64,
    /// Bonus per character of each shared ideograph run.
    #[serde(default = "default_per_char_bonus")]
    pub keyword_bonus_per_char: f64,
    /// Shortest common substring that earns the LCS bonus.
    #[serde(default = "default_lcs_min_length")]
    pub lcs_min_length: usize,
    /// Bonus per character of common substring beyond `lcs_min_length - 1`.
    #[serde(default = "default_per_char_bonus")]
    pub lcs_bonus_per_char: f64,
    /// How many leading candidates receive a position bonus.
    #[serde(default = "default_position_window")]
    pub position_bonus_window: usize,
    /// Position bonus step.
    #[serde(default = "default_position_step")]
    pub position_bonus_step: f64,
    /// Final-score gap under which the top two candidates count as tied.
    #[serde(default = "default_near_tie_margin")]
    pub near_tie_margin: f64,
}

const fn default_min_similarity() -> f64 {
    0.5
}

const fn default_aza_exact_bonus() -> f64 {
    1.0
}

const fn default_aza_partial_bonus() -> f64 {
    0.5
}

const fn default_per_char_bonus() -> f64 {
    0.01
}

const fn default_lcs_min_length() -> usize {
    4
}

const fn default_position_window() -> usize {
    10
}

const fn default_position_step() -> f64 {
    0.0001
}

const fn default_near_tie_margin() -> f64 {
    0.01
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            aza_exact_bonus: default_aza_exact_bonus(),
            aza_partial_bonus: default_aza_partial_bonus(),
            keyword_bonus_per_char: default_per_char_bonus(),
            lcs_min_length: default_lcs_min_length(),
            lcs_bonus_per_char: default_per_char_bonus(),
            position_bonus_window: default_position_window(),
            position_bonus_step: default_position_step(),
            near_tie_margin: default_near_tie_margin(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_address_appends_chome() {
        let components = AddressComponents {
            prefecture: Some("三重県".to_string()),
            city: Some("伊勢市".to_string()),
            town: "船江".to_string(),
            block: Some("4".to_string()),
            number: Some("19-10".to_string()),
            building_id: None,
        };
        assert_eq!(components.base_address(), "三重県伊勢市船江4丁目");
    }

    #[test]
    fn base_address_renders_missing_parts_as_empty() {
        let components = AddressComponents {
            town: "西新宿".to_string(),
            ..AddressComponents::default()
        };
        assert_eq!(components.base_address(), "西新宿");
    }

    #[test]
    fn house_number_parts_split_on_hyphen() {
        let components = AddressComponents {
            number: Some("19-10".to_string()),
            ..AddressComponents::default()
        };
        assert_eq!(components.house_number_parts(), (Some("19"), Some("10")));
    }

    #[test]
    fn house_number_parts_without_go() {
        let components = AddressComponents {
            number: Some("88".to_string()),
            ..AddressComponents::default()
        };
        assert_eq!(components.house_number_parts(), (Some("88"), None));
        assert_eq!(
            AddressComponents::empty().house_number_parts(),
            (None, None)
        );
    }

    #[test]
    fn empty_sentinel_is_empty() {
        assert!(AddressComponents::empty().is_empty());
        let components = AddressComponents {
            town: "x".to_string(),
            ..AddressComponents::default()
        };
        assert!(!components.is_empty());
    }

    #[test]
    fn candidate_display_text_takes_first_line() {
        let candidate = MatchCandidate::new(0, "  東京都新宿区西新宿\n(しんじゅく)  ");
        assert_eq!(candidate.display_text(), "東京都新宿区西新宿");
    }

    #[test]
    fn candidates_from_texts_keep_order() {
        let candidates = MatchCandidate::from_texts(["a", "b", "c"]);
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[2].index, 2);
        assert_eq!(candidates[2].text, "c");
    }

    #[test]
    fn decompose_rules_are_ordered_aza_first() {
        assert_eq!(DecomposeRule::ALL.first(), Some(&DecomposeRule::Aza));
        assert_eq!(DecomposeRule::ALL.last(), Some(&DecomposeRule::NoDigits));
        assert_eq!(DecomposeRule::ALL.len(), 8);
    }

    #[test]
    fn rule_names_are_snake_case() {
        assert_eq!(DecomposeRule::TownBlockNumber.to_string(), "town_block_number");
        assert_eq!(Region::East.as_ref(), "east");
    }

    #[test]
    fn normalize_presets_differ_in_aza_handling() {
        assert!(NormalizeOptions::comparison().strip_aza);
        assert!(!NormalizeOptions::decomposition().strip_aza);
        assert_eq!(
            NormalizeOptions::display().whitespace,
            WhitespaceMode::Collapse
        );
    }
}
