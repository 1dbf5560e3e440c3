//! String similarity primitives used to rank address candidates.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::normalize::normalize_for_comparison;
use crate::prefecture::shared_prefecture;

/// Lowest score for a containment match.
const CONTAINMENT_FLOOR: f64 = 80.0;
/// Extra points spread over the length ratio for a containment match.
const CONTAINMENT_RANGE: f64 = 20.0;
/// Flat bonus when both strings mention the same prefecture.
const PREFECTURE_BONUS: f64 = 20.0;
/// Maximum bonus for positional digit agreement.
const DIGIT_BONUS: f64 = 10.0;
const MAX_SCORE: f64 = 100.0;

/// Similarity at or above which two addresses are treated as matching.
pub const MATCH_SIMILARITY: f64 = 0.8;
/// Share of the input's words that must appear in the candidate.
pub const WORD_OVERLAP_RATIO: f64 = 0.8;

/// Runs of two or more CJK ideographs.
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[一-龯]{2,}").expect("valid regex"));

/// Scores how alike two address strings are, from 0 to 100.
///
/// Both strings are normalized for comparison first. Containment of one in
/// the other scores 80–100 by length ratio; otherwise the score is the
/// multiset character overlap. A shared prefecture name in the original
/// strings adds 20, and agreement of the digit sequences adds up to 10.
/// The result is clamped to 100 and is symmetric in its arguments.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let norm_a = normalize_for_comparison(a);
    let norm_b = normalize_for_comparison(b);

    if norm_a.is_empty() || norm_b.is_empty() {
        return 0.0;
    }

    let len_a = norm_a.chars().count();
    let len_b = norm_b.chars().count();

    let mut score = if norm_a.contains(&norm_b) || norm_b.contains(&norm_a) {
        let ratio = ratio(len_a.min(len_b), len_a.max(len_b));
        ratio.mul_add(CONTAINMENT_RANGE, CONTAINMENT_FLOOR)
    } else {
        2.0 * ratio(common_char_count(&norm_a, &norm_b), len_a + len_b) * MAX_SCORE
    };

    if shared_prefecture(a, b).is_some() {
        score += PREFECTURE_BONUS;
    }

    score += digit_agreement(&norm_a, &norm_b) * DIGIT_BONUS;

    score.min(MAX_SCORE)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

fn char_counts(s: &str) -> BTreeMap<char, usize> {
    let mut counts = BTreeMap::new();
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts
}

/// Sum over every character of the smaller of its two occurrence counts.
#[must_use]
pub fn common_char_count(a: &str, b: &str) -> usize {
    let counts_b = char_counts(b);
    char_counts(a)
        .iter()
        .map(|(c, n)| counts_b.get(c).map_or(0, |m| (*n).min(*m)))
        .sum()
}

/// Fraction of zipped positions at which the digit-only projections of the
/// two strings agree. Zero when either has no digits.
#[must_use]
pub fn digit_agreement(a: &str, b: &str) -> f64 {
    let digits_a: Vec<char> = a.chars().filter(char::is_ascii_digit).collect();
    let digits_b: Vec<char> = b.chars().filter(char::is_ascii_digit).collect();

    let compared = digits_a.len().min(digits_b.len());
    let agreeing = digits_a
        .iter()
        .zip(&digits_b)
        .filter(|(x, y)| x == y)
        .count();

    ratio(agreeing, compared)
}

/// Length, in characters, of the longest substring shared by both strings.
#[must_use]
pub fn longest_common_substring(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut best = 0;
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for ca in &a {
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb { prev[j] + 1 } else { 0 };
            best = best.max(curr[j + 1]);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    best
}

/// Distinct runs of two or more ideographs in `text`.
#[must_use]
pub fn keywords(text: &str) -> BTreeSet<&str> {
    KEYWORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Decides whether two addresses match, returning the decision and the
/// similarity (0.0–1.0) it was based on.
///
/// Comparison-normalized equality scores 1.0. Otherwise the pair matches
/// when [`similarity`] reaches 80, or when at least 80% of the input's
/// space-separated words appear in the candidate.
#[must_use]
pub fn is_address_match(input: &str, candidate: &str) -> (bool, f64) {
    let norm_input = normalize_for_comparison(input);
    let norm_candidate = normalize_for_comparison(candidate);

    log::debug!("address compare: {norm_input:?} vs {norm_candidate:?}");

    if norm_input.is_empty() || norm_candidate.is_empty() {
        return (false, 0.0);
    }

    if norm_input == norm_candidate {
        return (true, 1.0);
    }

    let score = similarity(input, candidate) / MAX_SCORE;
    if score >= MATCH_SIMILARITY {
        return (true, score);
    }

    let input_words: BTreeSet<&str> = input.split_whitespace().collect();
    let candidate_words: BTreeSet<&str> = candidate.split_whitespace().collect();
    if !input_words.is_empty() {
        let overlap = ratio(
            input_words.intersection(&candidate_words).count(),
            input_words.len(),
        );
        if overlap >= WORD_OVERLAP_RATIO {
            log::debug!("word overlap {overlap} accepted");
            return (true, overlap);
        }
    }

    (false, score)
}
