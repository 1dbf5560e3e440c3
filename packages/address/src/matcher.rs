//! Selection of the best entry from a carrier site's candidate list.
//!
//! Candidates are ranked by a *final score*: the baseline similarity of the
//! two base addresses plus small bonuses (aza name, shared keywords, common
//! substring, site position). Acceptance, however, only looks at the
//! baseline, so bonuses can reorder candidates but never rescue one whose
//! base address is unrelated to the input.

use flets_area_address_models::{CandidateScore, MatchCandidate, MatchConfig, MatchResult};

use crate::aza::extract_aza_name;
use crate::config;
use crate::decompose::decompose;
use crate::normalize::normalize_for_comparison;
use crate::similarity::{is_address_match, keywords, longest_common_substring};

/// Ranks candidate lists against an input address.
#[derive(Debug, Clone, PartialEq)]
pub struct AddressMatcher {
    config: MatchConfig,
}

impl Default for AddressMatcher {
    fn default() -> Self {
        let config = config::default_config().unwrap_or_else(|e| {
            log::warn!("Embedded match config unusable, using built-in defaults: {e}");
            MatchConfig::default()
        });
        Self::new(config)
    }
}

/// What every candidate is compared against, computed once per input.
struct InputProfile {
    base_address: String,
    aza: Option<String>,
    normalized: String,
}

impl InputProfile {
    fn new(input: &str) -> Self {
        Self {
            base_address: decompose(input).base_address(),
            aza: extract_aza_name(input),
            normalized: normalize_for_comparison(input),
        }
    }
}

impl AddressMatcher {
    #[must_use]
    pub const fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Scores every candidate against `input`, in list order.
    #[must_use]
    pub fn score_candidates(&self, input: &str, candidates: &[MatchCandidate]) -> Vec<CandidateScore> {
        let profile = InputProfile::new(input);
        log::debug!(
            "Input base address {:?}, aza {:?}",
            profile.base_address,
            profile.aza
        );

        candidates
            .iter()
            .enumerate()
            .map(|(position, candidate)| self.score_candidate(&profile, position, candidate))
            .collect()
    }

    fn score_candidate(
        &self,
        profile: &InputProfile,
        position: usize,
        candidate: &MatchCandidate,
    ) -> CandidateScore {
        let text = candidate.display_text();
        let base_address = decompose(text).base_address();
        let (_, similarity) = is_address_match(&profile.base_address, &base_address);

        let aza_bonus = self.aza_bonus(profile.aza.as_deref(), extract_aza_name(text).as_deref());

        // Keyword and substring bonuses only separate candidates the aza
        // name could not.
        let (keyword_bonus, lcs_bonus) = if aza_bonus > 0.0 {
            (0.0, 0.0)
        } else {
            let normalized = normalize_for_comparison(text);
            (
                self.keyword_bonus(&profile.normalized, &normalized),
                self.lcs_bonus(&profile.normalized, &normalized),
            )
        };

        let position_bonus = self.position_bonus(position);
        let final_score = similarity + aza_bonus + keyword_bonus + lcs_bonus + position_bonus;

        log::debug!(
            "Candidate {position} {text:?}: base={similarity:.3} aza={aza_bonus:.3} \
             keyword={keyword_bonus:.3} lcs={lcs_bonus:.3} pos={position_bonus:.4} \
             final={final_score:.4}"
        );

        CandidateScore {
            index: candidate.index,
            text: text.to_string(),
            base_address,
            similarity,
            aza_bonus,
            keyword_bonus,
            lcs_bonus,
            position_bonus,
            final_score,
        }
    }

    fn aza_bonus(&self, input: Option<&str>, candidate: Option<&str>) -> f64 {
        match (input, candidate) {
            (Some(a), Some(b)) if a == b => self.config.aza_exact_bonus,
            (Some(a), Some(b)) if a.contains(b) || b.contains(a) => self.config.aza_partial_bonus,
            _ => 0.0,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn keyword_bonus(&self, input: &str, candidate: &str) -> f64 {
        let candidate_keywords = keywords(candidate);
        let shared_chars: usize = keywords(input)
            .intersection(&candidate_keywords)
            .map(|k| k.chars().count())
            .sum();
        shared_chars as f64 * self.config.keyword_bonus_per_char
    }

    #[allow(clippy::cast_precision_loss)]
    fn lcs_bonus(&self, input: &str, candidate: &str) -> f64 {
        let min_length = self.config.lcs_min_length.max(1);
        let lcs = longest_common_substring(input, candidate);
        if lcs >= min_length {
            (lcs - (min_length - 1)) as f64 * self.config.lcs_bonus_per_char
        } else {
            0.0
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn position_bonus(&self, position: usize) -> f64 {
        let window = self.config.position_bonus_window;
        if position < window {
            (window - position) as f64 * self.config.position_bonus_step
        } else {
            0.0
        }
    }

    /// Picks the candidate that best matches `input`.
    ///
    /// A candidate whose comparison-normalized text equals the input's is
    /// returned immediately with score 1.0. Otherwise the highest final
    /// score wins (the earlier candidate on an exact tie), and it is
    /// accepted only when its baseline similarity reaches
    /// [`MatchConfig::min_similarity`]. An empty list, or empty input,
    /// selects nothing.
    #[must_use]
    pub fn find_best_match(&self, input: &str, candidates: &[MatchCandidate]) -> MatchResult {
        if candidates.is_empty() {
            return MatchResult::no_match(0.0, 0.0);
        }

        let normalized_input = normalize_for_comparison(input);
        if normalized_input.is_empty() {
            log::warn!("Empty input address, nothing to match");
            return MatchResult::no_match(0.0, 0.0);
        }

        if let Some(exact) = candidates
            .iter()
            .find(|c| normalize_for_comparison(c.display_text()) == normalized_input)
        {
            log::info!("Exact match at candidate {}: {}", exact.index, exact.display_text());
            return MatchResult {
                best_index: Some(exact.index),
                score: 1.0,
                final_score: 1.0,
                near_tie: false,
            };
        }

        let scores = self.score_candidates(input, candidates);

        let mut best: Option<&CandidateScore> = None;
        for score in &scores {
            if best.is_none_or(|b| score.final_score > b.final_score) {
                best = Some(score);
            }
        }
        let Some(best) = best else {
            return MatchResult::no_match(0.0, 0.0);
        };

        let near_tie = self.detect_near_tie(best, &scores);

        if best.similarity >= self.config.min_similarity {
            log::info!(
                "Selected candidate {} {:?} (base similarity {:.3}, final {:.4})",
                best.index,
                best.text,
                best.similarity,
                best.final_score
            );
            MatchResult {
                best_index: Some(best.index),
                score: best.similarity,
                final_score: best.final_score,
                near_tie,
            }
        } else {
            log::info!(
                "No candidate accepted: best {:?} has base similarity {:.3} < {:.3}",
                best.text,
                best.similarity,
                self.config.min_similarity
            );
            MatchResult {
                near_tie,
                ..MatchResult::no_match(best.similarity, best.final_score)
            }
        }
    }

    fn detect_near_tie(&self, best: &CandidateScore, scores: &[CandidateScore]) -> bool {
        let runner_up = scores
            .iter()
            .filter(|s| !std::ptr::eq(*s, best))
            .max_by(|a, b| a.final_score.total_cmp(&b.final_score));

        let Some(runner_up) = runner_up else {
            return false;
        };

        let gap = best.final_score - runner_up.final_score;
        if gap < self.config.near_tie_margin {
            log::warn!(
                "Near tie between {:?} ({:.4}) and {:?} ({:.4}); check the selection",
                best.text,
                best.final_score,
                runner_up.text,
                runner_up.final_score
            );
            true
        } else {
            false
        }
    }

    /// Picks a candidate by whole-string [`is_address_match`] only, without
    /// decomposition or bonuses. Stops at the first perfect score.
    #[must_use]
    pub fn find_best_match_simple(&self, input: &str, candidates: &[MatchCandidate]) -> MatchResult {
        let mut best: Option<(usize, f64)> = None;

        for candidate in candidates {
            let (_, score) = is_address_match(input, candidate.display_text());
            if best.is_none_or(|(_, s)| score > s) {
                best = Some((candidate.index, score));
            }
            if score >= 1.0 {
                break;
            }
        }

        match best {
            Some((index, score)) if score >= self.config.min_similarity => MatchResult {
                best_index: Some(index),
                score,
                final_score: score,
                near_tie: false,
            },
            Some((_, score)) => MatchResult::no_match(score, score),
            None => MatchResult::no_match(0.0, 0.0),
        }
    }
}

/// [`AddressMatcher::find_best_match`] with the default configuration.
#[must_use]
pub fn find_best_match(input: &str, candidates: &[MatchCandidate]) -> MatchResult {
    AddressMatcher::default().find_best_match(input, candidates)
}

/// [`AddressMatcher::find_best_match_simple`] with the default
/// configuration.
#[must_use]
pub fn find_best_match_simple(input: &str, candidates: &[MatchCandidate]) -> MatchResult {
    AddressMatcher::default().find_best_match_simple(input, candidates)
}
