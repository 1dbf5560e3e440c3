//! JSON shapes printed by the CLI.

use flets_area_address::prefecture::region_of;
use flets_area_address::{
    AddressComponents, CandidateScore, DecomposeRule, MatchCandidate, MatchResult, Region,
};
use serde::Serialize;

/// One decomposed address.
#[derive(Debug, Serialize)]
pub struct DecomposeReport<'a> {
    pub input: &'a str,
    #[serde(flatten)]
    pub components: AddressComponents,
    pub base_address: String,
    pub banchi: Option<String>,
    pub go: Option<String>,
    pub region: Option<Region>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<DecomposeRule>,
}

impl<'a> DecomposeReport<'a> {
    #[must_use]
    pub fn new(input: &'a str, components: AddressComponents, rule: Option<DecomposeRule>) -> Self {
        let (banchi, go) = components.house_number_parts();
        let (banchi, go) = (banchi.map(str::to_string), go.map(str::to_string));
        let region = components.prefecture.as_deref().and_then(region_of);
        Self {
            input,
            base_address: components.base_address(),
            components,
            banchi,
            go,
            region,
            rule,
        }
    }
}

/// Outcome of matching one address against a candidate list.
#[derive(Debug, Serialize)]
pub struct MatchReport<'a> {
    pub input: &'a str,
    #[serde(flatten)]
    pub result: MatchResult,
    pub matched_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Vec<CandidateScore>>,
}

impl<'a> MatchReport<'a> {
    /// `ranking` is reordered best-first; equal scores keep list order.
    #[must_use]
    pub fn new(
        input: &'a str,
        result: MatchResult,
        candidates: &[MatchCandidate],
        ranking: Option<Vec<CandidateScore>>,
    ) -> Self {
        let matched_text = result.best_index.and_then(|index| {
            candidates
                .iter()
                .find(|c| c.index == index)
                .map(|c| c.display_text().to_string())
        });
        let ranking = ranking.map(|mut scores| {
            scores.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
            scores
        });
        Self {
            input,
            result,
            matched_text,
            ranking,
        }
    }
}
