//! Splits a Japanese address into prefecture, city, town, chōme and house
//! number.
//!
//! Parsing is a prefix cascade:
//!
//! 1. Prefecture, from the table of 47 names anchored at the start
//! 2. City, the shortest prefix ending in `市`/`区`/`町`/`村`, or a
//!    `...郡...町`/`...郡...村` county form
//! 3. Town/block/number, by trying each [`DecomposeRule`] in priority order
//!    until one matches the remainder
//!
//! The lenient entry points never fail: text that cannot be parsed ends up
//! in `town`, and empty input yields [`AddressComponents::empty`].

use std::sync::LazyLock;

use flets_area_address_models::{AddressComponents, DecomposeRule, NormalizeOptions};
use regex::Regex;

use crate::AddressError;
use crate::normalize::{self, canonicalize_house_number, convert_address_kansuji};
use crate::prefecture::find_prefecture;

/// Well-formed prefecture names missing from the table (typos, old forms).
static PREFECTURE_FALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(東京都|北海道|(?:京都|大阪)府|[^\d\-]{2,3}?県)").expect("valid regex")
});

/// Municipality, allowing a county (`郡`) before the final `町`/`村`. The
/// county form may not cross a `市`, so city names containing `郡`
/// (`大和郡山市`) end at the `市`.
static CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^市]+?郡[^市]+?[町村]|.+?[市区町村])").expect("valid regex")
});

/// Town up to the first digit run after `字`; the whole run is the number.
static AZA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*?字\D*?)(\d+(?:-\d+)*)").expect("valid regex"));

static CHOME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)丁目").expect("valid regex"));

static TOWN_BLOCK_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?町)(\d{1,2})-(\d{3,}(?:-\d+)*)$").expect("valid regex")
});

static TOWN_NUMBER_GO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?[^\d\-])(\d{3,})-(\d+(?:-\d+)*)$").expect("valid regex")
});

static GENERIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?[^\d\-])(\d+)-(\d+(?:-\d+)*)$").expect("valid regex")
});

static DOUBLE_HYPHEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-(\d+)-(\d+)").expect("valid regex"));

/// A house number with an optional gō.
static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:-\d+)?").expect("valid regex"));

static BASE_CHOME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?\d+丁目)").expect("valid regex"));

static BASE_DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?\d+)").expect("valid regex"));

/// Town, chōme and house number captured by one cascade rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TownParts {
    /// Locality name.
    pub town: String,
    /// Chōme digits.
    pub block: Option<String>,
    /// Banchi, optionally `-gō`.
    pub number: Option<String>,
}

impl TownParts {
    fn new(town: &str, block: Option<&str>, number: Option<String>) -> Self {
        Self {
            town: town.trim().to_string(),
            block: block.map(str::to_string),
            number,
        }
    }
}

/// The cascade rules in the order they are tried.
#[must_use]
pub const fn town_rules() -> &'static [DecomposeRule] {
    DecomposeRule::ALL
}

/// Applies a single cascade rule to the text that follows the city.
///
/// Returns `None` when the rule does not match. [`DecomposeRule::NoDigits`]
/// always matches.
#[must_use]
pub fn apply_rule(rule: DecomposeRule, remaining: &str) -> Option<TownParts> {
    match rule {
        DecomposeRule::Aza => aza(remaining),
        DecomposeRule::Chome => chome(remaining),
        DecomposeRule::TownBlockNumber => {
            let caps = TOWN_BLOCK_NUMBER_RE.captures(remaining)?;
            Some(TownParts::new(
                &caps[1],
                Some(&caps[2]),
                Some(caps[3].to_string()),
            ))
        }
        DecomposeRule::TownNumberGo => {
            let caps = TOWN_NUMBER_GO_RE.captures(remaining)?;
            Some(TownParts::new(
                &caps[1],
                None,
                Some(format!("{}-{}", &caps[2], &caps[3])),
            ))
        }
        DecomposeRule::Generic => {
            let caps = GENERIC_RE.captures(remaining)?;
            let first = &caps[2];
            // One or two digits read as a chōme, three or more as a banchi.
            if first.len() <= 2 {
                Some(TownParts::new(
                    &caps[1],
                    Some(first),
                    Some(caps[3].to_string()),
                ))
            } else {
                Some(TownParts::new(
                    &caps[1],
                    None,
                    Some(format!("{first}-{}", &caps[3])),
                ))
            }
        }
        DecomposeRule::DoubleHyphen => {
            let caps = DOUBLE_HYPHEN_RE.captures(remaining)?;
            let start = caps.get(0).map_or(0, |m| m.start());
            Some(TownParts::new(
                &remaining[..start],
                Some(&caps[1]),
                Some(format!("{}-{}", &caps[2], &caps[3])),
            ))
        }
        DecomposeRule::SingleNumber => {
            let m = NUMBER_RE.find(remaining)?;
            Some(TownParts::new(
                &remaining[..m.start()],
                None,
                Some(m.as_str().to_string()),
            ))
        }
        DecomposeRule::NoDigits => Some(TownParts::new(remaining, None, None)),
    }
}

/// `字` present: everything up to the first digit run after the marker is
/// the town (marker included), the digit run is the number.
fn aza(remaining: &str) -> Option<TownParts> {
    if !remaining.contains('字') {
        return None;
    }
    AZA_RE.captures(remaining).map_or_else(
        || Some(TownParts::new(remaining, None, None)),
        |caps| Some(TownParts::new(&caps[1], None, Some(caps[2].to_string()))),
    )
}

fn chome(remaining: &str) -> Option<TownParts> {
    let caps = CHOME_RE.captures(remaining)?;
    let whole = caps.get(0)?;
    let after = &remaining[whole.end()..];
    let number = NUMBER_RE.find(after).map(|m| m.as_str().to_string());
    Some(TownParts::new(
        &remaining[..whole.start()],
        Some(&caps[1]),
        number,
    ))
}

/// Normalizes `address` the way the cascade expects: digits and hyphens
/// canonical, spaces removed, `字` kept, kanji numerals converted only in
/// chōme/banchi positions, and `番地`/`号`/`の` notation turned into hyphens.
#[must_use]
pub fn prepare(address: &str) -> String {
    let normalized = normalize::normalize(address, NormalizeOptions::decomposition());
    canonicalize_house_number(&convert_address_kansuji(&normalized))
}

/// Splits off the leading prefecture.
#[must_use]
pub fn split_prefecture(text: &str) -> (Option<String>, &str) {
    if let Some(prefecture) = find_prefecture(text) {
        return (Some(prefecture.to_string()), &text[prefecture.len()..]);
    }
    PREFECTURE_FALLBACK_RE.find(text).map_or((None, text), |m| {
        (Some(m.as_str().to_string()), &text[m.end()..])
    })
}

/// Splits off the leading municipality.
#[must_use]
pub fn split_city(text: &str) -> (Option<String>, &str) {
    CITY_RE.find(text).map_or((None, text), |m| {
        (Some(m.as_str().to_string()), &text[m.end()..])
    })
}

/// Decomposes `address`, never failing.
#[must_use]
pub fn decompose(address: &str) -> AddressComponents {
    decompose_with_rule(address).0
}

/// Decomposes `address` and reports which cascade rule produced the town
/// parts. The rule is `None` only for empty input.
#[must_use]
pub fn decompose_with_rule(address: &str) -> (AddressComponents, Option<DecomposeRule>) {
    let prepared = prepare(address);
    if prepared.is_empty() {
        return (AddressComponents::empty(), None);
    }

    let (prefecture, rest) = split_prefecture(&prepared);
    let (city, rest) = split_city(rest);
    let remaining = rest.trim();

    let (rule, parts) = town_rules()
        .iter()
        .find_map(|rule| apply_rule(*rule, remaining).map(|parts| (*rule, parts)))
        .unwrap_or_else(|| {
            (
                DecomposeRule::NoDigits,
                TownParts::new(remaining, None, None),
            )
        });

    log::debug!(
        "decompose: {address:?} -> prefecture={prefecture:?} city={city:?} \
         town={:?} block={:?} number={:?} (rule={rule})",
        parts.town,
        parts.block,
        parts.number,
    );

    (
        AddressComponents {
            prefecture,
            city,
            town: parts.town,
            block: parts.block,
            number: parts.number,
            building_id: None,
        },
        Some(rule),
    )
}

/// Strict decomposition: fails when the input is empty or lacks a
/// prefecture or municipality.
///
/// # Errors
///
/// * [`AddressError::EmptyInput`] if nothing is left after normalization
/// * [`AddressError::PrefectureNotFound`] if no prefecture leads the text
/// * [`AddressError::CityNotFound`] if no municipality follows it
pub fn try_decompose(address: &str) -> Result<AddressComponents, AddressError> {
    let (components, _) = decompose_with_rule(address);
    if components.is_empty() {
        return Err(AddressError::EmptyInput);
    }
    if components.prefecture.is_none() {
        return Err(AddressError::PrefectureNotFound {
            address: address.to_string(),
        });
    }
    if components.city.is_none() {
        return Err(AddressError::CityNotFound {
            address: address.to_string(),
        });
    }
    Ok(components)
}

/// Cuts `address` after its first `<digits>丁目`, or else after its first
/// digit run. Text without digits is returned whole.
#[must_use]
pub fn extract_base_address(address: &str) -> String {
    let normalized = normalize::normalize(address, NormalizeOptions::decomposition());
    BASE_CHOME_RE
        .find(&normalized)
        .or_else(|| BASE_DIGITS_RE.find(&normalized))
        .map_or_else(|| normalized.clone(), |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(town: &str, block: Option<&str>, number: Option<&str>) -> TownParts {
        TownParts {
            town: town.to_string(),
            block: block.map(str::to_string),
            number: number.map(str::to_string),
        }
    }

    #[test]
    fn decomposes_chome_address() {
        let c = decompose("三重県伊勢市船江4丁目19-10");
        assert_eq!(c.prefecture.as_deref(), Some("三重県"));
        assert_eq!(c.city.as_deref(), Some("伊勢市"));
        assert!(c.town.contains("船江"));
        assert_eq!(c.block.as_deref(), Some("4"));
        assert_eq!(c.number.as_deref(), Some("19-10"));
        assert_eq!(c.building_id, None);
    }

    #[test]
    fn county_is_part_of_city() {
        let c = decompose("長野県北佐久郡軽井沢町大字軽井沢1323-1");
        assert_eq!(c.prefecture.as_deref(), Some("長野県"));
        assert_eq!(c.city.as_deref(), Some("北佐久郡軽井沢町"));
        assert_eq!(c.town, "大字軽井沢");
        assert_eq!(c.number.as_deref(), Some("1323-1"));
        assert_eq!(c.block, None);
    }

    #[test]
    fn county_with_village() {
        let c = decompose("北海道虻田郡倶知安町南1条西1丁目");
        assert_eq!(c.prefecture.as_deref(), Some("北海道"));
        assert_eq!(c.city.as_deref(), Some("虻田郡倶知安町"));
        assert_eq!(c.town, "南1条西");
        assert_eq!(c.block.as_deref(), Some("1"));
        assert_eq!(c.number, None);
    }

    #[test]
    fn city_name_containing_county_character() {
        let c = decompose("奈良県大和郡山市北郡山町1");
        assert_eq!(c.city.as_deref(), Some("大和郡山市"));
        assert_eq!(c.town, "北郡山町");
        assert_eq!(c.number.as_deref(), Some("1"));
    }

    #[test]
    fn kyoto_jo_street_names_stay_in_the_town() {
        let (c, rule) = decompose_with_rule("京都府京都市南区東九条上殿田町1");
        assert_eq!(c.prefecture.as_deref(), Some("京都府"));
        assert_eq!(c.city.as_deref(), Some("京都市"));
        assert_eq!(c.town, "南区東九条上殿田町");
        assert_eq!(c.number.as_deref(), Some("1"));
        assert_eq!(c.block, None);
        assert_eq!(rule, Some(DecomposeRule::SingleNumber));
    }

    #[test]
    fn jo_followed_by_chome_is_converted() {
        let c = decompose("北海道札幌市中央区南一条三丁目2");
        assert_eq!(c.city.as_deref(), Some("札幌市"));
        assert_eq!(c.town, "中央区南1条");
        assert_eq!(c.block.as_deref(), Some("3"));
        assert_eq!(c.number.as_deref(), Some("2"));
    }

    #[test]
    fn aza_keeps_marker_in_town() {
        let c = decompose("岩手県盛岡市巻堀字巻堀88");
        assert_eq!(c.city.as_deref(), Some("盛岡市"));
        assert_eq!(c.town, "巻堀字巻堀");
        assert_eq!(c.number.as_deref(), Some("88"));
        assert_eq!(c.block, None);
    }

    #[test]
    fn aza_wins_over_chome() {
        let (c, rule) = decompose_with_rule("福島県郡山市字山田3丁目12");
        assert_eq!(rule, Some(DecomposeRule::Aza));
        assert_eq!(c.block, None);
        assert_eq!(c.town, "字山田");
        assert_eq!(c.number.as_deref(), Some("3"));
    }

    #[test]
    fn aza_number_keeps_the_whole_digit_run() {
        let c = decompose("長野県下伊那郡阿智村大字12番地");
        assert_eq!(c.city.as_deref(), Some("下伊那郡阿智村"));
        assert_eq!(c.town, "大字");
        assert_eq!(c.number.as_deref(), Some("12"));
        assert_eq!(
            apply_rule(DecomposeRule::Aza, "字1323-1"),
            Some(parts("字", None, Some("1323-1")))
        );
    }

    #[test]
    fn aza_without_digits_is_all_town() {
        assert_eq!(
            apply_rule(DecomposeRule::Aza, "巻堀字巻堀"),
            Some(parts("巻堀字巻堀", None, None))
        );
    }

    #[test]
    fn chome_in_kanji_is_converted() {
        let c = decompose("東京都渋谷区恵比寿四丁目20-3");
        assert_eq!(c.city.as_deref(), Some("渋谷区"));
        assert_eq!(c.town, "恵比寿");
        assert_eq!(c.block.as_deref(), Some("4"));
        assert_eq!(c.number.as_deref(), Some("20-3"));
    }

    #[test]
    fn banchi_go_notation_becomes_hyphenated() {
        let c = decompose("東京都新宿区西新宿二丁目八番一号");
        assert_eq!(c.block.as_deref(), Some("2"));
        assert_eq!(c.number.as_deref(), Some("8-1"));
        assert_eq!(c.town, "西新宿");
    }

    #[test]
    fn full_width_digits_and_spaces() {
        let c = decompose("東京都　新宿区　西新宿　２－８－１");
        assert_eq!(c.prefecture.as_deref(), Some("東京都"));
        assert_eq!(c.city.as_deref(), Some("新宿区"));
        assert_eq!(c.town, "西新宿");
        assert_eq!(c.block.as_deref(), Some("2"));
        assert_eq!(c.number.as_deref(), Some("8-1"));
    }

    #[test]
    fn town_block_number_rule() {
        assert_eq!(
            apply_rule(DecomposeRule::TownBlockNumber, "外川町4-11162"),
            Some(parts("外川町", Some("4"), Some("11162")))
        );
        let (c, rule) = decompose_with_rule("千葉県銚子市外川町4-11162");
        assert_eq!(rule, Some(DecomposeRule::TownBlockNumber));
        assert_eq!(c.town, "外川町");
        assert_eq!(c.block.as_deref(), Some("4"));
        assert_eq!(c.number.as_deref(), Some("11162"));
    }

    #[test]
    fn town_number_go_rule() {
        assert_eq!(
            apply_rule(DecomposeRule::TownNumberGo, "北堀1870-1"),
            Some(parts("北堀", None, Some("1870-1")))
        );
        assert_eq!(apply_rule(DecomposeRule::TownNumberGo, "北堀18-1"), None);
    }

    #[test]
    fn generic_rule_decides_by_digit_count() {
        assert_eq!(
            apply_rule(DecomposeRule::Generic, "西新宿2-8-1"),
            Some(parts("西新宿", Some("2"), Some("8-1")))
        );
        assert_eq!(
            apply_rule(DecomposeRule::Generic, "萩原台西12-3"),
            Some(parts("萩原台西", Some("12"), Some("3")))
        );
    }

    #[test]
    fn double_hyphen_rule_without_town() {
        assert_eq!(apply_rule(DecomposeRule::Generic, "1-3-4"), None);
        assert_eq!(
            apply_rule(DecomposeRule::DoubleHyphen, "1-3-4"),
            Some(parts("", Some("1"), Some("3-4")))
        );
    }

    #[test]
    fn double_hyphen_rule_with_trailing_text() {
        assert_eq!(
            apply_rule(DecomposeRule::DoubleHyphen, "萩原台西1-3-4ハイツ"),
            Some(parts("萩原台西", Some("1"), Some("3-4")))
        );
    }

    #[test]
    fn single_number_rule() {
        assert_eq!(
            apply_rule(DecomposeRule::SingleNumber, "巻堀88"),
            Some(parts("巻堀", None, Some("88")))
        );
        let c = decompose("東京都新宿区西新宿2");
        assert_eq!(c.town, "西新宿");
        assert_eq!(c.block, None);
        assert_eq!(c.number.as_deref(), Some("2"));
    }

    #[test]
    fn no_digits_rule_takes_everything() {
        let (c, rule) = decompose_with_rule("三重県伊勢市船江");
        assert_eq!(rule, Some(DecomposeRule::NoDigits));
        assert_eq!(c.town, "船江");
        assert_eq!(c.block, None);
        assert_eq!(c.number, None);
    }

    #[test]
    fn city_only_leaves_empty_town() {
        let c = decompose("三重県伊勢市");
        assert_eq!(c.city.as_deref(), Some("伊勢市"));
        assert_eq!(c.town, "");
    }

    #[test]
    fn missing_prefecture_still_parses_city_and_town() {
        let c = decompose("新宿区西新宿2-8-1");
        assert_eq!(c.prefecture, None);
        assert_eq!(c.city.as_deref(), Some("新宿区"));
        assert_eq!(c.block.as_deref(), Some("2"));
        assert_eq!(c.number.as_deref(), Some("8-1"));
    }

    #[test]
    fn rules_try_in_priority_order() {
        assert_eq!(town_rules(), DecomposeRule::ALL);
        // Both the chōme rule and the single-number rule match; chōme wins.
        let (_, rule) = decompose_with_rule("三重県伊勢市船江4丁目19-10");
        assert_eq!(rule, Some(DecomposeRule::Chome));
    }

    #[test]
    fn never_panics_on_degenerate_input() {
        for input in ["", " ", "　", "字", "丁目", "x", "存在しない住所xyz", "---", "1", "県"] {
            let _ = decompose(input);
            let _ = try_decompose(input);
        }
        assert!(decompose("").is_empty());
        assert_eq!(decompose_with_rule("").1, None);
    }

    #[test]
    fn strict_variant_reports_missing_parts() {
        assert!(matches!(try_decompose(""), Err(AddressError::EmptyInput)));
        assert!(matches!(
            try_decompose("新宿区西新宿"),
            Err(AddressError::PrefectureNotFound { .. })
        ));
        assert!(matches!(
            try_decompose("東京都"),
            Err(AddressError::CityNotFound { .. })
        ));
        assert!(try_decompose("三重県伊勢市船江4丁目19-10").is_ok());
    }

    #[test]
    fn extracts_base_address() {
        assert_eq!(
            extract_base_address("三重県伊勢市船江4丁目19-10"),
            "三重県伊勢市船江4丁目"
        );
        assert_eq!(extract_base_address("兵庫県川西市萩原台西1-3-4"), "兵庫県川西市萩原台西1");
        assert_eq!(extract_base_address("三重県伊勢市"), "三重県伊勢市");
    }
}
