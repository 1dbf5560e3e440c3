//! Character-level canonicalization of Japanese address text.
//!
//! Every rewrite here is pure, so the same pipeline applies symmetrically to
//! the user's input and to the candidates scraped from a carrier site:
//!
//! 1. Full-width digits to half-width
//! 2. Hyphen look-alikes (including the long-vowel mark `ー`) to `-`
//! 3. Optional one-to-one kanji numeral substitution
//! 4. Optional removal of the `大字` / `字` markers
//! 5. Whitespace removed or collapsed ([`WhitespaceMode`])
//!
//! Whitespace goes last so that a removed marker cannot leave a doubled or
//! leading space behind.

use std::sync::LazyLock;

use flets_area_address_models::{NormalizeOptions, WhitespaceMode};
use regex::{Captures, Regex};

/// Characters folded into an ASCII hyphen.
const HYPHEN_VARIANTS: &[char] = &[
    '－', '−', '‐', '⁃', '‑', '‒', '–', '—', '﹘', '―', '⎯', '⏤', 'ー', 'ｰ', '─', '━',
];

/// Kanji numerals and their digit strings. `十`/`拾` map to `"10"` by plain
/// substitution, so compounds such as `十一` become `"101"`.
const KANSUJI: &[(char, &str)] = &[
    ('一', "1"),
    ('二', "2"),
    ('三', "3"),
    ('四', "4"),
    ('五', "5"),
    ('六', "6"),
    ('七', "7"),
    ('八', "8"),
    ('九', "9"),
    ('十', "10"),
    ('壱', "1"),
    ('弐', "2"),
    ('参', "3"),
    ('肆', "4"),
    ('伍', "5"),
    ('陸', "6"),
    ('漆', "7"),
    ('捌', "8"),
    ('玖', "9"),
    ('拾', "10"),
    ('〇', "0"),
    ('零', "0"),
];

/// A run of kanji numerals directly followed by an address-number marker.
static ADDRESS_KANSUJI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([一二三四五六七八九十壱弐参肆伍陸漆捌玖拾〇零]+)(丁目|番地|番|号)")
        .expect("valid regex")
});

/// `<numerals>条<numerals>丁目`. A `条` without a following chōme is part of
/// a place name (`東九条`, `七条`).
static JO_CHOME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([一二三四五六七八九十壱弐参肆伍陸漆捌玖拾〇零]+)条([一二三四五六七八九十壱弐参肆伍陸漆捌玖拾〇零]*\d*[一二三四五六七八九十壱弐参肆伍陸漆捌玖拾〇零]*)丁目",
    )
    .expect("valid regex")
});

/// `<digits><marker><digits>` where the marker separates banchi and gō.
static HOUSE_NUMBER_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:番地|番|号|の)(\d+)").expect("valid regex"));

/// A banchi/gō marker left dangling after a digit run.
static TRAILING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)(?:番地|番|号)(?:$|([^\d町]))").expect("valid regex"));

/// Whitespace runs, half-width or full-width.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\u{3000}]+").expect("valid regex"));

/// Normalizes address text according to `options`.
///
/// Never fails; empty input returns an empty string. Applying the same
/// options twice yields the same string as applying them once.
#[must_use]
pub fn normalize(address: &str, options: NormalizeOptions) -> String {
    if address.is_empty() {
        return String::new();
    }

    let mut text = unify_hyphens(&to_half_width_digits(address));

    if options.convert_kansuji {
        text = convert_kansuji(&text);
    }

    if options.strip_aza {
        text = text.replace("大字", "").replace('字', "");
    }

    match options.whitespace {
        WhitespaceMode::Remove => WHITESPACE_RE.replace_all(&text, "").into_owned(),
        WhitespaceMode::Collapse => WHITESPACE_RE.replace_all(&text, " ").trim().to_string(),
    }
}

/// Shorthand for [`normalize`] with [`NormalizeOptions::comparison`].
#[must_use]
pub fn normalize_for_comparison(address: &str) -> String {
    normalize(address, NormalizeOptions::comparison())
}

/// Converts full-width digits (`０`-`９`) to ASCII digits.
#[must_use]
pub fn to_half_width_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => {
                char::from_u32(u32::from(c) - u32::from('０') + u32::from('0')).unwrap_or(c)
            }
            _ => c,
        })
        .collect()
}

/// Folds every hyphen look-alike into `-`.
#[must_use]
pub fn unify_hyphens(text: &str) -> String {
    text.chars()
        .map(|c| if HYPHEN_VARIANTS.contains(&c) { '-' } else { c })
        .collect()
}

/// Replaces every kanji numeral with its digit string, one character at a
/// time.
#[must_use]
pub fn convert_kansuji(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match kansuji_digits(c) {
            Some(digits) => out.push_str(digits),
            None => out.push(c),
        }
    }
    out
}

fn kansuji_digits(c: char) -> Option<&'static str> {
    KANSUJI
        .iter()
        .find_map(|(kanji, digits)| (*kanji == c).then_some(*digits))
}

/// Converts kanji numerals only where they number a chōme, banchi or gō
/// (`四丁目` → `4丁目`, `八番` → `8番`), and a jō only when a chōme follows
/// it (`一条三丁目` → `1条3丁目`).
///
/// Place names that merely contain numerals (`三重県`, `十日町市`,
/// `東九条`) are left alone, and so is the `番町` district suffix (`三番町`).
#[must_use]
pub fn convert_address_kansuji(text: &str) -> String {
    let jo_converted = JO_CHOME_RE.replace_all(text, |caps: &Captures<'_>| {
        format!(
            "{}条{}丁目",
            convert_kansuji(&caps[1]),
            convert_kansuji(&caps[2])
        )
    });
    let text: &str = &jo_converted;
    ADDRESS_KANSUJI_RE
        .replace_all(text, |caps: &Captures<'_>| {
            let end = caps.get(0).map_or(text.len(), |m| m.end());
            let marker = &caps[2];
            if marker == "番" && text[end..].starts_with('町') {
                return caps[0].to_string();
            }
            format!("{}{marker}", convert_kansuji(&caps[1]))
        })
        .into_owned()
}

/// Rewrites banchi/gō notation into hyphens: `2番地8号` → `2-8`,
/// `2の8の1` → `2-8-1`, `19番` → `19`.
///
/// Expects digits to be half-width already.
#[must_use]
pub fn canonicalize_house_number(text: &str) -> String {
    let mut out = text.to_string();
    // Separators chain (`2の8の1`), and each replacement consumes the
    // leading digit run, so repeat until stable.
    loop {
        let next = HOUSE_NUMBER_SEPARATOR_RE
            .replace_all(&out, "$1-$2")
            .into_owned();
        if next == out {
            break;
        }
        out = next;
    }
    TRAILING_MARKER_RE
        .replace_all(&out, |caps: &Captures<'_>| {
            format!(
                "{}{}",
                &caps[1],
                caps.get(2).map_or("", |m| m.as_str())
            )
        })
        .into_owned()
}

/// Converts full-width digits, Latin letters and ASCII symbols to
/// half-width and unifies hyphens, but keeps the full-width space.
#[must_use]
pub fn half_width_except_space(text: &str) -> String {
    let converted: String = text
        .chars()
        .map(|c| match c {
            // U+FF01..=U+FF5E mirror U+0021..=U+007E.
            '！'..='～' => char::from_u32(u32::from(c) - 0xFEE0).unwrap_or(c),
            _ => c,
        })
        .collect();
    unify_hyphens(&converted)
}
