//! Extraction of the `字` (aza) sub-locality name.
//!
//! Carrier candidate lists for rural areas often differ only in their aza,
//! so the name is read from the *original* text, before normalization
//! strips the marker.

use std::sync::LazyLock;

use regex::Regex;

/// `字` followed by the name, ending at a digit, `番`/`号`, or end of text.
static AZA_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"字([^0-9０-９\-－−ー番号]+?)(?:\d|番|号|$)").expect("valid regex")
});

/// Returns the aza name of `address`, or `None` if it has no `字` marker or
/// the name is empty.
///
/// Falls back to the text between `字` and the first ASCII digit (or the
/// rest of the text) when the name contains characters the main pattern
/// rejects.
#[must_use]
pub fn extract_aza_name(address: &str) -> Option<String> {
    let index = address.find('字')?;

    let name = AZA_NAME_RE.captures(address).map_or_else(
        || {
            let after = &address[index + '字'.len_utf8()..];
            let end = after.find(|c: char| c.is_ascii_digit()).unwrap_or(after.len());
            after[..end].trim().to_string()
        },
        |caps| caps[1].trim().to_string(),
    );

    (!name.is_empty()).then_some(name)
}
