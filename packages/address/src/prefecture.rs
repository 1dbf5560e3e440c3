//! The 47 prefectures and the NTT region that serves each of them.

use flets_area_address_models::Region;

use crate::decompose;

/// All prefectures in JIS X 0401 order.
pub const PREFECTURES: [&str; 47] = [
    "北海道",
    "青森県",
    "岩手県",
    "宮城県",
    "秋田県",
    "山形県",
    "福島県",
    "茨城県",
    "栃木県",
    "群馬県",
    "埼玉県",
    "千葉県",
    "東京都",
    "神奈川県",
    "新潟県",
    "富山県",
    "石川県",
    "福井県",
    "山梨県",
    "長野県",
    "岐阜県",
    "静岡県",
    "愛知県",
    "三重県",
    "滋賀県",
    "京都府",
    "大阪府",
    "兵庫県",
    "奈良県",
    "和歌山県",
    "鳥取県",
    "島根県",
    "岡山県",
    "広島県",
    "山口県",
    "徳島県",
    "香川県",
    "愛媛県",
    "高知県",
    "福岡県",
    "佐賀県",
    "長崎県",
    "熊本県",
    "大分県",
    "宮崎県",
    "鹿児島県",
    "沖縄県",
];

/// Prefectures served by NTT East.
const EAST_PREFECTURES: [&str; 17] = [
    "北海道",
    "青森県",
    "岩手県",
    "宮城県",
    "秋田県",
    "山形県",
    "福島県",
    "茨城県",
    "栃木県",
    "群馬県",
    "埼玉県",
    "千葉県",
    "東京都",
    "神奈川県",
    "新潟県",
    "山梨県",
    "長野県",
];

/// Returns the prefecture `text` starts with.
#[must_use]
pub fn find_prefecture(text: &str) -> Option<&'static str> {
    PREFECTURES.iter().copied().find(|p| text.starts_with(p))
}

/// Returns any prefecture name that occurs anywhere in both strings.
#[must_use]
pub fn shared_prefecture(a: &str, b: &str) -> Option<&'static str> {
    PREFECTURES
        .iter()
        .copied()
        .find(|p| a.contains(p) && b.contains(p))
}

/// The region serving `prefecture`, or `None` if it is not a prefecture
/// name.
#[must_use]
pub fn region_of(prefecture: &str) -> Option<Region> {
    if EAST_PREFECTURES.contains(&prefecture) {
        Some(Region::East)
    } else if PREFECTURES.contains(&prefecture) {
        Some(Region::West)
    } else {
        None
    }
}

/// Decomposes `address` and returns the region of its prefecture.
#[must_use]
pub fn region_for_address(address: &str) -> Option<Region> {
    decompose::decompose(address)
        .prefecture
        .as_deref()
        .and_then(region_of)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_prefecture_at_start() {
        assert_eq!(find_prefecture("三重県伊勢市"), Some("三重県"));
        assert_eq!(find_prefecture("京都府京都市"), Some("京都府"));
        assert_eq!(find_prefecture("北海道札幌市"), Some("北海道"));
        assert_eq!(find_prefecture("伊勢市三重県"), None);
    }

    #[test]
    fn kyoto_is_not_cut_at_the_miyako_character() {
        assert_eq!(find_prefecture("京都府宇治市"), Some("京都府"));
    }

    #[test]
    fn shared_prefecture_requires_both() {
        assert_eq!(shared_prefecture("東京都新宿区", "x東京都"), Some("東京都"));
        assert_eq!(shared_prefecture("東京都新宿区", "大阪府大阪市"), None);
    }

    #[test]
    fn east_and_west_regions() {
        assert_eq!(region_of("東京都"), Some(Region::East));
        assert_eq!(region_of("長野県"), Some(Region::East));
        assert_eq!(region_of("三重県"), Some(Region::West));
        assert_eq!(region_of("沖縄県"), Some(Region::West));
        assert_eq!(region_of("東京"), None);
    }

    #[test]
    fn every_east_prefecture_is_a_prefecture() {
        for p in EAST_PREFECTURES {
            assert!(PREFECTURES.contains(&p), "{p} missing from PREFECTURES");
        }
    }

    #[test]
    fn region_for_full_address() {
        assert_eq!(
            region_for_address("東京都新宿区西新宿２－８－１"),
            Some(Region::East)
        );
        assert_eq!(
            region_for_address("三重県伊勢市船江4丁目19-10"),
            Some(Region::West)
        );
        assert_eq!(region_for_address("新宿区西新宿"), None);
    }
}
