//! Built-in sample songs shown alongside generated ones.

use crate::types::{placeholder_image_url, Language, Song};

/// (id suffix, en title, zh title, en artist, zh artist, en style, zh style, duration, plays)
type SampleRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    u64,
);

const SAMPLES: [SampleRow; 6] = [
    ("1", "Midnight Tokyo Drive", "午夜东京兜风", "Neon Drifter", "霓虹漂流者", "City Pop", "城市流行", "3:42", 1_240_000),
    ("2", "Rain on the Window", "窗上的雨", "Lo-Fi Owl", "低保真猫头鹰", "Lo-Fi Hip Hop", "低保真嘻哈", "2:58", 856_300),
    ("3", "Starlight Cathedral", "星光大教堂", "Aurora Choir", "极光合唱团", "Ambient Choral", "氛围合唱", "4:15", 432_100),
    ("4", "Desert Circuit", "沙漠电路", "Mirage Unit", "海市蜃楼", "Cyberpunk Jazz", "赛博朋克爵士", "3:20", 98_700),
    ("5", "Paper Lanterns", "纸灯笼", "Mei & The Tides", "小梅与潮汐", "Indie Folk", "独立民谣", "3:05", 65_400),
    ("6", "Zero Gravity Waltz", "零重力华尔兹", "Orbit Strings", "轨道弦乐", "Space Classical", "太空古典", "5:01", 8_900),
];

/// Returns the sample catalog localized for `language`.
///
/// Ids are stable (`sample-N`) and identical across languages, so a
/// selection survives a language switch.
pub fn sample_songs(language: Language) -> Vec<Song> {
    SAMPLES
        .iter()
        .map(|&(id, en_title, zh_title, en_artist, zh_artist, en_style, zh_style, duration, plays)| {
            let (title, artist, style) = match language {
                Language::En => (en_title, en_artist, en_style),
                Language::Zh => (zh_title, zh_artist, zh_style),
            };
            Song {
                id: format!("sample-{}", id),
                title: title.to_string(),
                artist: artist.to_string(),
                // Seeded by the English title so covers match across languages
                image_url: placeholder_image_url(en_title),
                style: style.to_string(),
                duration: duration.to_string(),
                plays,
                lyrics: None,
                is_generated: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_localized() {
        let en = sample_songs(Language::En);
        let zh = sample_songs(Language::Zh);
        assert_eq!(en.len(), zh.len());
        assert_eq!(en[0].title, "Midnight Tokyo Drive");
        assert_eq!(zh[0].title, "午夜东京兜风");
        assert_eq!(en[0].id, zh[0].id);
        assert_eq!(en[0].image_url, zh[0].image_url);
    }

    #[test]
    fn samples_are_not_generated() {
        for song in sample_songs(Language::En) {
            assert!(!song.is_generated());
            assert!(song.id.starts_with("sample-"));
        }
    }
}
