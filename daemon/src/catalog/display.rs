//! Display formatting for song cards.

use crate::types::Language;

/// Formats a play count the way song cards show it.
///
/// English abbreviates above 1,000 as thousands ("1.2k"); Chinese
/// abbreviates above 10,000 as 万 ("12.4万"). Smaller counts are shown as-is.
pub fn format_plays(plays: u64, language: Language) -> String {
    match language {
        Language::En if plays > 1_000 => format!("{:.1}k", plays as f64 / 1_000.0),
        Language::Zh if plays > 10_000 => format!("{:.1}万", plays as f64 / 10_000.0),
        _ => plays.to_string(),
    }
}
