//! Language selector for localized generation and display.

use serde::{Deserialize, Serialize};

/// UI and generation language.
///
/// Controls the instruction embedded in the text generation prompt, the
/// fallback song's wording and the sample catalog shown next to generated
/// songs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,

    /// Simplified Chinese. The default for a fresh session.
    #[default]
    Zh,
}

impl Language {
    /// Returns the string representation of the language.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// Parses an exact `en` or `zh` code.
    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "en" => Some(Language::En),
            "zh" => Some(Language::Zh),
            _ => None,
        }
    }

    /// Parses a language leniently, accepting names and `zh-cn`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Language::En),
            "zh" | "zh-cn" | "chinese" => Some(Language::Zh),
            _ => None,
        }
    }

    /// Instruction appended to the text generation prompt.
    pub fn generation_instruction(&self) -> &'static str {
        match self {
            Language::En => "Generate the content in English.",
            Language::Zh => {
                "Please generate the response content (title, artist, style, lyrics) in Simplified Chinese."
            }
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
