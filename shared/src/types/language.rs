//! Language and internationalization types

use serde::{Deserialize, Serialize};

/// Language preference for user-facing messages. Arabic first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "ar")]
    Arabic,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Negotiate from an `Accept-Language` header value.
    ///
    /// Picks the supported language with the highest q-value; ties keep the
    /// earlier entry. Unsupported or missing preferences fall back to Arabic.
    pub fn from_accept_language(header: &str) -> Self {
        let mut preferred = Language::default();
        let mut best_quality = 0.0_f32;

        for part in header.split(',') {
            let mut pieces = part.trim().split(';');
            let tag = pieces.next().unwrap_or("").trim().to_lowercase();
            let quality = pieces
                .find_map(|p| p.trim().strip_prefix("q="))
                .and_then(|q| q.parse::<f32>().ok())
                .unwrap_or(1.0);

            let candidate = if tag.starts_with("ar") {
                Language::Arabic
            } else if tag.starts_with("en") {
                Language::English
            } else {
                continue;
            };

            if quality > best_quality {
                preferred = candidate;
                best_quality = quality;
            }
        }

        preferred
    }

    /// Get language code (ISO 639-1)
    pub fn code(&self) -> &'static str {
        match self {
            Language::Arabic => "ar",
            Language::English => "en",
        }
    }

    /// Check if language uses right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Arabic)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ar" | "ara" | "arabic" | "العربية" => Ok(Language::Arabic),
            "en" | "eng" | "english" => Ok(Language::English),
            _ => Err(format!("Unsupported language: {}", s)),
        }
    }
}
