// Language set supported by the demo. Whisper wants ISO-639-1 codes,
// the NLLB serving endpoint wants lowercase full names, and detected
// languages come back in either form.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Language {
    English,
    German,
    Polish,
    Czech,
    Slovak,
    Ukrainian,
    Bulgarian,
    Finnish,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::English,
        Language::German,
        Language::Polish,
        Language::Czech,
        Language::Slovak,
        Language::Ukrainian,
        Language::Bulgarian,
        Language::Finnish,
    ];

    /// ISO-639-1 code used when pinning the Whisper transcription language
    pub fn iso_code(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::German => "de",
            Language::Polish => "pl",
            Language::Czech => "cs",
            Language::Slovak => "sk",
            Language::Ukrainian => "uk",
            Language::Bulgarian => "bg",
            Language::Finnish => "fi",
        }
    }

    /// Lowercase full name understood by the NLLB serving endpoint
    pub fn nllb_name(self) -> &'static str {
        match self {
            Language::English => "english",
            Language::German => "german",
            Language::Polish => "polish",
            Language::Czech => "czech",
            Language::Slovak => "slovak",
            Language::Ukrainian => "ukrainian",
            Language::Bulgarian => "bulgarian",
            Language::Finnish => "finnish",
        }
    }

    /// Human-readable name used in responses
    pub fn display_name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::German => "German",
            Language::Polish => "Polish",
            Language::Czech => "Czech",
            Language::Slovak => "Slovak",
            Language::Ukrainian => "Ukrainian",
            Language::Bulgarian => "Bulgarian",
            Language::Finnish => "Finnish",
        }
    }

    /// Accepts ISO codes and full names in any case
    pub fn parse(input: &str) -> Option<Language> {
        let normalized: String = input.trim().to_lowercase();

        Language::ALL.iter().copied().find(|lang| {
            normalized == lang.iso_code() || normalized == lang.nllb_name()
        })
    }

    /// Display name for a detected-language value coming back from
    /// Whisper; codes outside the supported set show as "Unknown".
    pub fn describe_detected(input: &str) -> &'static str {
        Language::parse(input)
            .map(Language::display_name)
            .unwrap_or("Unknown")
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_codes_and_names() {
        assert_eq!(Language::parse("en"), Some(Language::English));
        assert_eq!(Language::parse("English"), Some(Language::English));
        assert_eq!(Language::parse("  ukrainian "), Some(Language::Ukrainian));
        assert_eq!(Language::parse("BG"), Some(Language::Bulgarian));
        assert_eq!(Language::parse("fi"), Some(Language::Finnish));
    }

    #[test]
    fn rejects_unsupported_languages() {
        assert_eq!(Language::parse("fr"), None);
        assert_eq!(Language::parse("klingon"), None);
        assert_eq!(Language::parse(""), None);
    }

    #[test]
    fn detected_language_falls_back_to_unknown() {
        assert_eq!(Language::describe_detected("de"), "German");
        assert_eq!(Language::describe_detected("czech"), "Czech");
        assert_eq!(Language::describe_detected("xx"), "Unknown");
    }

    #[test]
    fn iso_and_nllb_forms_round_trip() {
        for lang in Language::ALL {
            assert_eq!(Language::parse(lang.iso_code()), Some(lang));
            assert_eq!(Language::parse(lang.nllb_name()), Some(lang));
        }
    }
}
