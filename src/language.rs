use serde::Serialize;

/// A language tag offered to users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SupportedLanguage {
    pub code: &'static str,
    pub name: &'static str,
}

const LANGUAGES: &[SupportedLanguage] = &[
    SupportedLanguage {
        code: "en-US",
        name: "English (US)",
    },
    SupportedLanguage {
        code: "en-GB",
        name: "English (UK)",
    },
    SupportedLanguage {
        code: "en-IN",
        name: "English (India)",
    },
    SupportedLanguage {
        code: "ur-PK",
        name: "Urdu (Pakistan)",
    },
    SupportedLanguage {
        code: "ur-IN",
        name: "Urdu (India)",
    },
];

/// Commonly used language tags
///
/// Engines accept other tags too; this list only feeds language pickers.
pub fn supported_languages() -> &'static [SupportedLanguage] {
    LANGUAGES
}

/// Look up a listed language by tag (case-insensitive)
pub fn find_language(code: &str) -> Option<&'static SupportedLanguage> {
    LANGUAGES
        .iter()
        .find(|language| language.code.eq_ignore_ascii_case(code))
}
