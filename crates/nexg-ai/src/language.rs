//! Supported transcript and translation languages.

/// Display name and 2-letter ISO 639-1 code for every offered language.
pub const LANGUAGES: [(&str, &str); 17] = [
    ("English", "en"),
    ("Hindi", "hi"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Chinese", "zh"),
    ("Japanese", "ja"),
    ("Korean", "ko"),
    ("Russian", "ru"),
    ("Arabic", "ar"),
    ("Portuguese", "pt"),
    ("Italian", "it"),
    ("Dutch", "nl"),
    ("Turkish", "tr"),
    ("Vietnamese", "vi"),
    ("Thai", "th"),
    ("Indonesian", "id"),
];

/// Code for a language name, ignoring case.
pub fn code_for(name: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name.trim()))
        .map(|(_, code)| *code)
}

/// Display name for a code, ignoring case.
pub fn name_for(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(_, c)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(name, _)| *name)
}

/// Whether `code` has the shape of a 2-letter language code.
///
/// Codes outside [`LANGUAGES`] are accepted; the transcript service decides
/// what it supports.
pub fn is_language_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}
