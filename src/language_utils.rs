use anyhow::{Result, anyhow};
use isolang::Language;

// @module: ISO language code handling
//
// Accepts ISO 639-1 (2-letter) and ISO 639-2 (3-letter, T or B form) codes,
// optionally with a region or script subtag, and converts them to the short
// form used in the translator URL.

/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn bibliographic_to_terminologic(code: &str) -> Option<&'static str> {
    BIBLIOGRAPHIC_CODES
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Resolved language code: base language plus an optional region or script subtag
struct ResolvedCode {
    language: Language,
    kind: LanguageCodeType,
    subtag: Option<String>,
}

/// Resolve a base ISO code, lowercase, without subtag
fn resolve_base(code: &str) -> Option<(Language, LanguageCodeType)> {
    match code.len() {
        2 => Language::from_639_1(code).map(|lang| (lang, LanguageCodeType::Part1)),
        3 => Language::from_639_3(code)
            .map(|lang| (lang, LanguageCodeType::Part2T))
            .or_else(|| {
                bibliographic_to_terminologic(code)
                    .and_then(Language::from_639_3)
                    .map(|lang| (lang, LanguageCodeType::Part2B))
            }),
        _ => None,
    }
}

/// Resolve any accepted code form, e.g. `en`, `fra`, `ger`, `pt-br`, `zh_hans`
fn resolve(code: &str) -> Result<ResolvedCode> {
    let normalized = code.trim().to_lowercase();
    let (base, subtag) = match normalized.split_once(['-', '_']) {
        Some((base, subtag)) => (base, Some(subtag)),
        None => (normalized.as_str(), None),
    };

    // Region (`br`, `419`) or script (`hans`) subtags are passed through as-is
    if let Some(subtag) = subtag {
        if !(2..=4).contains(&subtag.len()) || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(anyhow!("Invalid language code: {}", code));
        }
    }

    let (language, kind) = resolve_base(base).ok_or_else(|| anyhow!("Invalid language code: {}", code))?;
    Ok(ResolvedCode {
        language,
        kind,
        subtag: subtag.map(str::to_string),
    })
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code,
/// optionally followed by a region or script subtag
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    resolve(code).map(|resolved| resolved.kind)
}

/// Code used in the translator URL: ISO 639-1 when one exists, else 639-2/T,
/// followed by the subtag if any (`ger` -> `de`, `pt-BR` -> `pt-br`)
pub fn to_url_code(code: &str) -> Result<String> {
    let resolved = resolve(code)?;
    let lang = resolved.language;
    let base = lang
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| lang.to_639_3().to_string());

    Ok(match resolved.subtag {
        Some(subtag) => format!("{}-{}", base, subtag),
        None => base,
    })
}

/// Check if two language codes represent the same language and variant
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve(code1), resolve(code2)) {
        (Ok(a), Ok(b)) => a.language == b.language && a.subtag == b.subtag,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let resolved = resolve(code)?;
    let name = resolved.language.to_name();
    Ok(match resolved.subtag {
        Some(subtag) => format!("{} ({})", name, subtag.to_uppercase()),
        None => name.to_string(),
    })
}
