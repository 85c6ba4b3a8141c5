/*!
 * Tests for ISO language code utilities
 */

use webslate::language_utils::{
    LanguageCodeType, get_language_name, language_codes_match, to_url_code,
    validate_language_code,
};

#[test]
fn test_validateLanguageCode_withEachCodeForm_shouldReportType() {
    assert_eq!(validate_language_code("en").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("fra").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
}

#[test]
fn test_validateLanguageCode_withInvalidCodes_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("english").is_err());
}

#[test]
fn test_validateLanguageCode_shouldIgnoreCaseAndWhitespace() {
    assert!(validate_language_code(" EN ").is_ok());
    assert!(validate_language_code("Deu").is_ok());
}

#[test]
fn test_toUrlCode_shouldPreferTwoLetterCodes() {
    assert_eq!(to_url_code("en").unwrap(), "en");
    assert_eq!(to_url_code("deu").unwrap(), "de");
    assert_eq!(to_url_code("dut").unwrap(), "nl");
}

#[test]
fn test_languageCodesMatch_acrossCodeForms() {
    assert!(language_codes_match("fr", "fra"));
    assert!(language_codes_match("fre", "fr"));
    assert!(!language_codes_match("fr", "de"));
    assert!(!language_codes_match("fr", "invalid"));
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ger").unwrap(), "German");
    assert!(get_language_name("zz").is_err());
}

#[test]
fn test_toUrlCode_withRegionOrScriptSubtag_shouldKeepSubtag() {
    assert_eq!(to_url_code("en-us").unwrap(), "en-us");
    assert_eq!(to_url_code("pt-BR").unwrap(), "pt-br");
    assert_eq!(to_url_code("zh_hans").unwrap(), "zh-hans");
    assert_eq!(to_url_code("por-br").unwrap(), "pt-br");
}

#[test]
fn test_validateLanguageCode_withMalformedSubtag_shouldFail() {
    assert!(validate_language_code("en-").is_err());
    assert!(validate_language_code("en-toolong").is_err());
    assert!(validate_language_code("xx-us").is_err());
}

#[test]
fn test_languageCodesMatch_shouldDistinguishVariants() {
    assert!(language_codes_match("en-us", "eng-US"));
    assert!(!language_codes_match("en-us", "en-gb"));
    assert_eq!(get_language_name("pt-br").unwrap(), "Portuguese (BR)");
}
