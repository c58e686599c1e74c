/*!
 * Tests for language utility functions
 */

use subtl::language_utils::{get_language_name, lang_prefix, prefixes_match, validate_language_tag};

#[test]
fn test_lang_prefix_withMixedTags_shouldLowercaseFirstTwoChars() {
    assert_eq!(lang_prefix("en-US"), "en");
    assert_eq!(lang_prefix("JA"), "ja");
    assert_eq!(lang_prefix(" pt-BR "), "pt");
    assert_eq!(lang_prefix("zh"), "zh");
}

#[test]
fn test_lang_prefix_withShortInput_shouldReturnEmpty() {
    assert_eq!(lang_prefix(""), "");
    assert_eq!(lang_prefix("e"), "");
    assert_eq!(lang_prefix(" "), "");
}

#[test]
fn test_prefixes_match_withRegionVariants_shouldMatchOnPrimarySubtag() {
    assert!(prefixes_match("en-US", "en-GB"));
    assert!(prefixes_match("en", "EN-us"));
    assert!(prefixes_match("ja", "JA"));
    assert!(!prefixes_match("ja", "en"));
    assert!(!prefixes_match("", "en"));
    assert!(!prefixes_match("e", "en"));
}

#[test]
fn test_validate_language_tag_withValidTags_shouldAccept() {
    assert!(validate_language_tag("en").is_ok());
    assert!(validate_language_tag("en-US").is_ok());
    assert!(validate_language_tag("ja").is_ok());
    assert!(validate_language_tag("jpn").is_ok());
    assert!(validate_language_tag(" PT-br ").is_ok());
}

#[test]
fn test_validate_language_tag_withInvalidTags_shouldReject() {
    assert!(validate_language_tag("").is_err());
    assert!(validate_language_tag("x").is_err());
    assert!(validate_language_tag("qq").is_err());
    assert!(validate_language_tag("123").is_err());
}

#[test]
fn test_get_language_name_withKnownCodes_shouldReturnEnglishNames() {
    assert_eq!(get_language_name("en").unwrap(), "English");
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert!(get_language_name("zz").is_err());
}
