/*!
 * Tests for the environment-style configuration surface
 */

use std::collections::HashMap;
use std::path::PathBuf;

use subtl::app_config::Config;
use subtl::providers::ProviderKind;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_from_vars_withEmptyEnvironment_shouldUseDefaults() {
    let config = Config::from_vars(&HashMap::new()).unwrap();

    assert_eq!(config.input_root, PathBuf::from("./queue"));
    assert_eq!(config.backup_root, PathBuf::from("./backup"));
    assert_eq!(config.output_root, PathBuf::from("./output"));
    assert_eq!(config.cache_path, PathBuf::from("./data/tlcache.json"));
    assert_eq!(config.ledger_path, PathBuf::from("./data/tlrejected.json"));
    assert_eq!(config.provider, ProviderKind::DeepL);
    assert_eq!(config.deepl.target_lang, "en-US");
    assert_eq!(config.libre.endpoint, "http://127.0.0.1:5000/");
    assert_eq!(config.libre.source_lang, "auto");
    assert_eq!(config.luna.endpoint, "http://127.0.0.1:2333/");
}

#[test]
fn test_from_vars_withExplicitKeys_shouldOverrideDefaults() {
    let config = Config::from_vars(&vars(&[
        ("INPUT_PATH", "/srv/subs"),
        ("CACHE_PATH", "/var/cache/tl.json"),
        ("TRANSLATOR", "libre"),
        ("LIBRE_SOURCE_LANG", "ja"),
        ("LIBRE_TARGET_LANG", "de"),
    ]))
    .unwrap();

    assert_eq!(config.input_root, PathBuf::from("/srv/subs"));
    assert_eq!(config.cache_path, PathBuf::from("/var/cache/tl.json"));
    assert_eq!(config.provider, ProviderKind::Libre);
    assert_eq!(config.active_source_lang(), Some("ja"));
    assert_eq!(config.active_target_lang(), "de");
}

#[test]
fn test_from_vars_withBlankValues_shouldFallBackToDefaults() {
    let config = Config::from_vars(&vars(&[("INPUT_PATH", "  "), ("TRANSLATOR", "")])).unwrap();
    assert_eq!(config.input_root, PathBuf::from("./queue"));
    assert_eq!(config.provider, ProviderKind::DeepL);
}

#[test]
fn test_from_vars_withUnknownProvider_shouldError() {
    assert!(Config::from_vars(&vars(&[("TRANSLATOR", "bing")])).is_err());
}

#[test]
fn test_active_source_lang_withAutoLibre_shouldBeNone() {
    let config = Config::from_vars(&vars(&[("TRANSLATOR", "libre")])).unwrap();
    assert!(config.active_source_lang().is_none());
}

#[test]
fn test_validate_withDeepLAndNoKey_shouldError() {
    let config = Config::from_vars(&HashMap::new()).unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_vars(&vars(&[("DEEPL_API_KEY", "key")])).unwrap();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withBadLanguage_shouldError() {
    let config = Config::from_vars(&vars(&[
        ("DEEPL_API_KEY", "key"),
        ("DEEPL_TARGET_LANG", "qq"),
    ]))
    .unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_vars(&vars(&[
        ("DEEPL_API_KEY", "key"),
        ("DEEPL_SOURCE_LANG", "nope"),
    ]))
    .unwrap();
    assert!(config.validate().is_err());
}
