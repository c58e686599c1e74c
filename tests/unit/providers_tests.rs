/*!
 * Tests for the provider contract and dispatch types
 */

use std::str::FromStr;

use subtl::app_config::Config;
use subtl::providers::mock::MockTranslator;
use subtl::providers::{ActiveTranslator, ProviderKind, TranslationResult, Translator};

#[test]
fn test_provider_kind_fromStr_shouldAcceptKnownCodes() {
    assert_eq!(ProviderKind::from_str("deepl").unwrap(), ProviderKind::DeepL);
    assert_eq!(ProviderKind::from_str("LIBRE").unwrap(), ProviderKind::Libre);
    assert_eq!(ProviderKind::from_str(" luna ").unwrap(), ProviderKind::Luna);
    assert!(ProviderKind::from_str("google").is_err());
    assert!(ProviderKind::from_str("").is_err());
}

#[test]
fn test_provider_kind_display_shouldRoundTripThroughFromStr() {
    for kind in [ProviderKind::DeepL, ProviderKind::Libre, ProviderKind::Luna] {
        assert_eq!(ProviderKind::from_str(&kind.to_string()).unwrap(), kind);
    }
}

#[test]
fn test_provider_kind_serde_shouldUseUppercaseCodes() {
    assert_eq!(serde_json::to_string(&ProviderKind::DeepL).unwrap(), "\"DEEPL\"");
    assert_eq!(
        serde_json::from_str::<ProviderKind>("\"LIBRE\"").unwrap(),
        ProviderKind::Libre
    );
}

#[test]
fn test_translation_result_empty_shouldCarryProviderIdentity() {
    let result = TranslationResult::empty(ProviderKind::Luna);
    assert!(result.text.is_empty());
    assert!(result.detected_source_lang.is_none());
    assert_eq!(result.translator, ProviderKind::Luna);
}

#[test]
fn test_active_translator_fromConfig_shouldSelectTheConfiguredVariant() {
    let mut config = Config::default();

    config.provider = ProviderKind::DeepL;
    config.deepl.api_key = "key".to_string();
    let translator = ActiveTranslator::from_config(&config).unwrap();
    assert_eq!(translator.kind(), ProviderKind::DeepL);
    assert_eq!(translator.target_lang(), "en-US");
    assert!(translator.source_lang().is_none());

    config.provider = ProviderKind::Libre;
    let translator = ActiveTranslator::from_config(&config).unwrap();
    assert_eq!(translator.kind(), ProviderKind::Libre);
    // "auto" is reported as auto-detect
    assert!(translator.source_lang().is_none());

    config.provider = ProviderKind::Luna;
    let translator = ActiveTranslator::from_config(&config).unwrap();
    assert_eq!(translator.kind(), ProviderKind::Luna);
}

#[test]
fn test_active_translator_fromConfig_withBadEndpoint_shouldError() {
    let mut config = Config::default();
    config.provider = ProviderKind::Libre;
    config.libre.endpoint = "not a url".to_string();
    assert!(ActiveTranslator::from_config(&config).is_err());
}

#[tokio::test]
async fn test_mock_translator_init_shouldHonorFailureFlag() {
    let mut ok = MockTranslator::new(ProviderKind::DeepL);
    assert!(ok.init().await.is_ok());

    let mut failing = MockTranslator::new(ProviderKind::DeepL).with_failing_init();
    assert!(failing.init().await.is_err());
}

#[tokio::test]
async fn test_mock_translator_shouldReturnOneResultPerLineInOrder() {
    let mock = MockTranslator::new(ProviderKind::DeepL)
        .with_response("a", "A", None)
        .with_response("b", "B", None);

    let lines = vec!["a".to_string(), "unknown".to_string(), "b".to_string()];
    let results = mock.translate(&lines).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].text, "A");
    // Unscripted lines degrade to empty results, like a failed provider line
    assert_eq!(results[1].text, "");
    assert_eq!(results[2].text, "B");
    assert_eq!(mock.calls(), vec![lines]);
}
