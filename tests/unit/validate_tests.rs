/*!
 * Tests for the validation policy applied to raw provider results
 */

use subtl::providers::{ProviderKind, TranslationResult};
use subtl::translation::{RejectReason, ScriptTable, validate};

fn result(text: &str, detected: Option<&str>) -> TranslationResult {
    TranslationResult {
        text: text.to_string(),
        detected_source_lang: detected.map(|d| d.to_string()),
        translator: ProviderKind::DeepL,
    }
}

fn scripts() -> ScriptTable {
    ScriptTable::default()
}

#[test]
fn test_validate_withGoodResult_shouldAccept() {
    let r = result("Hello", Some("ja"));
    assert!(validate("こんにちは", &r, Some("ja"), "en", &scripts()).is_ok());
}

#[test]
fn test_validate_withDetectedEqualToTarget_shouldRejectAsSourceMatchesTarget() {
    let r = result("Bonjour", Some("en"));
    let reason = validate("Bonjour!", &r, None, "en", &scripts()).unwrap_err();
    assert!(matches!(reason, RejectReason::SourceMatchesTarget { .. }));
}

#[test]
fn test_validate_withRegionTargets_shouldCompareTwoCharPrefixes() {
    // "en" collapses with "en-US"
    let r = result("Hello", Some("en"));
    let reason = validate("Hi", &r, None, "en-US", &scripts()).unwrap_err();
    assert!(matches!(reason, RejectReason::SourceMatchesTarget { .. }));
}

#[test]
fn test_validate_withMisdetectedSource_shouldRejectAsSourceMismatch() {
    let r = result("Hello", Some("ko"));
    let reason = validate("こんにちは", &r, Some("ja"), "en", &scripts()).unwrap_err();
    assert!(matches!(reason, RejectReason::SourceMismatch { .. }));
}

#[test]
fn test_validate_withMissingDetectionAndExpectedSource_shouldAccept() {
    // Fixed-source providers report no detection; absence is not a mismatch
    let r = result("Hello", None);
    assert!(validate("こんにちは", &r, Some("ja"), "en", &scripts()).is_ok());
}

#[test]
fn test_validate_withEmptyText_shouldRejectAsEmpty() {
    let r = result("   ", Some("ja"));
    let reason = validate("こんにちは", &r, Some("ja"), "en", &scripts()).unwrap_err();
    assert_eq!(reason, RejectReason::EmptyText);
}

#[test]
fn test_validate_withUnchangedText_shouldRejectAsUnchanged() {
    let r = result("こんにちは", Some("ja"));
    let reason = validate("こんにちは", &r, Some("ja"), "en", &scripts()).unwrap_err();
    assert_eq!(reason, RejectReason::UnchangedText);
}

#[test]
fn test_validate_withResidualSourceScript_shouldRejectAsIncomplete() {
    let r = result("Hello こんにちは", Some("ja"));
    let reason = validate("こんにちは、世界", &r, Some("ja"), "en", &scripts()).unwrap_err();
    assert_eq!(reason, RejectReason::ResidualSourceScript);
}

#[test]
fn test_validate_ruleOrdering_sourceCollisionWinsOverEmptyText() {
    // Detected == target AND empty text: the reported reason must be the
    // source/target collision, not emptiness
    let r = result("", Some("en"));
    let reason = validate("Hello", &r, None, "en", &scripts()).unwrap_err();
    assert!(matches!(reason, RejectReason::SourceMatchesTarget { .. }));
}

#[test]
fn test_validate_ruleOrdering_sourceCollisionWinsOverUnchanged() {
    // Target-language detection fires before the unchanged-text check
    let r = result("Bonjour", Some("en"));
    let reason = validate("Bonjour", &r, None, "en", &scripts()).unwrap_err();
    assert!(matches!(reason, RejectReason::SourceMatchesTarget { .. }));
}

#[test]
fn test_validate_withoutExpectedSource_shouldSkipMismatchRule() {
    // Auto-detect runs have no expected source to compare against
    let r = result("Hello", Some("fr"));
    assert!(validate("Bonjour", &r, None, "en", &scripts()).is_ok());
}

#[test]
fn test_reject_reasons_shouldRenderDistinctMessages() {
    let reasons = [
        RejectReason::SourceMatchesTarget {
            detected: "en".to_string(),
        },
        RejectReason::SourceMismatch {
            detected: "ko".to_string(),
            expected: "ja".to_string(),
        },
        RejectReason::EmptyText,
        RejectReason::UnchangedText,
        RejectReason::ResidualSourceScript,
    ];
    let rendered: Vec<String> = reasons.iter().map(|r| r.to_string()).collect();
    for (i, a) in rendered.iter().enumerate() {
        assert!(!a.is_empty());
        for b in rendered.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}
