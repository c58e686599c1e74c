/*!
 * Validation policy applied to every raw provider result.
 *
 * A rejection is not an error: the caption keeps its prior text and the
 * pair is routed to the rejection ledger. Rules are checked in order and
 * the first match wins, so the reported reason is deterministic.
 */

use std::fmt;

use crate::language_utils::prefixes_match;
use crate::providers::TranslationResult;

use super::script::ScriptTable;

/// Why a provider result was rejected. Each variant renders a distinct,
/// human-diagnosable reason for the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Detected source language collapsed to the target language
    SourceMatchesTarget { detected: String },

    /// Detected source language does not match the configured source
    SourceMismatch { detected: String, expected: String },

    /// Result text is empty after trimming
    EmptyText,

    /// Result text is identical to the original text
    UnchangedText,

    /// Result text still contains source-script characters
    ResidualSourceScript,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceMatchesTarget { detected } => {
                write!(f, "detected source language '{}' matches the target language", detected)
            }
            Self::SourceMismatch { detected, expected } => {
                write!(
                    f,
                    "detected source language '{}' does not match expected source '{}'",
                    detected, expected
                )
            }
            Self::EmptyText => write!(f, "translated text is empty"),
            Self::UnchangedText => write!(f, "translated text is unchanged from the original"),
            Self::ResidualSourceScript => {
                write!(f, "translated text still contains untranslated source-script characters")
            }
        }
    }
}

/// Decide whether a raw provider result may be accepted.
///
/// `expected_source` is the provider's declared source language, when fixed;
/// `target` is the configured target language. Rules, first match wins:
///
/// 1. detected source equals the target (2-char prefix comparison);
/// 2. an expected source exists, a detection is present, and they do not
///    match (providers running with a fixed source report no detection at
///    all, so absence is not evidence of mis-detection);
/// 3. empty text;
/// 4. text identical to the original;
/// 5. text still contains characters from any configured source script.
pub fn validate(
    original: &str,
    result: &TranslationResult,
    expected_source: Option<&str>,
    target: &str,
    scripts: &ScriptTable,
) -> Result<(), RejectReason> {
    let detected = result.detected_source_lang.as_deref().unwrap_or("");

    if !detected.is_empty() && prefixes_match(detected, target) {
        return Err(RejectReason::SourceMatchesTarget {
            detected: detected.to_string(),
        });
    }

    if let Some(expected) = expected_source {
        if !detected.is_empty() && !prefixes_match(detected, expected) {
            return Err(RejectReason::SourceMismatch {
                detected: detected.to_string(),
                expected: expected.to_string(),
            });
        }
    }

    let new_text = result.text.trim();
    if new_text.is_empty() {
        return Err(RejectReason::EmptyText);
    }
    if new_text == original {
        return Err(RejectReason::UnchangedText);
    }
    if scripts.contains_listed_script(new_text) {
        return Err(RejectReason::ResidualSourceScript);
    }

    Ok(())
}
