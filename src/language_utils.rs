/*!
 * Language utilities for ISO language code handling.
 *
 * Providers report and accept a mix of bare ISO 639-1 codes ("ja") and
 * region-qualified tags ("en-US", "EN-GB"). The cache, the validation policy,
 * and the needs-translation predicate all compare languages on the 2-character
 * primary subtag only, so this module centralizes that normalization.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Extract the lowercase 2-character primary subtag of a language tag.
///
/// Returns an empty string when the tag has fewer than two characters,
/// which never matches any real prefix.
pub fn lang_prefix(code: &str) -> String {
    let prefix: String = code.trim().chars().take(2).collect();
    if prefix.chars().count() < 2 {
        return String::new();
    }
    prefix.to_lowercase()
}

/// Check whether two language tags share the same 2-character primary subtag.
pub fn prefixes_match(a: &str, b: &str) -> bool {
    let pa = lang_prefix(a);
    !pa.is_empty() && pa == lang_prefix(b)
}

/// Validate a configured language tag against ISO 639-1.
///
/// Region subtags are validated on their primary subtag only, so "en-US"
/// and "pt-BR" are accepted. Used at startup so a typo in the configuration
/// fails before any file is touched.
pub fn validate_language_tag(code: &str) -> Result<()> {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(());
    }
    // Some self-hosted backends use 3-letter codes
    if primary.len() == 3 && Language::from_639_3(&primary).is_some() {
        return Ok(());
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Get the English name for a language tag, for operator-facing messages.
pub fn get_language_name(code: &str) -> Result<String> {
    let primary = code
        .trim()
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_lowercase();

    let language = if primary.len() == 2 {
        Language::from_639_1(&primary)
    } else {
        Language::from_639_3(&primary)
    };

    language
        .map(|l| l.to_name().to_string())
        .ok_or_else(|| anyhow!("Unknown language code: {}", code))
}
