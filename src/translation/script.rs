/*!
 * "Needs translation" script heuristic.
 *
 * Decides whether caption text is worth submitting to a provider at all.
 * For logographic/syllabary source languages the test is strict: the text
 * must contain at least one character from the script's code-point ranges.
 * For everything else the default is permissive.
 */

use std::collections::HashMap;
use std::ops::RangeInclusive;

use crate::language_utils::lang_prefix;

/// Map of language tag (2-char primary subtag) to characteristic
/// Unicode code-point ranges.
#[derive(Debug, Clone)]
pub struct ScriptTable {
    ranges: HashMap<String, Vec<RangeInclusive<u32>>>,
}

/// Hiragana/Katakana, CJK extension A, CJK unified ideographs,
/// CJK compatibility ideographs, halfwidth Katakana.
const CJK_RANGES: [RangeInclusive<u32>; 5] = [
    0x3040..=0x30FF,
    0x3400..=0x4DBF,
    0x4E00..=0x9FFF,
    0xF900..=0xFAFF,
    0xFF66..=0xFF9F,
];

impl ScriptTable {
    /// Build an empty table (every language treated permissively)
    pub fn empty() -> Self {
        ScriptTable {
            ranges: HashMap::new(),
        }
    }

    /// Register a language tag with its code-point ranges
    pub fn with_language(mut self, tag: &str, ranges: Vec<RangeInclusive<u32>>) -> Self {
        self.ranges.insert(lang_prefix(tag), ranges);
        self
    }

    /// Whether the given source language gets the strict script test
    pub fn is_strict_language(&self, lang: &str) -> bool {
        self.ranges.contains_key(&lang_prefix(lang))
    }

    /// Decide whether `text` should be submitted for translation.
    ///
    /// Strict when the expected source language is in the table (the text
    /// must still contain source-script characters); permissive otherwise.
    pub fn needs_translation(&self, text: &str, source_lang: Option<&str>) -> bool {
        match source_lang.map(|l| lang_prefix(l)) {
            Some(prefix) => match self.ranges.get(&prefix) {
                Some(ranges) => contains_range_char(text, ranges),
                None => true,
            },
            None => true,
        }
    }

    /// Strict test against every registered script, regardless of
    /// configured source language. Used post-translation to catch provider
    /// output that still contains untranslated fragments.
    pub fn contains_listed_script(&self, text: &str) -> bool {
        self.ranges
            .values()
            .any(|ranges| contains_range_char(text, ranges))
    }
}

impl Default for ScriptTable {
    /// CJK-family languages get the strict test by default
    fn default() -> Self {
        ScriptTable::empty()
            .with_language("ja", CJK_RANGES.to_vec())
            .with_language("zh", CJK_RANGES.to_vec())
            .with_language("ko", CJK_RANGES.to_vec())
    }
}

fn contains_range_char(text: &str, ranges: &[RangeInclusive<u32>]) -> bool {
    text.chars()
        .any(|c| ranges.iter().any(|r| r.contains(&(c as u32))))
}
