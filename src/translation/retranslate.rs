/*!
 * Ledger retranslation pass.
 *
 * Re-submits the entries of a rejected-translation ledger file through the
 * active provider, using each entry's recorded detected source language as
 * the source for its retry. Entries whose retry comes back non-empty are
 * replaced; the rest keep their recorded result. The outcome is written as
 * a fresh snapshot next to the input so the original ledger stays intact
 * for comparison.
 *
 * Results are not re-validated here: the operator runs this pass to recover
 * lines the main run gave up on and inspects the output by hand.
 */

use std::path::{Path, PathBuf};

use anyhow::Result;
use log::{info, warn};

use crate::providers::Translator;

use super::store::{self, CacheEntry};

/// Outcome of one retranslation pass
#[derive(Debug)]
pub struct RetranslateSummary {
    /// Entries read from the input snapshot
    pub attempted: usize,
    /// Entries replaced with a non-empty retry result
    pub replaced: usize,
    /// Where the resulting snapshot was written
    pub output: PathBuf,
}

/// Sibling path with a `-translated` suffix before the extension
fn output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{}-translated.{}", stem, ext.to_string_lossy()),
        None => format!("{}-translated", stem),
    };
    input.with_file_name(name)
}

/// Re-translate every entry of a ledger-shaped snapshot file.
///
/// The input file is never modified; the full map, with whatever entries
/// could be recovered, is written to the `-translated` sibling path.
pub async fn retranslate_ledger<T: Translator>(
    translator: &T,
    input: &Path,
) -> Result<RetranslateSummary> {
    let mut entries = store::load_snapshot(input)?;
    if entries.is_empty() {
        warn!("No entries to retranslate in {:?}", input);
    }

    let mut summary = RetranslateSummary {
        attempted: entries.len(),
        replaced: 0,
        output: output_path(input),
    };

    for (text, entry) in entries.iter_mut() {
        info!("Retranslating: {}", text);
        let source = entry.detected_source_lang.clone();
        let results = translator
            .translate_from(&[text.clone()], source.as_deref())
            .await;
        let Some(result) = results.into_iter().next() else {
            continue;
        };

        if result.text.trim().is_empty() {
            warn!("Retry still produced an empty result for: {}", text);
            continue;
        }

        info!("Result: {}", result.text);
        *entry = CacheEntry::from(&result);
        summary.replaced += 1;
    }

    store::write_snapshot(&summary.output, &entries)?;
    info!(
        "Retranslated {} of {} entries into {:?}",
        summary.replaced, summary.attempted, summary.output
    );
    Ok(summary)
}
