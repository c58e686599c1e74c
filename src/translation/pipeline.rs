/*!
 * Per-file caption pipeline.
 *
 * Classifies every caption of a parsed file (skip / cache hit / needs
 * translation), submits the unresolved set to the active provider in one
 * batch, validates each raw result independently, and merges accepted
 * results back into the caption sequence in original index order.
 *
 * Nothing is persisted here except ledger rejections; the caller writes the
 * output file and flushes the cache only when the file actually changed.
 */

use anyhow::{Result, anyhow};
use log::{debug, error, info, warn};

use crate::providers::Translator;
use crate::subtitle_processor::{self, Caption, CaptionKind, SubtitleFormat};

use super::script::ScriptTable;
use super::store::{RejectionLedger, TranslationStore};
use super::validate::validate;

/// Where a caption's current text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptionState {
    /// Non-dialogue, empty, or not worth translating; terminal
    Skip,
    /// Text replaced from the cache
    Cache,
    /// Dialogue awaiting (or denied) a translation
    Untranslated,
    /// Text replaced by an accepted provider result this run
    Translated,
}

/// A caption plus its per-run translation bookkeeping.
///
/// Owned exclusively by one pipeline invocation; discarded once the file's
/// outcome is decided.
#[derive(Debug)]
struct TlCaption {
    caption: Caption,
    state: CaptionState,
    /// True iff text differs from what was read from disk
    modified: bool,
    detected_source_lang: Option<String>,
}

/// Outcome of processing one file
#[derive(Debug)]
pub enum FileOutcome {
    /// No caption changed; leave the file untouched
    Unchanged,
    /// At least one caption changed; `content` is the full re-serialized file
    Translated {
        content: String,
        stats: FileStats,
    },
}

/// Per-file counters for the run summary
#[derive(Debug, Default, Clone, Copy)]
pub struct FileStats {
    pub from_cache: usize,
    pub translated: usize,
    pub rejected: usize,
    pub skipped: usize,
}

/// Orchestrates classification, batch translation, validation, and merge
/// for one file at a time.
pub struct CaptionPipeline<T: Translator> {
    translator: T,
    scripts: ScriptTable,
}

impl<T: Translator> CaptionPipeline<T> {
    pub fn new(translator: T, scripts: ScriptTable) -> Self {
        CaptionPipeline {
            translator,
            scripts,
        }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Initialize the underlying provider; fatal on error
    pub async fn init(&mut self) -> Result<(), crate::errors::ProviderError> {
        self.translator.init().await
    }

    /// Run the full pipeline over one file's content.
    ///
    /// The cache is mutated in memory for accepted results but not flushed;
    /// the ledger persists every rejection immediately.
    pub async fn process_content(
        &self,
        content: &str,
        format: SubtitleFormat,
        cache: &mut TranslationStore,
        ledger: &mut RejectionLedger,
    ) -> Result<FileOutcome> {
        let captions = subtitle_processor::parse(content, format)?;
        let mut items = self.classify(captions, cache);

        let mut stats = FileStats::default();
        for item in &items {
            match item.state {
                CaptionState::Skip => stats.skipped += 1,
                CaptionState::Cache => {
                    stats.from_cache += 1;
                    debug!(
                        "Caption {} served from cache (source {})",
                        item.caption.index,
                        item.detected_source_lang.as_deref().unwrap_or("unknown")
                    );
                }
                _ => {}
            }
        }

        stats.rejected = self.translate_pending(&mut items, cache, ledger).await?;
        stats.translated = items
            .iter()
            .filter(|i| i.state == CaptionState::Translated)
            .count();

        if !items.iter().any(|i| i.modified) {
            info!("No changes to file detected");
            return Ok(FileOutcome::Unchanged);
        }

        // Reassemble in original order; classification and merge never
        // reorder, so a plain map preserves the index sequence.
        let captions: Vec<Caption> = items.into_iter().map(|i| i.caption).collect();
        let content = subtitle_processor::build(&captions, format);

        Ok(FileOutcome::Translated { content, stats })
    }

    /// Classify captions against the needs-translation predicate and the
    /// cache. Cache hits take the cached text immediately.
    fn classify(&self, captions: Vec<Caption>, cache: &TranslationStore) -> Vec<TlCaption> {
        let source_lang = self.translator.source_lang();
        let active = self.translator.kind();

        captions
            .into_iter()
            .map(|caption| {
                let text = caption.text.trim().to_string();

                if caption.kind != CaptionKind::Dialogue
                    || text.is_empty()
                    || !self.scripts.needs_translation(&text, source_lang)
                {
                    return TlCaption {
                        caption,
                        state: CaptionState::Skip,
                        modified: false,
                        detected_source_lang: None,
                    };
                }

                if let Some(entry) = cache.get(&text, active) {
                    let modified = caption.text != entry.text;
                    let detected = entry.detected_source_lang.clone();
                    let mut caption = caption;
                    caption.text = entry.text.clone();
                    return TlCaption {
                        caption,
                        state: CaptionState::Cache,
                        modified,
                        detected_source_lang: detected,
                    };
                }

                TlCaption {
                    caption,
                    state: CaptionState::Untranslated,
                    modified: false,
                    detected_source_lang: None,
                }
            })
            .collect()
    }

    /// Submit every untranslated caption in one batch, validate each result,
    /// and merge accepted ones back by explicit caption-index lookup.
    ///
    /// Returns the number of rejected results.
    async fn translate_pending(
        &self,
        items: &mut [TlCaption],
        cache: &mut TranslationStore,
        ledger: &mut RejectionLedger,
    ) -> Result<usize> {
        let batch: Vec<(usize, String)> = items
            .iter()
            .filter(|i| i.state == CaptionState::Untranslated)
            .map(|i| (i.caption.index, i.caption.text.trim().to_string()))
            .collect();

        if batch.is_empty() {
            info!("No lines to translate");
            return Ok(0);
        }

        info!("Translating {} lines", batch.len());
        let lines: Vec<String> = batch.iter().map(|(_, text)| text.clone()).collect();
        let results = self.translator.translate(&lines).await;

        if results.len() != batch.len() {
            // The provider contract guarantees same length; a mismatch means
            // we can no longer trust any positional pairing.
            return Err(anyhow!(
                "Provider returned {} results for {} lines",
                results.len(),
                batch.len()
            ));
        }

        let expected_source = self.translator.source_lang();
        let target = self.translator.target_lang();
        let mut rejected = 0;
        let mut accepted = 0;

        for ((index, original), result) in batch.into_iter().zip(results) {
            // Merge back by explicit index lookup: the batch was extracted
            // out of positional context, and a miss means the batch and the
            // source sequence have diverged.
            let Some(item) = items.iter_mut().find(|i| i.caption.index == index) else {
                error!("Unable to find original caption for translated caption. Something went very wrong.");
                error!("Offending caption index {}: {:?} -> {:?}", index, original, result);
                error!("Full sequence: {:?}", items);
                return Err(anyhow!(
                    "Batch result for caption index {} has no matching caption",
                    index
                ));
            };

            match validate(&original, &result, expected_source, target, &self.scripts) {
                Ok(()) => {
                    cache.insert(&original, &result);
                    item.caption.text = result.text.clone();
                    item.state = CaptionState::Translated;
                    item.modified = true;
                    item.detected_source_lang = result.detected_source_lang.clone();
                    accepted += 1;
                }
                Err(reason) => {
                    warn!("Rejected translation of '{}': {}", original, reason);
                    ledger.record(&original, &result)?;
                    rejected += 1;
                    // Caption stays untranslated with its prior text
                    debug!("Caption {} left untranslated", index);
                }
            }
        }

        info!(
            "Finished translation resulting in {} valid translations",
            accepted
        );
        Ok(rejected)
    }
}
