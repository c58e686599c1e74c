use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::providers::Translator;
use crate::subtitle_processor::SubtitleFormat;
use crate::translation::{CaptionPipeline, FileOutcome, RejectionLedger, TranslationStore};

// @module: Application controller for the batch translation run

// @const: DLsite-style work codes ("RJ123456") used to group files for logging
static PROJECT_CODE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"R.\d+").unwrap());

/// Totals for the end-of-run summary
#[derive(Debug, Default)]
pub struct RunSummary {
    pub translated_files: usize,
    pub unchanged_files: usize,
    pub failed_files: usize,
}

/// Main application controller: discovers files, groups them by work unit,
/// and drives the caption pipeline over each file sequentially.
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the whole batch with an already-initialized pipeline.
    ///
    /// Split out from `run` so tests can drive the controller with a mock
    /// translator. Loads both stores eagerly, then processes every
    /// discovered file; per-file errors are logged and do not abort the run.
    pub async fn run_with_pipeline<T: Translator>(
        &self,
        pipeline: &CaptionPipeline<T>,
    ) -> Result<RunSummary> {
        let mut cache = TranslationStore::load(&self.config.cache_path)?;
        let mut ledger = RejectionLedger::load(&self.config.ledger_path)?;

        let files = FileManager::find_subtitle_files(&self.config.input_root)?;
        let groups = group_by_work_unit(&files);
        info!("Found {} folder entries.", groups.len());

        let progress = ProgressBar::new(files.len() as u64);
        progress.set_style(
            ProgressStyle::with_template("{bar:30} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let mut summary = RunSummary::default();
        for (work_unit, group_files) in &groups {
            info!("Parsing {}...", work_unit);
            for file in group_files {
                progress.set_message(file.display().to_string());
                match self
                    .process_file(pipeline, file, &mut cache, &mut ledger)
                    .await
                {
                    Ok(true) => summary.translated_files += 1,
                    Ok(false) => summary.unchanged_files += 1,
                    Err(e) => {
                        error!("Failed to process {:?}: {:#}", file, e);
                        summary.failed_files += 1;
                    }
                }
                progress.inc(1);
            }
        }
        progress.finish_and_clear();

        info!(
            "Finished processing all files: {} translated, {} unchanged, {} failed ({} cache entries, {} ledger entries)",
            summary.translated_files,
            summary.unchanged_files,
            summary.failed_files,
            cache.len(),
            ledger.len()
        );
        Ok(summary)
    }

    /// Process one file end to end. Returns true when the file was changed
    /// and written out.
    async fn process_file<T: Translator>(
        &self,
        pipeline: &CaptionPipeline<T>,
        relative: &Path,
        cache: &mut TranslationStore,
        ledger: &mut RejectionLedger,
    ) -> Result<bool> {
        info!("Reading {:?}", relative);
        let input_path = self.config.input_root.join(relative);
        let format = SubtitleFormat::from_path(&input_path)?;
        let content = FileManager::read_to_string(&input_path)?;

        match pipeline
            .process_content(&content, format, cache, ledger)
            .await?
        {
            FileOutcome::Unchanged => Ok(false),
            FileOutcome::Translated { content, stats } => {
                self.backup_and_write(relative, &content)?;
                // Flush the cache only after the output is safely on disk,
                // so a failed write never persists unproven entries ahead
                // of their file.
                cache
                    .flush()
                    .context("Failed to flush translation cache")?;

                if stats.rejected > 0 {
                    warn!(
                        "Completed file {:?} with {} rejected lines",
                        relative, stats.rejected
                    );
                } else {
                    info!(
                        "Completed file {:?} ({} translated, {} from cache, {} skipped)",
                        relative, stats.translated, stats.from_cache, stats.skipped
                    );
                }
                Ok(true)
            }
        }
    }

    /// Copy the pristine original into the backup root, then write the
    /// translated content under the output root, both at the same relative
    /// path as the input.
    fn backup_and_write(&self, relative: &Path, content: &str) -> Result<()> {
        let input_path = self.config.input_root.join(relative);
        let backup_path = self.config.backup_root.join(relative);
        let output_path = self.config.output_root.join(relative);

        FileManager::copy_file(&input_path, &backup_path)?;
        FileManager::write_to_file(&output_path, content)?;
        Ok(())
    }
}

/// Group relative file paths by work-unit key: the first DLsite-style code
/// found in the path, falling back to the parent directory. Logging-only;
/// translation logic never sees the groups.
pub fn group_by_work_unit(files: &[PathBuf]) -> BTreeMap<String, Vec<PathBuf>> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();

    for file in files {
        let path_str = file.display().to_string();
        let key = PROJECT_CODE_REGEX
            .find(&path_str)
            .map(|m| m.as_str().to_string())
            .or_else(|| {
                file.parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(|p| p.display().to_string())
            })
            .unwrap_or_else(|| ".".to_string());

        groups.entry(key).or_default().push(file.clone());
    }

    groups
}
