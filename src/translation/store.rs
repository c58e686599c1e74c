/*!
 * Persistent translation cache and rejected-translation ledger.
 *
 * Both stores are JSON object snapshots keyed by the trimmed original text.
 * They are loaded eagerly at startup (a missing file is an empty store, not
 * an error) and written out as a full pretty-printed snapshot on flush, so
 * a crash mid-run loses at most the in-flight file's increment.
 */

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::providers::{ProviderKind, TranslationResult};

/// One accepted (cache) or rejected (ledger) translation on disk.
///
/// `translator` is optional when deserializing so cache files written by the
/// old single-provider format still load; such entries carry no provider
/// identity and are never returned as hits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    /// Accepted translated text
    pub text: String,

    /// Source language the provider detected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_source_lang: Option<String>,

    /// Provider that produced this entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translator: Option<ProviderKind>,
}

impl From<&TranslationResult> for CacheEntry {
    fn from(result: &TranslationResult) -> Self {
        CacheEntry {
            text: result.text.clone(),
            detected_source_lang: result.detected_source_lang.clone(),
            translator: Some(result.translator),
        }
    }
}

/// Shared load/flush behavior for both JSON stores.
///
/// A BTreeMap keeps the snapshot ordering stable across runs, which makes
/// the persisted files diffable.
#[derive(Debug)]
struct JsonStore {
    path: PathBuf,
    entries: BTreeMap<String, CacheEntry>,
}

impl JsonStore {
    fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = load_snapshot(&path)?;
        Ok(JsonStore { path, entries })
    }

    fn flush(&self) -> Result<()> {
        write_snapshot(&self.path, &self.entries)
    }
}

/// Read a store-shaped snapshot as a plain map; a missing file is empty
pub fn load_snapshot<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, CacheEntry>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read store file: {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse store file: {:?}", path))
}

/// Write a full pretty-printed snapshot, creating parent directories
pub fn write_snapshot<P: AsRef<Path>>(
    path: P,
    entries: &BTreeMap<String, CacheEntry>,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }
    }
    let content = serde_json::to_string_pretty(entries)?;
    fs::write(path, content).with_context(|| format!("Failed to write store file: {:?}", path))
}

/// Persistent mapping from original caption text to its accepted translation.
///
/// Invariant: every entry passed validation at the time it was written.
/// Entries are never evicted automatically; clearing the backing file is an
/// operator decision.
#[derive(Debug)]
pub struct TranslationStore {
    store: JsonStore,
}

impl TranslationStore {
    /// Load the cache from disk; a missing file yields an empty cache
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = JsonStore::load(path)?;
        debug!(
            "Loaded {} cache entries from {:?}",
            store.entries.len(),
            store.path
        );
        Ok(TranslationStore { store })
    }

    /// Look up a cached translation, scoped to the active provider.
    ///
    /// Entries written by a different provider (or by the legacy unscoped
    /// format) are treated as absent; empty stored text is treated as a miss.
    pub fn get(&self, text: &str, active: ProviderKind) -> Option<&CacheEntry> {
        self.store
            .entries
            .get(text)
            .filter(|entry| entry.translator == Some(active) && !entry.text.is_empty())
    }

    /// Record an accepted translation. Caller must have validated it first.
    pub fn insert(&mut self, text: &str, result: &TranslationResult) {
        self.store
            .entries
            .insert(text.to_string(), CacheEntry::from(result));
    }

    /// Write the full snapshot to disk
    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }

    pub fn len(&self) -> usize {
        self.store.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.entries.is_empty()
    }
}

/// Diagnostic record of rejected translation attempts.
///
/// Not authoritative: later runs may overwrite an entry, and nothing in the
/// pipeline reads it back. It exists for offline inspection.
#[derive(Debug)]
pub struct RejectionLedger {
    store: JsonStore,
}

impl RejectionLedger {
    /// Load the ledger from disk; a missing file yields an empty ledger
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let store = JsonStore::load(path)?;
        Ok(RejectionLedger { store })
    }

    /// Record a rejected result and persist the snapshot immediately
    pub fn record(&mut self, text: &str, result: &TranslationResult) -> Result<()> {
        self.store
            .entries
            .insert(text.to_string(), CacheEntry::from(result));
        self.store.flush()
    }

    pub fn len(&self) -> usize {
        self.store.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.entries.is_empty()
    }

    /// Entries currently held, for reporting
    pub fn entries(&self) -> impl Iterator<Item = (&String, &CacheEntry)> {
        self.store.entries.iter()
    }
}
