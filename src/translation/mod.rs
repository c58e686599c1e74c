/*!
 * Translation orchestration: caching, validation, and the per-file pipeline.
 *
 * Submodules:
 *
 * - `store`: persistent translation cache and rejected-translation ledger
 * - `script`: "needs translation" Unicode script heuristic
 * - `validate`: acceptance gate applied to every raw provider result
 * - `pipeline`: per-file classification, batch submission, and merge
 * - `retranslate`: offline retry pass over a rejected-translation ledger
 */

// Re-export main types for easier usage
pub use self::pipeline::{CaptionPipeline, CaptionState, FileOutcome, FileStats};
pub use self::retranslate::{RetranslateSummary, retranslate_ledger};
pub use self::script::ScriptTable;
pub use self::store::{CacheEntry, RejectionLedger, TranslationStore};
pub use self::validate::{RejectReason, validate};

// Submodules
pub mod pipeline;
pub mod retranslate;
pub mod script;
pub mod store;
pub mod validate;
