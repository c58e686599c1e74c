/*!
 * # subtl - batch subtitle translator
 *
 * A Rust tool for batch-translating subtitle files through an external
 * translation provider, with a persistent cache and a validation gate that
 * keeps bad translations out of the output.
 *
 * ## Features
 *
 * - Translate folder trees of subtitle files (SRT, WebVTT, LRC)
 * - Pluggable providers: DeepL, LibreTranslate, LunaTranslator
 * - Persistent translation cache to avoid duplicate API calls
 * - Rejected-translation ledger for offline inspection
 * - Validation of every provider result before anything is persisted
 * - Backup of the pristine original before any file is written
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Environment-style configuration management
 * - `subtitle_processor`: Subtitle parsing and serialization
 * - `translation`: The translation orchestration pipeline:
 *   - `translation::store`: Cache and rejection-ledger persistence
 *   - `translation::script`: "Needs translation" script heuristic
 *   - `translation::validate`: Acceptance gate for provider results
 *   - `translation::pipeline`: Per-file caption state machine
 *   - `translation::retranslate`: Retry pass over the rejection ledger
 * - `providers`: Clients for the supported translation backends:
 *   - `providers::deepl`: DeepL API client (batch-capable)
 *   - `providers::libre`: LibreTranslate client (line-at-a-time)
 *   - `providers::luna`: LunaTranslator bridge client (line-at-a-time)
 * - `file_utils`: File system operations
 * - `app_controller`: Discovery, grouping, and the per-file run loop
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod subtitle_processor;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, ProviderError};
pub use providers::{ActiveTranslator, ProviderKind, TranslationResult, Translator};
pub use subtitle_processor::{Caption, CaptionKind, SubtitleFormat};
pub use translation::{CaptionPipeline, RejectReason, ScriptTable, TranslationStore};
