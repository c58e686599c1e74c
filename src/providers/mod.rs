/*!
 * Provider implementations for the supported translation backends.
 *
 * - DeepL: hosted API, batch-capable (one round trip per file)
 * - Libre: self-hosted LibreTranslate server, one round trip per line
 * - Luna: local LunaTranslator bridge, one round trip per line
 *
 * All backends are driven through the `Translator` trait and selected via
 * the closed `ActiveTranslator` union, so the pipeline never branches on
 * provider strings.
 */

use std::fmt;
use std::fmt::Debug;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

pub mod deepl;
pub mod libre;
pub mod luna;
pub mod mock;

pub use deepl::DeepLTranslator;
pub use libre::LibreTranslator;
pub use luna::LunaTranslator;

/// Identity of a translation backend.
///
/// The uppercase serialization matches the persisted cache format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProviderKind {
    DeepL,
    Libre,
    Luna,
}

impl ProviderKind {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::DeepL => "DeepL",
            Self::Libre => "LibreTranslate",
            Self::Luna => "LunaTranslator",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeepL => write!(f, "deepl"),
            Self::Libre => write!(f, "libre"),
            Self::Luna => write!(f, "luna"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deepl" => Ok(Self::DeepL),
            "libre" => Ok(Self::Libre),
            "luna" => Ok(Self::Luna),
            _ => Err(anyhow!(
                "Unknown translation provider: {} (expected deepl, libre or luna)",
                s
            )),
        }
    }
}

/// Output of a provider call for one line. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    /// Translated text, already trimmed; empty when the call failed
    pub text: String,

    /// Source language the backend detected, when reported
    pub detected_source_lang: Option<String>,

    /// Which backend produced this result
    pub translator: ProviderKind,
}

impl TranslationResult {
    /// Placeholder for a failed line; validation rejects it as empty
    pub fn empty(translator: ProviderKind) -> Self {
        TranslationResult {
            text: String::new(),
            detected_source_lang: None,
            translator,
        }
    }
}

/// Common contract for all translation backends.
///
/// `init` verifies credentials, connectivity, and configured language
/// support; any error out of it is fatal for the run. `translate` is
/// infallible by contract: it returns one result per input line, in input
/// order, and degrades failed lines (or a failed batch) to empty-text
/// results so downstream validation rejects them without aborting the file.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Stable identity of this backend
    fn kind(&self) -> ProviderKind;

    /// Declared source language, if fixed (None means auto-detect)
    fn source_lang(&self) -> Option<&str>;

    /// Target language for this run
    fn target_lang(&self) -> &str;

    /// Verify the backend is usable; fatal on error
    async fn init(&mut self) -> Result<(), ProviderError>;

    /// Translate the given lines, one result per line in input order
    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult>;

    /// Translate with an explicit source-language override (None means
    /// auto-detect), for callers that know the source per entry. Backends
    /// without a source parameter ignore the override.
    async fn translate_from(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        let _ = source_lang;
        self.translate(lines).await
    }
}

/// Closed union over the known backends.
///
/// Adding a provider means adding one variant here plus its `Translator`
/// implementation.
#[derive(Debug)]
pub enum ActiveTranslator {
    DeepL(DeepLTranslator),
    Libre(LibreTranslator),
    Luna(LunaTranslator),
}

impl ActiveTranslator {
    /// Construct the configured backend. Does not touch the network;
    /// `init` performs the connectivity and capability checks.
    pub fn from_config(config: &crate::app_config::Config) -> Result<Self> {
        match config.provider {
            ProviderKind::DeepL => Ok(Self::DeepL(DeepLTranslator::new(
                &config.deepl.endpoint,
                &config.deepl.api_key,
                config.deepl.source_lang.clone(),
                config.deepl.target_lang.clone(),
            )?)),
            ProviderKind::Libre => Ok(Self::Libre(LibreTranslator::new(
                &config.libre.endpoint,
                config.libre.source_lang.clone(),
                config.libre.target_lang.clone(),
            )?)),
            ProviderKind::Luna => Ok(Self::Luna(LunaTranslator::new(
                &config.luna.endpoint,
                config.luna.engine.clone(),
                config.luna.source_lang.clone(),
                config.luna.target_lang.clone(),
            )?)),
        }
    }

    fn inner(&self) -> &dyn Translator {
        match self {
            Self::DeepL(t) => t,
            Self::Libre(t) => t,
            Self::Luna(t) => t,
        }
    }
}

#[async_trait]
impl Translator for ActiveTranslator {
    fn kind(&self) -> ProviderKind {
        self.inner().kind()
    }

    fn source_lang(&self) -> Option<&str> {
        self.inner().source_lang()
    }

    fn target_lang(&self) -> &str {
        self.inner().target_lang()
    }

    async fn init(&mut self) -> Result<(), ProviderError> {
        match self {
            Self::DeepL(t) => t.init().await,
            Self::Libre(t) => t.init().await,
            Self::Luna(t) => t.init().await,
        }
    }

    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult> {
        self.inner().translate(lines).await
    }

    async fn translate_from(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        self.inner().translate_from(lines, source_lang).await
    }
}
