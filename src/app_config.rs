/*!
 * Application configuration module.
 *
 * Configuration is environment-style key/value (a `.env` file loaded via
 * dotenvy, plus the process environment), matching how the tool is deployed:
 * one operator, one configured provider per run. Every optional key has a
 * stated default.
 */

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::language_utils;
use crate::providers::ProviderKind;

/// Represents the application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root folder scanned for subtitle files
    pub input_root: PathBuf,

    /// Root folder receiving pristine backups of changed files
    pub backup_root: PathBuf,

    /// Root folder receiving translated output
    pub output_root: PathBuf,

    /// Persistent accepted-translation cache file
    pub cache_path: PathBuf,

    /// Persistent rejected-translation ledger file
    pub ledger_path: PathBuf,

    /// Selected translation provider
    pub provider: ProviderKind,

    /// DeepL backend settings
    pub deepl: DeepLConfig,

    /// LibreTranslate backend settings
    pub libre: LibreConfig,

    /// LunaTranslator backend settings
    pub luna: LunaConfig,
}

/// DeepL backend configuration
#[derive(Debug, Clone)]
pub struct DeepLConfig {
    /// API base URL
    pub endpoint: String,

    /// API authentication key
    pub api_key: String,

    /// Fixed source language, or None for auto-detect
    pub source_lang: Option<String>,

    /// Target language code
    pub target_lang: String,
}

/// LibreTranslate backend configuration
#[derive(Debug, Clone)]
pub struct LibreConfig {
    /// Server base URL
    pub endpoint: String,

    /// Source language code, "auto" for detection
    pub source_lang: String,

    /// Target language code
    pub target_lang: String,
}

/// LunaTranslator backend configuration
#[derive(Debug, Clone)]
pub struct LunaConfig {
    /// Bridge base URL
    pub endpoint: String,

    /// Engine name as configured inside LunaTranslator, empty for default
    pub engine: String,

    /// Declared source language, if any
    pub source_lang: Option<String>,

    /// Target language the engine translates into
    pub target_lang: String,
}

fn default_input_root() -> String {
    "./queue".to_string()
}

fn default_backup_root() -> String {
    "./backup".to_string()
}

fn default_output_root() -> String {
    "./output".to_string()
}

fn default_cache_path() -> String {
    "./data/tlcache.json".to_string()
}

fn default_ledger_path() -> String {
    "./data/tlrejected.json".to_string()
}

fn default_deepl_endpoint() -> String {
    "https://api-free.deepl.com".to_string()
}

fn default_deepl_target_lang() -> String {
    "en-US".to_string()
}

fn default_libre_endpoint() -> String {
    "http://127.0.0.1:5000/".to_string()
}

fn default_libre_source_lang() -> String {
    "auto".to_string()
}

fn default_libre_target_lang() -> String {
    "en".to_string()
}

fn default_luna_endpoint() -> String {
    "http://127.0.0.1:2333/".to_string()
}

fn default_luna_target_lang() -> String {
    "en".to_string()
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build the configuration from an explicit key/value map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| -> Option<String> {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let provider = match get("TRANSLATOR") {
            Some(value) => ProviderKind::from_str(&value)?,
            None => ProviderKind::DeepL,
        };

        Ok(Config {
            input_root: PathBuf::from(get("INPUT_PATH").unwrap_or_else(default_input_root)),
            backup_root: PathBuf::from(get("BACKUP_PATH").unwrap_or_else(default_backup_root)),
            output_root: PathBuf::from(get("OUTPUT_PATH").unwrap_or_else(default_output_root)),
            cache_path: PathBuf::from(get("CACHE_PATH").unwrap_or_else(default_cache_path)),
            ledger_path: PathBuf::from(get("LEDGER_PATH").unwrap_or_else(default_ledger_path)),
            provider,
            deepl: DeepLConfig {
                endpoint: get("DEEPL_ENDPOINT").unwrap_or_else(default_deepl_endpoint),
                api_key: get("DEEPL_API_KEY").unwrap_or_default(),
                source_lang: get("DEEPL_SOURCE_LANG"),
                target_lang: get("DEEPL_TARGET_LANG").unwrap_or_else(default_deepl_target_lang),
            },
            libre: LibreConfig {
                endpoint: get("LIBRE_ENDPOINT").unwrap_or_else(default_libre_endpoint),
                source_lang: get("LIBRE_SOURCE_LANG").unwrap_or_else(default_libre_source_lang),
                target_lang: get("LIBRE_TARGET_LANG").unwrap_or_else(default_libre_target_lang),
            },
            luna: LunaConfig {
                endpoint: get("LUNA_ENDPOINT").unwrap_or_else(default_luna_endpoint),
                engine: get("LUNA_TRANSLATOR").unwrap_or_default(),
                source_lang: get("LUNA_SOURCE_LANG"),
                target_lang: get("LUNA_TARGET_LANG").unwrap_or_else(default_luna_target_lang),
            },
        })
    }

    /// The source language the active provider declares, if fixed
    pub fn active_source_lang(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::DeepL => self.deepl.source_lang.as_deref(),
            ProviderKind::Libre => {
                let source = self.libre.source_lang.as_str();
                if source.is_empty() || source.eq_ignore_ascii_case("auto") {
                    None
                } else {
                    Some(source)
                }
            }
            ProviderKind::Luna => self.luna.source_lang.as_deref(),
        }
    }

    /// The target language of the active provider
    pub fn active_target_lang(&self) -> &str {
        match self.provider {
            ProviderKind::DeepL => &self.deepl.target_lang,
            ProviderKind::Libre => &self.libre.target_lang,
            ProviderKind::Luna => &self.luna.target_lang,
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::validate_language_tag(self.active_target_lang())?;
        if let Some(source) = self.active_source_lang() {
            language_utils::validate_language_tag(source)?;
        }

        if self.provider == ProviderKind::DeepL && self.deepl.api_key.is_empty() {
            return Err(anyhow!(
                "DEEPL_API_KEY is required for the DeepL provider. Set it in the environment or a .env file"
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(&HashMap::new()).expect("default configuration is valid")
    }
}
