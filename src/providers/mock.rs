/*!
 * Scripted mock translator for tests.
 *
 * Responses are pre-programmed per input line; every batch the pipeline
 * submits is recorded so tests can assert exactly what was (or was not)
 * sent to the provider.
 */

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::errors::ProviderError;

use super::{ProviderKind, TranslationResult, Translator};

/// Mock translation backend with scripted responses
#[derive(Debug)]
pub struct MockTranslator {
    kind: ProviderKind,
    source_lang: Option<String>,
    target_lang: String,
    responses: HashMap<String, TranslationResult>,
    calls: Mutex<Vec<Vec<String>>>,
    source_overrides: Mutex<Vec<Option<String>>>,
    fail_init: bool,
}

impl MockTranslator {
    /// Create a mock with auto-detect source and an "en" target
    pub fn new(kind: ProviderKind) -> Self {
        MockTranslator {
            kind,
            source_lang: None,
            target_lang: "en".to_string(),
            responses: HashMap::new(),
            calls: Mutex::new(Vec::new()),
            source_overrides: Mutex::new(Vec::new()),
            fail_init: false,
        }
    }

    /// Set the declared source and target languages
    pub fn with_languages(mut self, source: Option<&str>, target: &str) -> Self {
        self.source_lang = source.map(|s| s.to_string());
        self.target_lang = target.to_string();
        self
    }

    /// Script the result for one input line
    pub fn with_response(mut self, line: &str, text: &str, detected: Option<&str>) -> Self {
        self.responses.insert(
            line.to_string(),
            TranslationResult {
                text: text.to_string(),
                detected_source_lang: detected.map(|d| d.to_string()),
                translator: self.kind,
            },
        );
        self
    }

    /// Make init fail, to exercise fatal-startup paths
    pub fn with_failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    /// Every batch of lines this mock was asked to translate
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of translate calls received
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Source overrides received through `translate_from`, in call order
    pub fn source_overrides(&self) -> Vec<Option<String>> {
        self.source_overrides.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn kind(&self) -> ProviderKind {
        self.kind
    }

    fn source_lang(&self) -> Option<&str> {
        self.source_lang.as_deref()
    }

    fn target_lang(&self) -> &str {
        &self.target_lang
    }

    async fn init(&mut self) -> Result<(), ProviderError> {
        if self.fail_init {
            return Err(ProviderError::AuthenticationError(
                "mock init failure".to_string(),
            ));
        }
        Ok(())
    }

    async fn translate(&self, lines: &[String]) -> Vec<TranslationResult> {
        self.calls.lock().unwrap().push(lines.to_vec());
        lines
            .iter()
            .map(|line| {
                self.responses
                    .get(line)
                    .cloned()
                    .unwrap_or_else(|| TranslationResult::empty(self.kind))
            })
            .collect()
    }

    async fn translate_from(
        &self,
        lines: &[String],
        source_lang: Option<&str>,
    ) -> Vec<TranslationResult> {
        self.source_overrides
            .lock()
            .unwrap()
            .push(source_lang.map(|s| s.to_string()));
        self.translate(lines).await
    }
}
