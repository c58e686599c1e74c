/*!
 * Common test utilities for the subtl test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// A small Japanese SRT file with two dialogue lines
pub fn japanese_srt() -> &'static str {
    "1\n00:00:01,000 --> 00:00:04,000\nこんにちは\n\n2\n00:00:05,000 --> 00:00:09,000\nありがとう\n\n"
}

/// An SRT file whose dialogue is already in the target language
pub fn english_srt() -> &'static str {
    "1\n00:00:01,000 --> 00:00:04,000\nHello\n\n2\n00:00:05,000 --> 00:00:09,000\nThank you\n\n"
}
