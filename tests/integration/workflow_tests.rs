/*!
 * End-to-end batch run tests with a mock provider
 */

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use subtl::app_config::Config;
use subtl::app_controller::Controller;
use subtl::providers::ProviderKind;
use subtl::providers::mock::MockTranslator;
use subtl::translation::{CaptionPipeline, ScriptTable};

use crate::common::{create_temp_dir, create_test_file, english_srt, japanese_srt};

/// A config whose roots all live under one temp directory
fn test_config(root: &Path) -> Config {
    let vars: HashMap<String, String> = [
        ("INPUT_PATH", root.join("queue")),
        ("BACKUP_PATH", root.join("backup")),
        ("OUTPUT_PATH", root.join("output")),
        ("CACHE_PATH", root.join("data/tlcache.json")),
        ("LEDGER_PATH", root.join("data/tlrejected.json")),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.display().to_string()))
    .collect();
    let mut config = Config::from_vars(&vars).unwrap();
    // The mock stands in for DeepL; no key needed, but validation wants one
    config.deepl.api_key = "test-key".to_string();
    config
}

fn japanese_pipeline() -> CaptionPipeline<MockTranslator> {
    let mock = MockTranslator::new(ProviderKind::DeepL)
        .with_languages(Some("ja"), "en")
        .with_response("こんにちは", "Hello", Some("ja"))
        .with_response("ありがとう", "Thank you", Some("ja"));
    CaptionPipeline::new(mock, ScriptTable::default())
}

#[tokio::test]
async fn test_run_shouldTranslateBackupAndPersistCache() {
    let dir = create_temp_dir().unwrap();
    let config = test_config(dir.path());
    create_test_file(&config.input_root, "RJ123456/audio.srt", japanese_srt()).unwrap();

    let controller = Controller::with_config(config.clone()).unwrap();
    let summary = controller
        .run_with_pipeline(&japanese_pipeline())
        .await
        .unwrap();

    assert_eq!(summary.translated_files, 1);
    assert_eq!(summary.failed_files, 0);

    // Output holds the translation, backup holds the pristine original
    let output = fs::read_to_string(config.output_root.join("RJ123456/audio.srt")).unwrap();
    assert!(output.contains("Hello"));
    assert!(output.contains("Thank you"));
    let backup = fs::read_to_string(config.backup_root.join("RJ123456/audio.srt")).unwrap();
    assert_eq!(backup, japanese_srt());

    // The cache snapshot was flushed after the successful write
    let cache = fs::read_to_string(&config.cache_path).unwrap();
    assert!(cache.contains("こんにちは"));
    assert!(cache.contains("\"translator\": \"DEEPL\""));
}

#[tokio::test]
async fn test_run_onAlreadyTargetLanguageFile_shouldWriteNothing() {
    let dir = create_temp_dir().unwrap();
    let config = test_config(dir.path());
    create_test_file(&config.input_root, "RJ123456/audio.srt", english_srt()).unwrap();

    let controller = Controller::with_config(config.clone()).unwrap();
    let summary = controller
        .run_with_pipeline(&japanese_pipeline())
        .await
        .unwrap();

    assert_eq!(summary.unchanged_files, 1);
    assert_eq!(summary.translated_files, 0);

    // No-op skip: no backup file is created and no output file is written
    assert!(!config.backup_root.join("RJ123456/audio.srt").exists());
    assert!(!config.output_root.join("RJ123456/audio.srt").exists());
}

#[tokio::test]
async fn test_run_withMixedFiles_shouldContinuePastFailures() {
    let dir = create_temp_dir().unwrap();
    let config = test_config(dir.path());
    create_test_file(&config.input_root, "RJ123456/good.srt", japanese_srt()).unwrap();
    // Unparseable: no timing lines at all
    create_test_file(&config.input_root, "RJ123456/broken.srt", "not a subtitle\n").unwrap();

    let controller = Controller::with_config(config.clone()).unwrap();
    let summary = controller
        .run_with_pipeline(&japanese_pipeline())
        .await
        .unwrap();

    assert_eq!(summary.translated_files, 1);
    assert_eq!(summary.failed_files, 1);
    assert!(config.output_root.join("RJ123456/good.srt").exists());
}

#[tokio::test]
async fn test_run_twice_shouldServeSecondRunFromCache() {
    let dir = create_temp_dir().unwrap();
    let config = test_config(dir.path());
    create_test_file(&config.input_root, "RJ123456/audio.srt", japanese_srt()).unwrap();

    let controller = Controller::with_config(config.clone()).unwrap();
    let pipeline = japanese_pipeline();
    controller.run_with_pipeline(&pipeline).await.unwrap();
    assert_eq!(pipeline.translator().call_count(), 1);

    // A fresh pipeline with no scripted responses: the persisted cache must
    // answer everything, so the provider is never called
    let empty_mock =
        MockTranslator::new(ProviderKind::DeepL).with_languages(Some("ja"), "en");
    let second = CaptionPipeline::new(empty_mock, ScriptTable::default());
    let summary = controller.run_with_pipeline(&second).await.unwrap();

    assert_eq!(summary.translated_files, 1);
    assert_eq!(second.translator().call_count(), 0);
    let output = fs::read_to_string(config.output_root.join("RJ123456/audio.srt")).unwrap();
    assert!(output.contains("Hello"));
}
