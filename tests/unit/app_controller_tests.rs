/*!
 * Tests for discovery grouping and controller construction
 */

use std::path::PathBuf;

use subtl::app_config::Config;
use subtl::app_controller::{Controller, group_by_work_unit};
use subtl::file_utils::FileManager;

use crate::common::{create_temp_dir, create_test_file};

#[test]
fn test_group_by_work_unit_shouldGroupByProjectCode() {
    let files = vec![
        PathBuf::from("RJ123456/track1.srt"),
        PathBuf::from("RJ123456/extras/track2.srt"),
        PathBuf::from("RJ999999/track1.lrc"),
    ];
    let groups = group_by_work_unit(&files);

    assert_eq!(groups.len(), 2);
    assert_eq!(groups["RJ123456"].len(), 2);
    assert_eq!(groups["RJ999999"].len(), 1);
}

#[test]
fn test_group_by_work_unit_withoutProjectCode_shouldFallBackToParentDir() {
    let files = vec![
        PathBuf::from("season1/ep1.srt"),
        PathBuf::from("season1/ep2.srt"),
        PathBuf::from("loose.srt"),
    ];
    let groups = group_by_work_unit(&files);

    assert_eq!(groups["season1"].len(), 2);
    // A file at the root has no parent to name the group
    assert_eq!(groups["."].len(), 1);
}

#[test]
fn test_find_subtitle_files_shouldReturnRelativePathsForKnownExtensions() {
    let dir = create_temp_dir().unwrap();
    create_test_file(dir.path(), "RJ123456/a.srt", "x").unwrap();
    create_test_file(dir.path(), "RJ123456/b.vtt", "x").unwrap();
    create_test_file(dir.path(), "RJ123456/cover.jpg", "x").unwrap();
    create_test_file(dir.path(), "notes.txt", "x").unwrap();

    let files = FileManager::find_subtitle_files(dir.path()).unwrap();

    assert_eq!(files.len(), 2);
    assert!(files.contains(&PathBuf::from("RJ123456/a.srt")));
    assert!(files.contains(&PathBuf::from("RJ123456/b.vtt")));
}

#[test]
fn test_controller_with_config_shouldValidateUpfront() {
    // Default config selects DeepL without a key
    assert!(Controller::with_config(Config::default()).is_err());

    let mut config = Config::default();
    config.deepl.api_key = "key".to_string();
    assert!(Controller::with_config(config).is_ok());
}
