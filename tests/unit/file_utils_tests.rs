/*!
 * Tests for file and folder operations
 */

use std::fs;

use webslate::errors::AppError;
use webslate::file_utils::FileManager;

use crate::common;

#[test]
fn test_loadInput_withExistingFile_shouldReturnContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(temp_dir.path(), "in.txt", "Héllo. World!").unwrap();

    assert_eq!(FileManager::load_input(&file).unwrap(), "Héllo. World!");
}

#[test]
fn test_loadInput_withMissingFile_shouldReturnInputNotFound() {
    let temp_dir = common::create_temp_dir().unwrap();
    let missing = temp_dir.path().join("missing.txt");

    match FileManager::load_input(&missing) {
        Err(AppError::InputNotFound(path)) => assert_eq!(path, missing),
        other => panic!("expected InputNotFound, got {:?}", other),
    }
}

#[test]
fn test_writeToFile_shouldCreateParentsAndReplaceContent() {
    let temp_dir = common::create_temp_dir().unwrap();
    let target = temp_dir.path().join("nested").join("deeper").join("out.txt");

    FileManager::write_to_file(&target, "first").unwrap();
    FileManager::write_to_file(&target, "second").unwrap();

    assert_eq!(fs::read_to_string(&target).unwrap(), "second");
}

#[test]
fn test_ensureDir_withEmptyPath_shouldDoNothing() {
    assert!(FileManager::ensure_dir("").is_ok());
}
