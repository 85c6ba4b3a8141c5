/*!
 * Common test utilities for the webslate test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use webslate::Config;

/// Routes library logs to the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Configuration with every wait disabled
pub fn fast_config() -> Config {
    Config {
        fixed_delay_secs: 0.0,
        element_timeout_secs: 0.0,
        ..Config::default()
    }
}

/// Configuration with every wait disabled and a custom chunk limit
pub fn fast_config_with_limit(char_limit: usize) -> Config {
    Config {
        char_limit,
        ..fast_config()
    }
}

/// A paragraph long enough to need several chunks at small limits
pub fn sample_text() -> &'static str {
    "The quick brown fox jumps over the lazy dog. Is it really that quick? \
It certainly is! Nobody has ever seen a fox like it. The dog, however, \
remains unimpressed. Why would it care? Foxes come and go"
}
