use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::AppError;

// @module: File utilities for the input and output documents

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<(), AppError> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .map_err(|e| AppError::File(format!("Failed to create {}: {}", path.display(), e)))?;
        }
        Ok(())
    }

    /// Read the whole input document
    ///
    /// A missing file is reported as `AppError::InputNotFound`.
    pub fn load_input<P: AsRef<Path>>(path: P) -> Result<String, AppError> {
        let path = path.as_ref();
        fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::InputNotFound(path.to_path_buf()),
            _ => AppError::File(format!("Failed to read file {}: {}", path.display(), e)),
        })
    }

    /// Write a string to a file, replacing any previous content
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<(), AppError> {
        let path = path.as_ref();
        // Ensure the parent directory exists
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(path, content)
            .map_err(|e| AppError::File(format!("Failed to write to file {}: {}", path.display(), e)))
    }
}
