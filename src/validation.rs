use crate::error::{ExportError, Result};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Checks that the input root exists, is a directory and can be listed.
///
/// This is the only batch-level hard failure; it runs before discovery.
pub fn validate_input_root(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Err(ExportError::InputRootInvalid(path.to_path_buf()));
    }

    fs::read_dir(path).map_err(|_| ExportError::InputRootInvalid(path.to_path_buf()))?;

    path.canonicalize()
        .map_err(|_| ExportError::InputRootInvalid(path.to_path_buf()))
}

/// Product names become a directory or archive file name under the output
/// root, so they must be a single plain path component.
pub fn validate_product_name(name: &str) -> Result<()> {
    let invalid = || ExportError::InvalidProductName(name.to_string());

    if name.trim().is_empty() {
        return Err(invalid());
    }

    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => {}
        _ => return Err(invalid()),
    }

    if name.contains(|c: char| c == '/' || c == '\\') {
        return Err(invalid());
    }

    Ok(())
}
