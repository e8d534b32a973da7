//! Shader source loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{GpuError, Result};

/// Read a whole text file, failing with [`GpuError::FileNotFound`] when it
/// cannot be read.
pub fn load_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| GpuError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded file");
    Ok(text)
}
