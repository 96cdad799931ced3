use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::{Error, Result};
use crate::types::AggregateResult;

/// Write the dataset as pretty-printed JSON, replacing any previous file
pub fn save(path: &Path, result: &AggregateResult) -> Result<()> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

/// Read a dataset written by [`save`]
pub fn load(path: &Path) -> Result<AggregateResult> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(Error::DatasetNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };
    Ok(serde_json::from_str(&contents)?)
}

/// Replace `path` with `contents` through a temporary file in the same directory.
///
/// Readers see either the old file or the complete new one.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
