//! JSON file helpers
//!
//! Snapshot files are read whole; writes go through a temp file and a rename
//! so a crash never leaves a half-written snapshot behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};
use tracing::trace;

use crate::error::TallyError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, TallyError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }
    parse_file(path)
}

/// Read JSON from a file, returning a not-found error if it doesn't exist
pub fn read_json_required<T, P>(path: P) -> Result<T, TallyError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Err(TallyError::snapshot_not_found(path.display().to_string()));
    }
    parse_file(path)
}

fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<T, TallyError> {
    trace!(path = %path.display(), "reading json");

    let file = File::open(path)
        .map_err(|e| TallyError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| TallyError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file through a sibling temp file and a rename
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), TallyError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            TallyError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| TallyError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| TallyError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| TallyError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| TallyError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        TallyError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}
