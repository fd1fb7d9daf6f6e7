//! File I/O utilities with atomic writes
//!
//! Provides safe file operations that won't corrupt data on failure.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::IronlogError;

/// Read JSON from a file, returning a default value if file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, IronlogError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| IronlogError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    let reader = BufReader::new(file);
    serde_json::from_reader(reader)
        .map_err(|e| IronlogError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, then rename)
///
/// The file is either completely written or not modified at all.
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), IronlogError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let json = serde_json::to_vec_pretty(data)
        .map_err(|e| IronlogError::Storage(format!("Failed to serialize data: {}", e)))?;
    write_bytes_atomic(path, &json)
}

/// Write raw bytes to a file atomically
///
/// Permission errors surface as `Unauthorized` so callers can tell a policy
/// refusal apart from other I/O failures.
pub fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<(), IronlogError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error(e, "create directory", parent))?;
    }

    // Temp file must live in the same directory for the rename to be atomic
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let file = File::create(&temp_path).map_err(|e| storage_error(e, "create", &temp_path))?;

    let mut writer = BufWriter::new(file);
    let written = writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| storage_error(e, "write", &temp_path))
        .and_then(|_| {
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| storage_error(e, "sync", &temp_path))
        });
    drop(writer);

    if let Err(err) = written.and_then(|_| {
        fs::rename(&temp_path, path).map_err(|e| storage_error(e, "rename into", path))
    }) {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    Ok(())
}

fn storage_error(err: std::io::Error, action: &str, path: &Path) -> IronlogError {
    let message = format!("Failed to {} {}: {}", action, path.display(), err);
    if err.kind() == std::io::ErrorKind::PermissionDenied {
        IronlogError::Unauthorized(message)
    } else {
        IronlogError::Storage(message)
    }
}
