//! JSON files on disk: the marketplace snapshot and the items collection.

use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::AppError;

/// Read `path` as JSON. A missing file is `Ok(None)`.
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let value = serde_json::from_str(&data)?;
    tracing::info!("Loaded {}", path.display());
    Ok(Some(value))
}

/// Write `value` to `path` through a sibling temp file and a rename, so a
/// crash mid-write leaves the previous file intact.
///
/// Encoding happens on the caller; the file I/O runs on the blocking pool.
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let data = serde_json::to_vec_pretty(value)?;
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || replace_file(&path, &data))
        .await
        .map_err(|e| AppError::Io(std::io::Error::other(e)))?
}

fn replace_file(path: &Path, data: &[u8]) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    std::fs::write(&tmp, data)?;
    std::fs::rename(&tmp, path)?;
    tracing::debug!("Saved {}", path.display());
    Ok(())
}
