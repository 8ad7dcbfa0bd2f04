use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;
use crate::models::Snapshot;
use crate::types::Cfg;

fn read_json<T: DeserializeOwned>(path: &str) -> Result<T, StorageError> {
    let contents = std::fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_string(),
        source,
    })?;
    let mut de = serde_json::Deserializer::from_str(&contents);
    serde_path_to_error::deserialize(&mut de).map_err(|e| StorageError::Json {
        path: path.to_string(),
        at: e.path().to_string(),
        message: e.inner().to_string(),
    })
}

fn write_json<T: Serialize>(value: &T, path: &str, what: &'static str) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|source| StorageError::Serialize { what, source })?;
    std::fs::write(path, json).map_err(|source| StorageError::Io {
        path: path.to_string(),
        source,
    })
}

/// Leser snapshot (brukere, ukeposter, lag) fra disk.
/// Hvis filen ikke finnes, returneres et tomt snapshot.
pub fn load_snapshot(path: &str) -> Result<Snapshot, StorageError> {
    if !Path::new(path).exists() {
        log::warn!("snapshot not found at {path}, starting empty");
        return Ok(Snapshot::default());
    }
    let mut snap: Snapshot = read_json(path)?;
    snap.normalize();
    log::info!(
        "snapshot loaded from {path} (users={}, teams={})",
        snap.user_names.len(),
        snap.teams.len()
    );
    Ok(snap)
}

/// Lagrer snapshot som JSON (pretty-print).
pub fn save_snapshot(snapshot: &Snapshot, path: &str) -> Result<(), StorageError> {
    write_json(snapshot, path, "snapshot")?;
    log::info!("snapshot saved to {path} (users={})", snapshot.user_names.len());
    Ok(())
}

/// Leser konfig; mangler filen brukes standardverdier.
pub fn load_cfg(path: &str) -> Result<Cfg, StorageError> {
    if !Path::new(path).exists() {
        log::info!("no config at {path}, using defaults");
        return Ok(Cfg::default());
    }
    read_json(path)
}

pub fn save_cfg(cfg: &Cfg, path: &str) -> Result<(), StorageError> {
    write_json(cfg, path, "config")
}
