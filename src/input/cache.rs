use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::read::MultiGzDecoder;
use flate2::write::GzEncoder;
use memmap2::Mmap;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::snapshot::{SNAPSHOT_SCHEMA_VERSION, Snapshot};

const CACHE_MAGIC: &[u8; 8] = b"SURVQC1\0";
const HEADER_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("snapshot cache I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot cache is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait SnapshotStore: Send + Sync {
    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
    fn load(&self) -> Result<Option<Snapshot>, StoreError>;
}

/// Snapshot cache file: 8-byte magic, little-endian schema version, JSON
/// body. A `.gz` path stores the whole file gzip-compressed.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_compressed(&self) -> bool {
        self.path.extension().is_some_and(|ext| ext == "gz")
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = tmp_path(&self.path);
        {
            let file = File::create(&tmp)?;
            if self.is_compressed() {
                let mut enc = GzEncoder::new(BufWriter::new(file), Compression::default());
                write_cache(&mut enc, snapshot)?;
                enc.finish()?.flush()?;
            } else {
                let mut w = BufWriter::new(file);
                write_cache(&mut w, snapshot)?;
                w.flush()?;
            }
        }
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), "snapshot cache written");
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path)?;
        if self.is_compressed() {
            let mut bytes = Vec::new();
            MultiGzDecoder::new(file).read_to_end(&mut bytes)?;
            parse_cache(&bytes, &self.path)
        } else {
            if file.metadata()?.len() == 0 {
                return Ok(None);
            }
            let mmap = unsafe { Mmap::map(&file)? };
            parse_cache(&mmap, &self.path)
        }
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_cache<W: Write>(w: &mut W, snapshot: &Snapshot) -> Result<(), StoreError> {
    w.write_all(CACHE_MAGIC)?;
    w.write_all(&SNAPSHOT_SCHEMA_VERSION.to_le_bytes())?;
    serde_json::to_writer(&mut *w, snapshot)?;
    Ok(())
}

fn parse_cache(bytes: &[u8], path: &Path) -> Result<Option<Snapshot>, StoreError> {
    if bytes.len() < HEADER_LEN || &bytes[..8] != CACHE_MAGIC {
        warn!(path = %path.display(), "snapshot cache has no recognizable header; ignoring");
        return Ok(None);
    }
    let mut version = [0u8; 4];
    version.copy_from_slice(&bytes[8..HEADER_LEN]);
    let version = u32::from_le_bytes(version);
    if version != SNAPSHOT_SCHEMA_VERSION {
        warn!(
            path = %path.display(),
            found = version,
            expected = SNAPSHOT_SCHEMA_VERSION,
            "snapshot cache schema version mismatch; ignoring"
        );
        return Ok(None);
    }
    let snapshot: Snapshot = serde_json::from_slice(&bytes[HEADER_LEN..])?;
    Ok(Some(snapshot))
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<Snapshot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl SnapshotStore for MemoryStore {
    fn store(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.slot.lock() = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        Ok(self.slot.lock().clone())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/cache.rs"]
mod tests;
