//! Named file storage.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// A place uploaded files are written to, addressed by relative paths
/// using `/` separators.
pub trait Disk: Send + Sync {
    /// Logical name (e.g., "public").
    fn name(&self) -> &str;

    fn exists(&self, path: &str) -> StorageResult<bool>;

    /// Writes `contents` at `path`, replacing any existing file, and returns
    /// the stored path.
    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<String>;

    fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Removes a file. Returns false when there was nothing to remove.
    fn delete(&self, path: &str) -> StorageResult<bool>;
}

/// Rejects empty, absolute, and parent-traversing paths.
fn check_relative(path: &str) -> StorageResult<&Path> {
    let candidate = Path::new(path);
    if path.trim().is_empty() {
        return Err(StorageError::InvalidPath("empty path".to_string()));
    }
    let clean = candidate
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !clean {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(candidate)
}

/// A disk rooted at a directory on the local file system.
#[derive(Debug, Clone)]
pub struct LocalDisk {
    name: String,
    root: PathBuf,
}

impl LocalDisk {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
        Ok(self.root.join(check_relative(path)?))
    }
}

impl Disk for LocalDisk {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self.resolve(path)?.is_file())
    }

    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<String> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&full, contents)?;
        debug!("Stored {} bytes at {}:{}", contents.len(), self.name, path);
        Ok(path.to_string())
    }

    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full = self.resolve(path)?;
        match std::fs::read(&full) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(format!("{}:{}", self.name, path)))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, path: &str) -> StorageResult<bool> {
        let full = self.resolve(path)?;
        match std::fs::remove_file(&full) {
            Ok(()) => {
                debug!("Deleted {}:{}", self.name, path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// A disk held in memory.
#[derive(Debug, Default)]
pub struct MemoryDisk {
    name: String,
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryDisk {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: Mutex::new(BTreeMap::new()),
        }
    }

    /// Stored paths in lexical order.
    pub fn paths(&self) -> StorageResult<Vec<String>> {
        let files = self.files.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(files.keys().cloned().collect())
    }
}

impl Disk for MemoryDisk {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self, path: &str) -> StorageResult<bool> {
        check_relative(path)?;
        let files = self.files.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(files.contains_key(path))
    }

    fn put(&self, path: &str, contents: &[u8]) -> StorageResult<String> {
        check_relative(path)?;
        let mut files = self.files.lock().map_err(|_| StorageError::Poisoned)?;
        files.insert(path.to_string(), contents.to_vec());
        Ok(path.to_string())
    }

    fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        check_relative(path)?;
        let files = self.files.lock().map_err(|_| StorageError::Poisoned)?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(format!("{}:{}", self.name, path)))
    }

    fn delete(&self, path: &str) -> StorageResult<bool> {
        check_relative(path)?;
        let mut files = self.files.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(files.remove(path).is_some())
    }
}

/// Disks by logical name, plus the name used when a field does not pick one.
#[derive(Clone)]
pub struct DiskManager {
    default_disk: String,
    disks: BTreeMap<String, Arc<dyn Disk>>,
}

impl DiskManager {
    pub fn new(default_disk: impl Into<String>) -> Self {
        Self {
            default_disk: default_disk.into(),
            disks: BTreeMap::new(),
        }
    }

    /// Registers a disk under its own name, replacing any previous one.
    pub fn register(&mut self, disk: Arc<dyn Disk>) {
        self.disks.insert(disk.name().to_string(), disk);
    }

    pub fn with_disk(mut self, disk: Arc<dyn Disk>) -> Self {
        self.register(disk);
        self
    }

    pub fn default_name(&self) -> &str {
        &self.default_disk
    }

    pub fn disk(&self, name: &str) -> StorageResult<Arc<dyn Disk>> {
        self.disks
            .get(name)
            .cloned()
            .ok_or_else(|| StorageError::UnknownDisk(name.to_string()))
    }

    pub fn default_disk(&self) -> StorageResult<Arc<dyn Disk>> {
        self.disk(&self.default_disk)
    }

    /// The named disk, or the default one when `name` is `None`.
    pub fn resolve(&self, name: Option<&str>) -> StorageResult<Arc<dyn Disk>> {
        self.disk(name.unwrap_or(&self.default_disk))
    }
}

impl std::fmt::Debug for DiskManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiskManager")
            .field("default_disk", &self.default_disk)
            .field("disks", &self.disks.keys().collect::<Vec<_>>())
            .finish()
    }
}
