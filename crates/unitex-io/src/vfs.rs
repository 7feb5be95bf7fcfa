// In-memory virtual filesystem.
//
// Files are keyed by their full virtual path (prefix included). There are no
// directories: a "directory" is just the common prefix of the files below it,
// so creating or removing one is a no-op at this level.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use hashbrown::HashMap;

/// Shared in-memory file store.
///
/// Cloning a `VirtualFs` yields another handle onto the same store, the way
/// the native toolkit's virtual namespace is process-wide rather than
/// per-caller.
#[derive(Debug, Clone, Default)]
pub struct VirtualFs {
    files: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl VirtualFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<String, Vec<u8>>> {
        self.files.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<String, Vec<u8>>> {
        self.files.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Whether a file exists at exactly `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.read_guard().contains_key(path)
    }

    /// Copy of the file contents, if present.
    pub fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.read_guard().get(path).cloned()
    }

    /// Create or truncate `path` with `data`.
    pub fn write(&self, path: &str, data: &[u8]) {
        self.write_guard().insert(path.to_string(), data.to_vec());
    }

    /// Append `data` to `path`, creating the file if needed.
    pub fn append(&self, path: &str, data: &[u8]) {
        self.write_guard()
            .entry(path.to_string())
            .or_default()
            .extend_from_slice(data);
    }

    /// Remove `path`. Returns `false` if it did not exist.
    pub fn remove(&self, path: &str) -> bool {
        self.write_guard().remove(path).is_some()
    }

    /// Rename `from` to `to`, replacing any existing file at `to`.
    pub fn rename(&self, from: &str, to: &str) -> bool {
        let mut files = self.write_guard();
        match files.remove(from) {
            Some(data) => {
                files.insert(to.to_string(), data);
                true
            }
            None => false,
        }
    }

    /// Files at `path` or directly below it, sorted.
    ///
    /// A file path lists itself, which is what makes "exists" expressible
    /// as membership in the listing. Entries in nested "subdirectories" are
    /// left out.
    pub fn list(&self, path: &str) -> Vec<String> {
        let dir = path.trim_end_matches('/');
        let mut entries: Vec<String> = self
            .read_guard()
            .keys()
            .filter(|name| {
                name.as_str() == path
                    || name
                        .strip_prefix(dir)
                        .and_then(|rest| rest.strip_prefix('/'))
                        .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
            })
            .cloned()
            .collect();
        entries.sort();
        entries
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
