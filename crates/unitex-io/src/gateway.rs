// FileGateway: uniform file operations over the disk and the virtual
// filesystem.
//
// Boolean operations log at call time and on failure, and never return an
// error for an ordinary failure such as copying a file that does not exist.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tracing::{info, warn};
use unitex_core::is_virtual;

use crate::vfs::VirtualFs;

/// Routes file operations by path prefix.
///
/// Cheap to clone; clones share the same virtual store.
#[derive(Debug, Clone, Default)]
pub struct FileGateway {
    vfs: VirtualFs,
}

/// Log and pass through the outcome of a boolean operation.
fn report(ok: bool) -> bool {
    if !ok {
        warn!("[FAILED!]");
    }
    ok
}

impl FileGateway {
    /// Gateway with a fresh, empty virtual store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gateway over an existing virtual store.
    pub fn with_vfs(vfs: VirtualFs) -> Self {
        Self { vfs }
    }

    /// The virtual store behind this gateway.
    pub fn vfs(&self) -> &VirtualFs {
        &self.vfs
    }

    /// Copy a file. Either side may be virtual, so this both virtualizes disk
    /// files and dumps virtual files to disk.
    pub fn cp(&self, source: &str, target: &str) -> bool {
        info!("Copying file '{source}' to '{target}'...");
        let ok = match (is_virtual(source), is_virtual(target)) {
            (false, false) => fs::copy(source, target).is_ok(),
            _ => match self.read_bytes(source) {
                Ok(data) => self.write_bytes(target, &data, false).is_ok(),
                Err(_) => false,
            },
        };
        report(ok)
    }

    /// Remove a file.
    pub fn rm(&self, path: &str) -> bool {
        info!("Removing file '{path}'...");
        let ok = if is_virtual(path) {
            self.vfs.remove(path)
        } else {
            fs::remove_file(path).is_ok()
        };
        report(ok)
    }

    /// Move or rename a file. Moves across namespaces copy then remove.
    pub fn mv(&self, old_path: &str, new_path: &str) -> bool {
        info!("Moving file '{old_path}' to '{new_path}'...");
        let ok = match (is_virtual(old_path), is_virtual(new_path)) {
            (false, false) => fs::rename(old_path, new_path).is_ok(),
            (true, true) => self.vfs.rename(old_path, new_path),
            _ => match self.read_bytes(old_path) {
                Ok(data) => {
                    self.write_bytes(new_path, &data, false).is_ok() && self.remove_quiet(old_path)
                }
                Err(_) => false,
            },
        };
        report(ok)
    }

    /// Create a directory (and its parents). Virtual directories are
    /// implicit, so this always succeeds for virtual paths.
    pub fn mkdir(&self, path: &str) -> bool {
        info!("Creating directory '{path}'...");
        if is_virtual(path) {
            return true;
        }
        report(fs::create_dir_all(path).is_ok())
    }

    /// Remove a directory together with whatever is left inside it.
    ///
    /// For virtual paths every file directly below the directory is dropped.
    pub fn rmdir(&self, path: &str) -> bool {
        info!("Removing directory '{path}'...");
        let ok = if is_virtual(path) {
            for entry in self.vfs.list(path) {
                if entry != path {
                    self.vfs.remove(&entry);
                }
            }
            true
        } else {
            fs::remove_dir_all(path).is_ok()
        };
        report(ok)
    }

    /// Files (not subdirectories) contained in a directory, as full paths.
    ///
    /// Empty if the directory is empty or absent. For a virtual file path the
    /// listing contains the file itself.
    pub fn ls(&self, path: &str) -> Vec<String> {
        info!("Listing directory '{path}'...");
        if is_virtual(path) {
            return self.vfs.list(path);
        }
        let Ok(entries) = fs::read_dir(path) else {
            return Vec::new();
        };
        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .map(|entry| Path::new(path).join(entry.file_name()).display().to_string())
            .collect();
        files.sort();
        files
    }

    /// Whether a file exists. Virtual paths are checked by membership in
    /// their own listing, disk paths by the filesystem.
    pub fn exists(&self, path: &str) -> bool {
        if !is_virtual(path) {
            return Path::new(path).exists();
        }
        self.ls(path).iter().any(|entry| entry == path)
    }

    // =========================================================================
    // Raw content access (used by UnitexFile)
    // =========================================================================

    /// Whole file contents.
    pub fn read_bytes(&self, path: &str) -> io::Result<Vec<u8>> {
        if is_virtual(path) {
            return self.vfs.read(path).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("virtual file '{path}' not found"),
                )
            });
        }
        fs::read(path)
    }

    /// Create, truncate or append to a file.
    pub fn write_bytes(&self, path: &str, data: &[u8], append: bool) -> io::Result<()> {
        if is_virtual(path) {
            if append {
                self.vfs.append(path, data);
            } else {
                self.vfs.write(path, data);
            }
            return Ok(());
        }
        if append {
            let mut file = fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            file.write_all(data)
        } else {
            fs::write(path, data)
        }
    }

    fn remove_quiet(&self, path: &str) -> bool {
        if is_virtual(path) {
            self.vfs.remove(path)
        } else {
            fs::remove_file(path).is_ok()
        }
    }
}
