//! Filesystem access used by [`FsDocumentStore`](crate::FsDocumentStore).
//!
//! The store never touches `std::fs` directly; everything goes through the
//! [`Filesystem`] trait so tests can wrap the real filesystem (for example
//! to inject I/O latency).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// What a path currently refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Exists but is neither a regular file nor a directory.
    Other,
    Missing,
}

/// One entry of a directory listing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Filesystem operations required by the on-disk store.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all missing parents.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Replace `path` with `bytes` so that readers observe either the old
    /// content or the new content, never a prefix of it.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// List a directory in the order the OS returns entries.
    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Classify a path, following symlinks.
    fn kind(&self, path: &Path) -> io::Result<EntryKind>;

    /// Remove a single file.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove a directory and everything under it.
    fn remove_dir_all(&self, path: &Path) -> io::Result<()>;
}

/// The real filesystem.
///
/// Atomic writes go to a uniquely named temporary file in the target's
/// directory, are synced, then renamed over the target.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::create_dir_all(path)
    }

    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        // Dropping an unpersisted temp file deletes it, so errors below
        // leave nothing behind.
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o644))?;
        }

        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn list_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let path = entry?.path();
            let kind = self.kind(&path)?;
            entries.push(DirEntry { path, kind });
        }
        Ok(entries)
    }

    fn kind(&self, path: &Path) -> io::Result<EntryKind> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(EntryKind::File),
            Ok(meta) if meta.is_dir() => Ok(EntryKind::Dir),
            Ok(_) => Ok(EntryKind::Other),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EntryKind::Missing),
            Err(e) => Err(e),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir_all(path)
    }
}
