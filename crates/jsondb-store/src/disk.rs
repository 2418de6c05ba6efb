use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::document::{self, Document};
use crate::error::{StoreError, StoreResult};
use crate::fs::{EntryKind, Filesystem, OsFilesystem};
use crate::locks::{self, LockTable};
use crate::names::{validate_collection, validate_delete_target, validate_id};
use crate::traits::DocumentStore;

/// Extension of every document file.
pub const DOCUMENT_EXTENSION: &str = "json";

/// Directory-backed document store.
///
/// Layout is `<root>/<collection>/<id>.json`. Nothing is cached in memory:
/// the filesystem is the only source of truth, so several stores (or
/// processes) may share a root as long as writers to the same collection
/// go through the same store.
///
/// Writes and deletes hold a per-collection lock obtained from a
/// [`LockTable`]. Nested collections share the lock of their top-level
/// collection, since deleting a nested collection removes its directory
/// tree. Reads take no lock; atomic replacement of files bounds a racing
/// read to "old version or new version".
pub struct FsDocumentStore<F: Filesystem = OsFilesystem> {
    root: PathBuf,
    locks: LockTable,
    fs: F,
}

impl FsDocumentStore<OsFilesystem> {
    /// Open a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with(root, OsFilesystem)
    }
}

impl<F: Filesystem> FsDocumentStore<F> {
    /// Open a store rooted at `root` that performs I/O through `fs`.
    pub fn open_with(root: impl AsRef<Path>, fs: F) -> StoreResult<Self> {
        let root: PathBuf = root.as_ref().components().collect();
        match fs.kind(&root)? {
            EntryKind::Dir => {}
            EntryKind::Missing => {
                debug!(root = %root.display(), "creating database root");
                fs.create_dir_all(&root)?;
            }
            EntryKind::File | EntryKind::Other => {
                return Err(StoreError::InvalidArgument(format!(
                    "store root {} is not a directory",
                    root.display()
                )));
            }
        }

        Ok(Self {
            root,
            locks: LockTable::new(),
            fs,
        })
    }

    /// The directory this store is bound to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The per-collection lock table.
    pub fn locks(&self) -> &LockTable {
        &self.locks
    }

    /// Names of the top-level collections, sorted.
    pub fn collections(&self) -> StoreResult<Vec<String>> {
        let mut names: Vec<String> = self
            .fs
            .list_dir(&self.root)?
            .into_iter()
            .filter(|entry| entry.kind == EntryKind::Dir)
            .filter_map(|entry| {
                entry
                    .path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .map(str::to_string)
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn collection_dir(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    /// Locate the file holding `id`, accepting ids with or without the
    /// `.json` extension.
    fn resolve_record(&self, dir: &Path, id: &str) -> StoreResult<PathBuf> {
        let exact = dir.join(id);
        if self.fs.kind(&exact)? == EntryKind::File {
            return Ok(exact);
        }
        let with_ext = record_path(dir, id);
        match self.fs.kind(&with_ext)? {
            EntryKind::File => Ok(with_ext),
            _ => Err(StoreError::NotFound(with_ext)),
        }
    }

    fn read_document(&self, path: &Path) -> StoreResult<Document> {
        let bytes = self.fs.read(path)?;
        document::decode(path, &bytes)
    }
}

impl<F: Filesystem> DocumentStore for FsDocumentStore<F> {
    fn write(&self, collection: &str, id: &str, document: &Document) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_id(id)?;

        let lock = self.locks.for_collection(collection);
        let _guard = locks::acquire(&lock);

        let dir = self.collection_dir(collection);
        self.fs.create_dir_all(&dir)?;

        let bytes = document::encode(document)?;
        let path = record_path(&dir, id);
        self.fs.write_atomic(&path, &bytes)?;

        debug!(collection, id, len = bytes.len(), "document written");
        Ok(())
    }

    fn read(&self, collection: &str, id: &str) -> StoreResult<Document> {
        validate_collection(collection)?;
        validate_id(id)?;

        let dir = self.collection_dir(collection);
        let path = self.resolve_record(&dir, id)?;
        let doc = self.read_document(&path)?;

        trace!(collection, id, "document read");
        Ok(doc)
    }

    fn read_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        validate_collection(collection)?;

        let dir = self.collection_dir(collection);
        if self.fs.kind(&dir)? != EntryKind::Dir {
            return Err(StoreError::NotFound(dir));
        }

        let mut documents = Vec::new();
        for entry in self.fs.list_dir(&dir)? {
            if entry.kind != EntryKind::File || !is_document_file(&entry.path) {
                continue;
            }
            match self.read_document(&entry.path) {
                Ok(doc) => documents.push(doc),
                // Deleted between listing and reading.
                Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }

        trace!(collection, count = documents.len(), "collection read");
        Ok(documents)
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_delete_target(id)?;

        let lock = self.locks.for_collection(collection);
        let _guard = locks::acquire(&lock);

        let dir = self.collection_dir(collection);
        let exact = dir.join(id);
        let exact_kind = self.fs.kind(&exact)?;

        if exact_kind == EntryKind::Dir {
            self.fs.remove_dir_all(&exact)?;
            debug!(collection, id, "nested collection deleted");
            return Ok(());
        }

        let with_ext = record_path(&dir, id);
        let target = if self.fs.kind(&with_ext)? == EntryKind::File {
            with_ext
        } else if exact_kind == EntryKind::File {
            exact
        } else {
            return Err(StoreError::NotFound(with_ext));
        };

        self.fs.remove_file(&target)?;
        debug!(collection, id, "document deleted");
        Ok(())
    }
}

impl<F: Filesystem> std::fmt::Debug for FsDocumentStore<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsDocumentStore")
            .field("root", &self.root)
            .field("locks", &self.locks)
            .finish()
    }
}

fn record_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.{DOCUMENT_EXTENSION}"))
}

fn is_document_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DOCUMENT_EXTENSION)
}
