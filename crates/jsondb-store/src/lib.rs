//! File-per-document JSON storage engine.
//!
//! Every document is an open JSON object stored as `<root>/<collection>/<id>.json`.
//! Collections are plain directories, created on first write.
//!
//! # Backends
//!
//! All backends implement the [`DocumentStore`] trait:
//!
//! - [`FsDocumentStore`] -- the on-disk store
//! - [`InMemoryDocumentStore`] -- map-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Writes go to a temporary file in the collection directory and are
//!    renamed into place, so no reader ever sees a torn document.
//! 2. Writes and deletes are serialized per top-level collection but parallel
//!    across top-level collections. A nested collection shares its top-level
//!    collection's lock. The lock table's own mutex is never held during I/O.
//! 3. Reads take no lock.
//! 4. `read_all` is fail-fast: one corrupt document fails the whole listing.
//! 5. All I/O errors are propagated, never retried or silently ignored.

pub mod disk;
pub mod document;
pub mod error;
pub mod fs;
pub mod locks;
pub mod memory;
pub mod names;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use disk::{FsDocumentStore, DOCUMENT_EXTENSION};
pub use document::Document;
pub use error::{StoreError, StoreResult};
pub use fs::{EntryKind, Filesystem, OsFilesystem};
pub use locks::LockTable;
pub use memory::InMemoryDocumentStore;
pub use traits::DocumentStore;
