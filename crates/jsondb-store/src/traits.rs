use crate::document::Document;
use crate::error::StoreResult;

/// Collection-keyed JSON document store.
///
/// All implementations must satisfy these invariants:
/// - `write` replaces the whole document; there is no merge.
/// - A reader observes either the previous or the new version of a
///   document, never a partially written one.
/// - `write` and `delete` serialize per top-level collection (a nested
///   collection such as `users/archive` serializes with `users`); different
///   top-level collections proceed in parallel.
/// - `read` and `read_all` never block on writers.
/// - Errors are returned verbatim; the store never retries.
pub trait DocumentStore: Send + Sync {
    /// Create or overwrite the document `id` in `collection`.
    ///
    /// The collection is created on first write.
    fn write(&self, collection: &str, id: &str, document: &Document) -> StoreResult<()>;

    /// Read a single document.
    ///
    /// Returns `Err(StoreError::NotFound)` if the document does not exist.
    fn read(&self, collection: &str, id: &str) -> StoreResult<Document>;

    /// Read every document in a collection.
    ///
    /// Only `*.json` files are read; nested collections and any other files
    /// in the directory are ignored.
    ///
    /// Fails with `CorruptData` if any one document cannot be decoded;
    /// partial results are never returned.
    fn read_all(&self, collection: &str) -> StoreResult<Vec<Document>>;

    /// Delete a document, or a nested collection when `id` names one.
    ///
    /// Deleting a nested collection also removes every collection below it.
    fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;
}
