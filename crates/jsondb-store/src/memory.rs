use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use crate::disk::DOCUMENT_EXTENSION;
use crate::document::Document;
use crate::error::{StoreError, StoreResult};
use crate::names::{validate_collection, validate_delete_target, validate_id};
use crate::traits::DocumentStore;

/// In-memory, map-based document store.
///
/// Intended for tests and embedding. Mirrors the validation and error
/// semantics of [`FsDocumentStore`](crate::FsDocumentStore); `NotFound`
/// errors carry the path the on-disk store would have used.
/// `read_all` returns documents ordered by id. Nested collections are keyed
/// by their full path; deleting `("users", "archive")` removes
/// `users/archive` and every collection below it, as on disk.
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of documents across all collections.
    pub fn len(&self) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(BTreeMap::len)
            .sum()
    }

    /// Returns `true` if the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of all collections that have been written to, sorted.
    pub fn collections(&self) -> Vec<String> {
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove every collection.
    pub fn clear(&self) {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn record_key(id: &str) -> &str {
    id.strip_suffix(DOCUMENT_EXTENSION)
        .and_then(|stem| stem.strip_suffix('.'))
        .unwrap_or(id)
}

fn missing(collection: &str, id: Option<&str>) -> StoreError {
    let mut path = PathBuf::from(collection);
    if let Some(id) = id {
        path.push(format!("{}.{DOCUMENT_EXTENSION}", record_key(id)));
    }
    StoreError::NotFound(path)
}

impl DocumentStore for InMemoryDocumentStore {
    fn write(&self, collection: &str, id: &str, document: &Document) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_id(id)?;
        let mut map = self.collections.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document.clone());
        Ok(())
    }

    fn read(&self, collection: &str, id: &str) -> StoreResult<Document> {
        validate_collection(collection)?;
        validate_id(id)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        let docs = map.get(collection).ok_or_else(|| missing(collection, Some(id)))?;
        docs.get(id)
            .or_else(|| docs.get(record_key(id)))
            .cloned()
            .ok_or_else(|| missing(collection, Some(id)))
    }

    fn read_all(&self, collection: &str) -> StoreResult<Vec<Document>> {
        validate_collection(collection)?;
        let map = self.collections.read().unwrap_or_else(PoisonError::into_inner);
        let docs = map.get(collection).ok_or_else(|| missing(collection, None))?;
        Ok(docs.values().cloned().collect())
    }

    fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        validate_collection(collection)?;
        validate_delete_target(id)?;
        let mut map = self.collections.write().unwrap_or_else(PoisonError::into_inner);

        let nested = format!("{collection}/{id}");
        let below = format!("{nested}/");
        let before = map.len();
        map.retain(|name, _| name != &nested && !name.starts_with(&below));
        if map.len() < before {
            return Ok(());
        }

        // `id` may itself address a document inside a nested collection.
        let (owner, key) = match id.rsplit_once('/') {
            Some((sub, leaf)) => (format!("{collection}/{sub}"), leaf),
            None => (collection.to_string(), id),
        };
        let removed = map
            .get_mut(&owner)
            .is_some_and(|docs| docs.remove(key).is_some() || docs.remove(record_key(key)).is_some());
        if removed {
            Ok(())
        } else {
            Err(missing(collection, Some(id)))
        }
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore")
            .field("document_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn write_and_read() {
        let store = InMemoryDocumentStore::new();
        store.write("users", "u1", &doc(json!({"name": "a"}))).unwrap();
        assert_eq!(store.read("users", "u1").unwrap(), doc(json!({"name": "a"})));
        assert_eq!(store.read("users", "u1.json").unwrap(), doc(json!({"name": "a"})));
    }

    #[test]
    fn overwrite_replaces() {
        let store = InMemoryDocumentStore::new();
        store.write("users", "u1", &doc(json!({"a": 1}))).unwrap();
        store.write("users", "u1", &doc(json!({"b": 2}))).unwrap();
        assert_eq!(store.read("users", "u1").unwrap(), doc(json!({"b": 2})));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_and_invalid() {
        let store = InMemoryDocumentStore::new();
        assert!(store.read("users", "x").unwrap_err().is_not_found());
        assert!(store.read_all("users").unwrap_err().is_not_found());
        assert!(store.delete("users", "x").unwrap_err().is_not_found());
        assert!(store.read("", "x").unwrap_err().is_invalid_argument());
        assert!(store.read("users", "").unwrap_err().is_invalid_argument());
    }

    #[test]
    fn read_all_ordered_by_id() {
        let store = InMemoryDocumentStore::new();
        for id in ["c", "a", "b"] {
            store.write("users", id, &doc(json!({"id": id}))).unwrap();
        }
        let ids: Vec<_> = store
            .read_all("users")
            .unwrap()
            .into_iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn delete_leaves_siblings() {
        let store = InMemoryDocumentStore::new();
        store.write("users", "a", &Document::new()).unwrap();
        store.write("users", "b", &Document::new()).unwrap();
        store.delete("users", "a").unwrap();
        assert!(store.read("users", "a").unwrap_err().is_not_found());
        assert!(store.read("users", "b").is_ok());
        assert_eq!(store.collections(), vec!["users"]);
    }

    #[test]
    fn delete_nested_collection_and_descendants() {
        let store = InMemoryDocumentStore::new();
        store.write("users/archive", "a", &Document::new()).unwrap();
        store.write("users/archive/2024", "b", &Document::new()).unwrap();
        store.write("users/archived", "c", &Document::new()).unwrap();

        // "users" has no documents of its own.
        store.delete("users", "archive").unwrap();
        assert_eq!(store.collections(), vec!["users/archived"]);
        assert!(store.read_all("users/archive").unwrap_err().is_not_found());
        assert!(store.delete("users", "archive").unwrap_err().is_not_found());
    }

    #[test]
    fn delete_document_in_nested_collection() {
        let store = InMemoryDocumentStore::new();
        store.write("users/archive", "a", &Document::new()).unwrap();
        store.write("users/archive", "b", &Document::new()).unwrap();
        store.delete("users", "archive/a.json").unwrap();
        assert!(store.read("users/archive", "a").unwrap_err().is_not_found());
        assert!(store.read("users/archive", "b").is_ok());
    }

    #[test]
    fn clear_and_debug() {
        let store = InMemoryDocumentStore::default();
        store.write("users", "a", &Document::new()).unwrap();
        assert!(format!("{store:?}").contains("document_count: 1"));
        store.clear();
        assert!(store.is_empty());
    }
}
