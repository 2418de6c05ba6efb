//! Collection name and record id validation.
//!
//! Both are joined onto the store root, so anything that could escape it
//! is rejected up front:
//! - Must be non-empty
//! - Must not contain NUL or `\`
//! - Must not start with `/`
//! - `/`-separated components must be non-empty and not `.` or `..`
//!
//! Collection names may contain `/` to address nested collections. Record
//! ids may not, except when deleting, where an id can name a nested
//! collection.

use crate::error::{StoreError, StoreResult};

const FORBIDDEN_CHARS: &[char] = &['\0', '\\'];

/// Validate a collection name.
///
/// ```
/// use jsondb_store::names::validate_collection;
///
/// assert!(validate_collection("users").is_ok());
/// assert!(validate_collection("tenants/acme").is_ok());
/// assert!(validate_collection("").is_err());
/// assert!(validate_collection("../etc").is_err());
/// ```
pub fn validate_collection(name: &str) -> StoreResult<()> {
    validate_path("collection", name)
}

/// Validate a record id.
pub fn validate_id(id: &str) -> StoreResult<()> {
    validate_path("id", id)?;
    if id.contains('/') {
        return Err(invalid("id", id, "must not contain '/'"));
    }
    Ok(())
}

/// Validate the target of a delete: a record id or a nested collection path.
pub fn validate_delete_target(id: &str) -> StoreResult<()> {
    validate_path("id", id)
}

fn validate_path(what: &str, value: &str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::InvalidArgument(format!("missing {what}")));
    }

    for ch in FORBIDDEN_CHARS {
        if value.contains(*ch) {
            return Err(invalid(what, value, &format!("contains forbidden character {ch:?}")));
        }
    }

    if value.starts_with('/') {
        return Err(invalid(what, value, "must be relative"));
    }

    for component in value.split('/') {
        match component {
            "" => return Err(invalid(what, value, "contains an empty path component")),
            "." | ".." => {
                return Err(invalid(what, value, "must not contain '.' or '..' components"))
            }
            _ => {}
        }
    }

    Ok(())
}

fn invalid(what: &str, value: &str, reason: &str) -> StoreError {
    StoreError::InvalidArgument(format!("{what} {value:?} {reason}"))
}
