// Nested JSON access.
// Walks a tree of JSON objects by an ordered path of keys.

use serde_json::Value;

use crate::error::{Error, Result};

/// Look up the value at `path` inside `root`.
///
/// Each step must land on a JSON object. A missing key, or a step that
/// reaches a non-object before the path is exhausted, fails with
/// [`Error::KeyNotFound`] carrying the key that could not be resolved.
/// An empty path fails with [`Error::InvalidPath`] rather than returning
/// the root.
pub fn access_nested<'a, K: AsRef<str>>(root: &'a Value, path: &[K]) -> Result<&'a Value> {
    if path.is_empty() {
        return Err(Error::InvalidPath);
    }

    path.iter().try_fold(root, |node, key| {
        let key = key.as_ref();
        node.as_object()
            .and_then(|map| map.get(key))
            .ok_or_else(|| Error::KeyNotFound(key.to_string()))
    })
}

/// Like [`access_nested`], but treats any failure as absence.
pub fn lookup_nested<'a, K: AsRef<str>>(root: &'a Value, path: &[K]) -> Option<&'a Value> {
    access_nested(root, path).ok()
}
