// Per-instance memoization.
// Caches named computations so each runs at most once per owning instance.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::OnceCell;

use crate::error::{Error, Result};

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// Name-keyed cache owned by a single instance.
///
/// Each entry is a [`OnceCell`], so "computed" is tracked apart from the
/// value itself: an empty list or `false` is cached like anything else.
/// Concurrent first accesses to the same name wait on the entry's lock and
/// all observe the single stored result. Failed computations are not
/// stored; the next access runs the computation again. This includes
/// callers already waiting on the entry, so the single-run guarantee holds
/// for successful results only.
///
/// There is no invalidation. Once stored, an entry lives as long as the
/// cache does.
#[derive(Default)]
pub struct MemoCache {
    entries: Mutex<HashMap<&'static str, Slot>>,
}

impl MemoCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the value cached under `name`, computing it with `init` on first access.
    pub async fn get_or_try_init<T, F, Fut>(&self, name: &'static str, init: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let slot = self.slot(name);
        let value = slot
            .get_or_try_init(|| async {
                let value = init().await?;
                Ok::<_, Error>(Arc::new(value) as Arc<dyn Any + Send + Sync>)
            })
            .await?;

        Arc::clone(value)
            .downcast::<T>()
            .map_err(|_| Error::CacheType(name))
    }

    /// Return the cached value for `name` without computing it.
    pub fn get<T: Send + Sync + 'static>(&self, name: &'static str) -> Option<Arc<T>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(name)
            .and_then(|slot| slot.get())
            .and_then(|value| Arc::clone(value).downcast::<T>().ok())
    }

    /// Check whether a value has been stored under `name`.
    pub fn contains(&self, name: &str) -> bool {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(name).is_some_and(|slot| slot.initialized())
    }

    /// Number of computed entries.
    pub fn len(&self) -> usize {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.values().filter(|slot| slot.initialized()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map lock is released before the entry is awaited.
    fn slot(&self, name: &'static str) -> Slot {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(name).or_default())
    }
}
