use std::collections::HashMap;

use parking_lot::RwLock;
use time::OffsetDateTime;

use super::model::ContentRecord;

struct Inner<T> {
    items: HashMap<i32, T>,
    next_id: i32,
}

/// Ordered in-memory collection, one per content variant. Ids come from a
/// monotonic counter starting at 1 and are never reused after a delete, so
/// the id doubles as the insertion sequence that breaks `order` ties.
///
/// Each operation takes the lock exactly once, so mutations are atomic with
/// respect to the collection; the lock is never held across an await point.
pub struct ContentStore<T> {
    inner: RwLock<Inner<T>>,
}

impl<T: ContentRecord> ContentStore<T> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                items: HashMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Snapshot of the collection sorted ascending by `(order, id)`. Later
    /// mutations do not show up in a sequence already returned.
    pub fn list(&self) -> Vec<T> {
        let inner = self.inner.read();
        let mut items: Vec<T> = inner.items.values().cloned().collect();
        items.sort_by_key(|item| (item.order(), item.id()));
        items
    }

    pub fn get(&self, id: i32) -> Option<T> {
        self.inner.read().items.get(&id).cloned()
    }

    pub fn create(&self, draft: T::Draft) -> T {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        let item = T::build(id, OffsetDateTime::now_utc(), draft);
        inner.items.insert(id, item.clone());
        item
    }

    /// Merges the patch onto the existing record; `None` if the id is
    /// unknown. Id and creation timestamp are untouchable by construction.
    pub fn update(&self, id: i32, patch: T::Patch) -> Option<T> {
        let mut inner = self.inner.write();
        let item = inner.items.get_mut(&id)?;
        item.apply(patch);
        Some(item.clone())
    }

    /// `true` if something was removed. A missing id is not an error.
    pub fn delete(&self, id: i32) -> bool {
        self.inner.write().items.remove(&id).is_some()
    }
}

impl<T: ContentRecord> Default for ContentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
