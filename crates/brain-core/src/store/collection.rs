use std::marker::PhantomData;

use super::Store;
use crate::model::Record;

/// CRUD bound to one record kind.
///
/// ```no_run
/// # async fn demo(store: &brain_core::Store) {
/// use brain_core::model::{Task, TaskPriority};
///
/// let tasks = store.collection::<Task>();
/// tasks.upsert(&Task::new("t42", "Water plants", TaskPriority::Low)).await;
/// assert!(tasks.get("t42").is_some());
/// tasks.delete("t42").await;
/// # }
/// ```
pub struct Collection<'a, R> {
    store: &'a Store,
    _kind: PhantomData<fn() -> R>,
}

impl<'a, R: Record> Collection<'a, R> {
    pub(crate) fn new(store: &'a Store) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    pub fn get_all(&self) -> Vec<R> {
        self.store.get_all()
    }

    pub fn get(&self, id: &str) -> Option<R> {
        self.store.get(id)
    }

    pub async fn upsert(&self, record: &R) -> bool {
        self.store.upsert(record).await
    }

    pub async fn upsert_many(&self, records: &[R]) -> bool {
        self.store.upsert_many(records).await
    }

    pub async fn delete(&self, id: &str) -> bool {
        self.store.delete::<R>(id).await
    }
}
