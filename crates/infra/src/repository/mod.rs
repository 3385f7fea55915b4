//! Typed record storage behind a repository interface.

pub mod in_memory;

pub use in_memory::InMemoryRepository;

use std::sync::Arc;

use ledgerdesk_core::Entity;

/// Insertion-ordered record collection.
///
/// Implementations only store and fetch; validation and multi-record
/// consistency live in [`crate::store::LedgerStore`].
pub trait Repository<T: Entity>: Send + Sync {
    fn get(&self, id: &T::Id) -> Option<T>;

    /// First record satisfying `predicate`, in insertion order.
    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T>;

    /// All records in insertion order.
    fn list(&self) -> Vec<T>;

    /// Append a record. Returns `false` when nothing could be stored.
    fn insert(&self, value: T) -> bool;

    /// Replace the record with the same id in place. Returns the previous
    /// value, or `None` (and stores nothing) when the id is unknown.
    fn replace(&self, value: T) -> Option<T>;

    /// Replace several records in one step: either every id is known and all
    /// are replaced, or nothing changes and `false` is returned.
    fn replace_all(&self, values: Vec<T>) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, S> Repository<T> for Arc<S>
where
    T: Entity,
    S: Repository<T> + ?Sized,
{
    fn get(&self, id: &T::Id) -> Option<T> {
        (**self).get(id)
    }

    fn find(&self, predicate: &dyn Fn(&T) -> bool) -> Option<T> {
        (**self).find(predicate)
    }

    fn list(&self) -> Vec<T> {
        (**self).list()
    }

    fn insert(&self, value: T) -> bool {
        (**self).insert(value)
    }

    fn replace(&self, value: T) -> Option<T> {
        (**self).replace(value)
    }

    fn replace_all(&self, values: Vec<T>) -> bool {
        (**self).replace_all(values)
    }

    fn len(&self) -> usize {
        (**self).len()
    }
}
